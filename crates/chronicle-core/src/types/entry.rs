//! Changelog entry types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ChronicleError, ChronicleResult, FieldErrors};

/// A changelog entry stored in the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    /// Store-assigned identity.
    pub id: i64,
    /// Release headline.
    pub title: String,
    /// Free-form release notes, usually one `- item` per line.
    pub content: String,
    /// Version label. Not required to be unique or semver.
    pub version: String,
    /// Release date, `None` when undated.
    pub release_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Write input for create and update.
///
/// Every field is optional so the same shape serves as a blank "new" form,
/// a partial update, and the echoed input of a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// `None` leaves the date untouched, `Some(None)` clears it.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<Option<NaiveDate>>,
}

/// Maps a present JSON value (including `null`) to `Some`, so a missing key
/// stays `None` through `#[serde(default)]`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ChangelogFields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the release date.
    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(Some(date));
        self
    }

    /// Explicitly clear the release date.
    pub fn without_release_date(mut self) -> Self {
        self.release_date = Some(None);
        self
    }

    /// Validate the fields for a new entry. Absent required fields are errors.
    pub fn to_draft(&self) -> ChronicleResult<ChangelogDraft> {
        ChangelogDraft::validated(
            self.title.clone().unwrap_or_default(),
            self.content.clone().unwrap_or_default(),
            self.version.clone().unwrap_or_default(),
            self.release_date.flatten(),
        )
    }

    /// Merge the fields over an existing entry and validate the result.
    /// Absent fields keep the stored value.
    pub fn merge_onto(&self, existing: &ChangelogEntry) -> ChronicleResult<ChangelogDraft> {
        ChangelogDraft::validated(
            self.title.clone().unwrap_or_else(|| existing.title.clone()),
            self.content.clone().unwrap_or_else(|| existing.content.clone()),
            self.version.clone().unwrap_or_else(|| existing.version.clone()),
            self.release_date.unwrap_or(existing.release_date),
        )
    }
}

impl ChangelogFields {
    /// Read a loosely typed form submission.
    ///
    /// Text fields accept strings and scalars; `null` counts as blank. A
    /// blank `release_date` clears the date. Values that cannot be read are
    /// left out of the returned fields and reported per field instead; a
    /// body that is not an object is reported under `base`.
    pub fn from_submission(body: &Value) -> (Self, FieldErrors) {
        let mut errors = FieldErrors::new();
        let Some(object) = body.as_object() else {
            push_error(&mut errors, "base", "Submission must be a JSON object");
            return (Self::default(), errors);
        };

        let mut text = |field: &str, label: &str| -> Option<String> {
            match object.get(field)? {
                Value::String(s) => Some(s.clone()),
                Value::Null => Some(String::new()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                Value::Array(_) | Value::Object(_) => {
                    push_error(&mut errors, field, format!("{} is invalid", label));
                    None
                }
            }
        };

        let title = text("title", "Title");
        let content = text("content", "Content");
        let version = text("version", "Version");

        let release_date = match object.get("release_date") {
            None => None,
            Some(Value::Null) => Some(None),
            Some(Value::String(s)) if s.trim().is_empty() => Some(None),
            Some(Value::String(s)) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                Ok(date) => Some(Some(date)),
                Err(_) => {
                    push_error(&mut errors, "release_date", "Release date is not a valid date");
                    None
                }
            },
            Some(_) => {
                push_error(&mut errors, "release_date", "Release date is not a valid date");
                None
            }
        };

        (
            Self {
                title,
                content,
                version,
                release_date,
            },
            errors,
        )
    }
}

fn push_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

impl From<&ChangelogEntry> for ChangelogFields {
    fn from(entry: &ChangelogEntry) -> Self {
        Self {
            title: Some(entry.title.clone()),
            content: Some(entry.content.clone()),
            version: Some(entry.version.clone()),
            release_date: Some(entry.release_date),
        }
    }
}

/// Validated entry content, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDraft {
    pub title: String,
    pub content: String,
    pub version: String,
    pub release_date: Option<NaiveDate>,
}

impl ChangelogDraft {
    fn validated(
        title: String,
        content: String,
        version: String,
        release_date: Option<NaiveDate>,
    ) -> ChronicleResult<Self> {
        let mut errors = FieldErrors::new();
        for (field, label, value) in [
            ("title", "Title", &title),
            ("content", "Content", &content),
            ("version", "Version", &version),
        ] {
            if value.trim().is_empty() {
                errors
                    .entry(field.to_string())
                    .or_default()
                    .push(format!("{} can't be blank", label));
            }
        }

        if !errors.is_empty() {
            return Err(ChronicleError::invalid_fields(errors));
        }

        Ok(Self {
            title,
            content,
            version,
            release_date,
        })
    }
}
