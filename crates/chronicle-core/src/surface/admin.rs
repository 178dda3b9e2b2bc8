//! Privileged create/update/delete access.
//!
//! Callers reaching this surface have already been admitted by an external
//! authorization layer. Every write resolves to an [`AdminOutcome`]: either
//! a redirect to the list view or a re-rendered form, each paired with a
//! one-shot [`Notice`]. Validation failures never escape as errors.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ChronicleError, ChronicleResult, FieldErrors};
use crate::store::ChangelogStore;
use crate::types::{ChangelogEntry, ChangelogFields, Page};

use super::notice::{self, Notice};
use super::DEFAULT_PAGE_SIZE;

/// The form a rejected submission is re-rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum FormView {
    New,
    Edit { id: i64 },
}

/// Terminal state of an admin write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdminOutcome {
    /// Go back to the admin list view.
    Redirect {
        notice: Notice,
        #[serde(skip_serializing_if = "Option::is_none")]
        entry: Option<ChangelogEntry>,
    },
    /// Show the form again with the submitted input and field errors.
    Rerender {
        form: FormView,
        input: ChangelogFields,
        errors: FieldErrors,
        notice: Notice,
    },
}

impl AdminOutcome {
    pub fn notice(&self) -> &Notice {
        match self {
            Self::Redirect { notice, .. } | Self::Rerender { notice, .. } => notice,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }
}

/// An entry resolved by [`AdminSurface::load_for_edit`].
///
/// `update` and `destroy` only accept a loaded entry, so a target must be
/// resolved before it can be changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedEntry {
    entry: ChangelogEntry,
}

impl LoadedEntry {
    pub fn id(&self) -> i64 {
        self.entry.id
    }

    pub fn entry(&self) -> &ChangelogEntry {
        &self.entry
    }

    /// The entry as an edit form, pre-filled with its stored values.
    pub fn form(&self) -> ChangelogFields {
        ChangelogFields::from(&self.entry)
    }

    pub fn into_entry(self) -> ChangelogEntry {
        self.entry
    }
}

/// Admin management views over the store.
#[derive(Clone)]
pub struct AdminSurface {
    store: Arc<dyn ChangelogStore>,
    page_size: u32,
}

impl AdminSurface {
    pub fn new(store: Arc<dyn ChangelogStore>) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the listing page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn list_page(&self, page_number: u32) -> ChronicleResult<Page<ChangelogEntry>> {
        super::list_page(self.store.as_ref(), page_number, self.page_size)
    }

    /// A blank form for a new entry.
    pub fn new_form(&self) -> ChangelogFields {
        ChangelogFields::new()
    }

    pub fn load_for_edit(&self, id: i64) -> ChronicleResult<LoadedEntry> {
        let entry = self.store.get(id)?;
        Ok(LoadedEntry { entry })
    }

    pub fn create(&self, fields: ChangelogFields) -> ChronicleResult<AdminOutcome> {
        match self.store.create(&fields) {
            Ok(entry) => {
                info!(id = entry.id, version = %entry.version, "Changelog created");
                Ok(AdminOutcome::Redirect {
                    notice: Notice::success(notice::CREATED),
                    entry: Some(entry),
                })
            }
            Err(err @ ChronicleError::Validation { .. }) => {
                warn!(error = %err, "Changelog create rejected");
                Ok(AdminOutcome::Rerender {
                    form: FormView::New,
                    errors: err.field_errors(),
                    input: fields,
                    notice: Notice::failure(notice::CREATE_FAILED),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Create from a raw form submission. Unreadable values are reported
    /// together with any blank-field errors on the re-rendered form.
    pub fn create_submission(&self, body: &serde_json::Value) -> ChronicleResult<AdminOutcome> {
        let (fields, mut errors) = ChangelogFields::from_submission(body);
        if errors.is_empty() {
            return self.create(fields);
        }
        if let Err(err) = fields.to_draft() {
            merge_errors(&mut errors, err.field_errors());
        }
        warn!(?errors, "Changelog create rejected");
        Ok(AdminOutcome::Rerender {
            form: FormView::New,
            input: fields,
            errors,
            notice: Notice::failure(notice::CREATE_FAILED),
        })
    }

    /// Update from a raw form submission, like [`create_submission`](Self::create_submission).
    pub fn update_submission(
        &self,
        loaded: LoadedEntry,
        body: &serde_json::Value,
    ) -> ChronicleResult<AdminOutcome> {
        let (fields, mut errors) = ChangelogFields::from_submission(body);
        if errors.is_empty() {
            return self.update(loaded, fields);
        }
        if let Err(err) = fields.merge_onto(loaded.entry()) {
            merge_errors(&mut errors, err.field_errors());
        }
        let id = loaded.id();
        warn!(id, ?errors, "Changelog update rejected");
        Ok(AdminOutcome::Rerender {
            form: FormView::Edit { id },
            input: fields,
            errors,
            notice: Notice::failure(notice::UPDATE_FAILED),
        })
    }

    /// A target deleted by someone else since it was loaded surfaces as
    /// `Err(NotFound)`.
    pub fn update(
        &self,
        loaded: LoadedEntry,
        fields: ChangelogFields,
    ) -> ChronicleResult<AdminOutcome> {
        let id = loaded.id();
        match self.store.update(id, &fields) {
            Ok(entry) => {
                info!(id, version = %entry.version, "Changelog updated");
                Ok(AdminOutcome::Redirect {
                    notice: Notice::success(notice::UPDATED),
                    entry: Some(entry),
                })
            }
            Err(err @ ChronicleError::Validation { .. }) => {
                warn!(id, error = %err, "Changelog update rejected");
                Ok(AdminOutcome::Rerender {
                    form: FormView::Edit { id },
                    errors: err.field_errors(),
                    input: fields,
                    notice: Notice::failure(notice::UPDATE_FAILED),
                })
            }
            Err(err) => {
                warn!(id, error = %err, "Changelog update failed");
                Err(err)
            }
        }
    }

    /// Always redirects back to the list; a vanished target yields a
    /// failure notice instead of an error.
    pub fn destroy(&self, loaded: LoadedEntry) -> ChronicleResult<AdminOutcome> {
        let id = loaded.id();
        match self.store.delete(id) {
            Ok(()) => {
                info!(id, "Changelog deleted");
                Ok(AdminOutcome::Redirect {
                    notice: Notice::success(notice::DELETED),
                    entry: None,
                })
            }
            Err(err @ ChronicleError::NotFound { .. }) => {
                warn!(id, error = %err, "Changelog delete failed");
                Ok(AdminOutcome::Redirect {
                    notice: Notice::failure(notice::DELETE_FAILED),
                    entry: None,
                })
            }
            Err(err) => Err(err),
        }
    }
}

fn merge_errors(errors: &mut FieldErrors, more: FieldErrors) {
    for (field, messages) in more {
        errors.entry(field).or_default().extend(messages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MockChangelogStore, SqliteChangelogStore};
    use crate::surface::NoticeKind;
    use chrono::{NaiveDate, Utc};

    fn valid_fields() -> ChangelogFields {
        ChangelogFields::new()
            .with_title("Release")
            .with_content("- fix bug")
            .with_version("1.0.1")
            .with_release_date(NaiveDate::from_ymd_opt(2025, 4, 2).unwrap())
    }

    fn sqlite_surface() -> (Arc<SqliteChangelogStore>, AdminSurface) {
        let store = Arc::new(SqliteChangelogStore::in_memory().unwrap());
        let surface = AdminSurface::new(store.clone());
        (store, surface)
    }

    fn sample_entry(id: i64) -> ChangelogEntry {
        ChangelogEntry {
            id,
            title: "Release".to_string(),
            content: "- fix bug".to_string(),
            version: "1.0.1".to_string(),
            release_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_redirects_with_success_notice() {
        let (store, surface) = sqlite_surface();
        let outcome = surface.create(valid_fields()).unwrap();

        match outcome {
            AdminOutcome::Redirect { notice, entry } => {
                assert_eq!(notice, Notice::success("Changelog was successfully created."));
                let entry = entry.unwrap();
                assert_eq!(store.get(entry.id).unwrap().title, "Release");
            }
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_create_rerenders_new_form() {
        let (store, surface) = sqlite_surface();
        let input = ChangelogFields::new().with_title("Draft").with_content("- wip");
        let outcome = surface.create(input.clone()).unwrap();

        match outcome {
            AdminOutcome::Rerender {
                form,
                input: echoed,
                errors,
                notice,
            } => {
                assert_eq!(form, FormView::New);
                assert_eq!(echoed, input);
                assert_eq!(errors["version"], vec!["Version can't be blank"]);
                assert_eq!(notice.kind, NoticeKind::Failure);
            }
            other => panic!("expected rerender, got {:?}", other),
        }
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_new_form_is_blank() {
        let (_, surface) = sqlite_surface();
        assert_eq!(surface.new_form(), ChangelogFields::default());
    }

    #[test]
    fn test_load_for_edit_prefills_form() {
        let (store, surface) = sqlite_surface();
        let created = store.create(&valid_fields()).unwrap();

        let loaded = surface.load_for_edit(created.id).unwrap();
        assert_eq!(loaded.id(), created.id);
        assert_eq!(loaded.form().title.as_deref(), Some("Release"));
    }

    #[test]
    fn test_load_for_edit_missing() {
        let (_, surface) = sqlite_surface();
        assert!(surface.load_for_edit(1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_redirects_with_success_notice() {
        let (store, surface) = sqlite_surface();
        let created = store.create(&valid_fields()).unwrap();
        let loaded = surface.load_for_edit(created.id).unwrap();

        let outcome = surface
            .update(loaded, ChangelogFields::new().with_title("Release (patched)"))
            .unwrap();
        assert!(outcome.is_redirect());
        assert_eq!(outcome.notice().message, "Changelog was successfully updated.");
        assert_eq!(store.get(created.id).unwrap().title, "Release (patched)");
    }

    #[test]
    fn test_invalid_update_rerenders_edit_form() {
        let (store, surface) = sqlite_surface();
        let created = store.create(&valid_fields()).unwrap();
        let loaded = surface.load_for_edit(created.id).unwrap();

        let outcome = surface
            .update(loaded, ChangelogFields::new().with_title(""))
            .unwrap();
        match outcome {
            AdminOutcome::Rerender { form, errors, notice, .. } => {
                assert_eq!(form, FormView::Edit { id: created.id });
                assert!(errors.contains_key("title"));
                assert_eq!(notice.message, "Failed to update changelog.");
            }
            other => panic!("expected rerender, got {:?}", other),
        }
        assert_eq!(store.get(created.id).unwrap().title, "Release");
    }

    #[test]
    fn test_destroy_twice_reports_failure_second_time() {
        let (store, surface) = sqlite_surface();
        let created = store.create(&valid_fields()).unwrap();
        let loaded = surface.load_for_edit(created.id).unwrap();

        let first = surface.destroy(loaded.clone()).unwrap();
        assert!(first.is_redirect());
        assert!(first.notice().is_success());

        let second = surface.destroy(loaded).unwrap();
        assert!(second.is_redirect());
        assert_eq!(second.notice(), &Notice::failure("Failed to delete changelog."));
    }

    #[test]
    fn test_update_after_concurrent_delete_is_hard_failure() {
        let mut store = MockChangelogStore::new();
        store.expect_get().returning(|id| Ok(sample_entry(id)));
        store
            .expect_update()
            .returning(|id, _| Err(ChronicleError::not_found(id)));

        let surface = AdminSurface::new(Arc::new(store));
        let loaded = surface.load_for_edit(5).unwrap();
        let err = surface
            .update(loaded, ChangelogFields::new().with_title("Late edit"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_store_failure_propagates_from_destroy() {
        let mut store = MockChangelogStore::new();
        store.expect_get().returning(|id| Ok(sample_entry(id)));
        store
            .expect_delete()
            .returning(|_| Err(ChronicleError::database("disk I/O error")));

        let surface = AdminSurface::new(Arc::new(store));
        let loaded = surface.load_for_edit(5).unwrap();
        let err = surface.destroy(loaded).unwrap_err();
        assert!(matches!(err, ChronicleError::Database { .. }));
    }

    #[test]
    fn test_store_failure_propagates_from_create() {
        let mut store = MockChangelogStore::new();
        store
            .expect_create()
            .returning(|_| Err(ChronicleError::database("database is locked")));

        let surface = AdminSurface::new(Arc::new(store));
        assert!(surface.create(valid_fields()).is_err());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = AdminOutcome::Rerender {
            form: FormView::Edit { id: 3 },
            input: ChangelogFields::new().with_title(""),
            errors: FieldErrors::new(),
            notice: Notice::failure("Failed to update changelog."),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "rerender");
        assert_eq!(json["form"]["view"], "edit");
        assert_eq!(json["form"]["id"], 3);
        assert_eq!(json["notice"]["kind"], "failure");
    }

    #[test]
    fn test_create_submission_with_bad_date_rerenders() {
        let (store, surface) = sqlite_surface();
        let body = serde_json::json!({
            "title": "Release",
            "content": "- fix bug",
            "release_date": "not-a-date",
        });

        match surface.create_submission(&body).unwrap() {
            AdminOutcome::Rerender {
                form,
                input,
                errors,
                notice,
            } => {
                assert_eq!(form, FormView::New);
                assert_eq!(input.title.as_deref(), Some("Release"));
                assert_eq!(errors["release_date"], vec!["Release date is not a valid date"]);
                assert_eq!(errors["version"], vec!["Version can't be blank"]);
                assert_eq!(notice, Notice::failure("Failed to create changelog."));
            }
            other => panic!("expected rerender, got {:?}", other),
        }
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_create_submission_accepts_scalar_version() {
        let (store, surface) = sqlite_surface();
        let body = serde_json::json!({"title": "Release", "content": "- x", "version": 3});

        let outcome = surface.create_submission(&body).unwrap();
        assert!(outcome.is_redirect());
        assert_eq!(store.find_by_version("3").unwrap().unwrap().title, "Release");
    }

    #[test]
    fn test_update_submission_with_bad_date_keeps_entry() {
        let (store, surface) = sqlite_surface();
        let created = store.create(&valid_fields()).unwrap();
        let loaded = surface.load_for_edit(created.id).unwrap();
        let body = serde_json::json!({"title": "Renamed", "release_date": "2025-13-40"});

        match surface.update_submission(loaded, &body).unwrap() {
            AdminOutcome::Rerender { form, errors, .. } => {
                assert_eq!(form, FormView::Edit { id: created.id });
                assert_eq!(errors.len(), 1);
                assert!(errors.contains_key("release_date"));
            }
            other => panic!("expected rerender, got {:?}", other),
        }
        assert_eq!(store.get(created.id).unwrap(), created);
    }
}
