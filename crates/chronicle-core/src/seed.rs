//! Sample release history for fresh installations.

use chrono::{Duration, NaiveDate, Utc};
use tracing::info;

use crate::error::ChronicleResult;
use crate::store::ChangelogStore;
use crate::types::ChangelogFields;

/// A sample release, dated relative to the seeding day.
#[derive(Debug, Clone, Copy)]
pub struct SeedRelease {
    pub title: &'static str,
    pub version: &'static str,
    pub content: &'static str,
    pub days_ago: i64,
}

/// Newest first.
pub const DEFAULT_RELEASES: &[SeedRelease] = &[
    SeedRelease {
        title: "Brand new interface design",
        version: "2.5.0",
        content: "- Redesigned the blog home page and article page\n- Improved mobile layout\n- Added dark mode\n- Better syntax highlighting in code blocks\n- Fixed several known UI bugs",
        days_ago: 14,
    },
    SeedRelease {
        title: "Comment system upgrade",
        version: "2.4.0",
        content: "- Reply notifications for comments\n- Markdown support in comments\n- Streamlined comment moderation\n- Stronger spam filtering\n- Fixed inaccurate comment counts",
        days_ago: 45,
    },
    SeedRelease {
        title: "Tag system improvements",
        version: "2.3.0",
        content: "- Tag cloud\n- Faster tag search\n- Related tag suggestions\n- Subscribe to content by tag\n- Reworked tag administration",
        days_ago: 90,
    },
    SeedRelease {
        title: "Performance work",
        version: "2.2.0",
        content: "- Faster page loads\n- More efficient database queries\n- Partial content caching\n- Fewer HTTP requests\n- Compressed static assets",
        days_ago: 180,
    },
    SeedRelease {
        title: "Initial release",
        version: "1.0.0",
        content: "- Core blog features\n- Publishing and editing articles\n- Basic comments\n- Simple user accounts\n- Responsive design",
        days_ago: 365,
    },
];

impl SeedRelease {
    pub fn fields(&self, today: NaiveDate) -> ChangelogFields {
        ChangelogFields::new()
            .with_title(self.title)
            .with_content(self.content)
            .with_version(self.version)
            .with_release_date(today - Duration::days(self.days_ago))
    }
}

/// Insert the default releases, skipping any version already present.
pub fn seed_defaults(store: &dyn ChangelogStore) -> ChronicleResult<usize> {
    seed_releases(store, DEFAULT_RELEASES, Utc::now().date_naive())
}

/// Insert `releases` dated relative to `today`. Returns how many were created.
pub fn seed_releases(
    store: &dyn ChangelogStore,
    releases: &[SeedRelease],
    today: NaiveDate,
) -> ChronicleResult<usize> {
    let mut created = 0;
    for release in releases {
        if store.find_by_version(release.version)?.is_some() {
            continue;
        }
        let entry = store.create(&release.fields(today))?;
        info!(id = entry.id, version = %entry.version, "Seeded changelog");
        created += 1;
    }
    Ok(created)
}
