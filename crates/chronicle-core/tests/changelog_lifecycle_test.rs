//! Integration tests for the changelog lifecycle across both surfaces.

use std::sync::Arc;

use chrono::NaiveDate;
use chronicle_core::{
    AdminOutcome, AdminSurface, ChangelogFields, ChangelogStore, PublicSurface,
    SqliteChangelogStore,
};

fn surfaces() -> (Arc<SqliteChangelogStore>, PublicSurface, AdminSurface) {
    let store = Arc::new(SqliteChangelogStore::in_memory().unwrap());
    let public = PublicSurface::new(store.clone());
    let admin = AdminSurface::new(store.clone());
    (store, public, admin)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Create, list, patch, and destroy one release end to end.
#[test]
fn test_release_lifecycle() {
    let (_, public, admin) = surfaces();

    for (version, release_date) in [("1.0.0", date(2024, 1, 1)), ("1.0.0-rc", date(2023, 12, 1))] {
        admin
            .create(
                ChangelogFields::new()
                    .with_title("Older")
                    .with_content("- earlier work")
                    .with_version(version)
                    .with_release_date(release_date),
            )
            .unwrap();
    }

    let outcome = admin
        .create(
            ChangelogFields::new()
                .with_title("Release")
                .with_content("- fix bug")
                .with_version("1.0.1")
                .with_release_date(date(2025, 4, 2)),
        )
        .unwrap();
    let id = match outcome {
        AdminOutcome::Redirect { notice, entry } => {
            assert!(notice.is_success());
            entry.unwrap().id
        }
        other => panic!("expected redirect, got {:?}", other),
    };

    let page = public.list_page(1).unwrap();
    assert_eq!(page.items[0].id, id);
    assert_eq!(page.total_count, 3);

    let loaded = admin.load_for_edit(id).unwrap();
    let outcome = admin
        .update(loaded, ChangelogFields::new().with_title("Release (patched)"))
        .unwrap();
    assert!(outcome.is_redirect());
    assert_eq!(public.show_detail(id).unwrap().title, "Release (patched)");
    assert_eq!(public.show_detail(id).unwrap().content, "- fix bug");

    let loaded = admin.load_for_edit(id).unwrap();
    let outcome = admin.destroy(loaded).unwrap();
    assert!(outcome.notice().is_success());

    assert!(public.show_detail(id).unwrap_err().is_not_found());
    assert!(admin.load_for_edit(id).unwrap_err().is_not_found());
    assert_eq!(public.list_page(1).unwrap().total_count, 2);
}

/// Rejected writes leave the listing exactly as it was.
#[test]
fn test_rejected_writes_leave_store_unchanged() {
    let (store, public, admin) = surfaces();
    let existing = store
        .create(
            &ChangelogFields::new()
                .with_title("Stable")
                .with_content("- notes")
                .with_version("1.0.0"),
        )
        .unwrap();
    let before = public.list_page(1).unwrap();

    let blanks = [
        ChangelogFields::new().with_content("- a").with_version("1"),
        ChangelogFields::new().with_title("t").with_version("1"),
        ChangelogFields::new().with_title("t").with_content("- a"),
        ChangelogFields::new().with_title("").with_content("- a").with_version("1"),
    ];
    for fields in blanks {
        let outcome = admin.create(fields.clone()).unwrap();
        assert!(!outcome.is_redirect(), "create accepted {:?}", fields);
    }

    for fields in [
        ChangelogFields::new().with_title(" "),
        ChangelogFields::new().with_content(""),
        ChangelogFields::new().with_version("\n"),
    ] {
        let loaded = admin.load_for_edit(existing.id).unwrap();
        let outcome = admin.update(loaded, fields.clone()).unwrap();
        assert!(!outcome.is_redirect(), "update accepted {:?}", fields);
    }

    assert_eq!(public.list_page(1).unwrap(), before);
}

/// Version labels are free text and may repeat.
#[test]
fn test_duplicate_versions_permitted() {
    let (_, public, admin) = surfaces();
    for title in ["First", "Second"] {
        let outcome = admin
            .create(
                ChangelogFields::new()
                    .with_title(title)
                    .with_content("- same version")
                    .with_version("2.0.0"),
            )
            .unwrap();
        assert!(outcome.is_redirect());
    }
    assert_eq!(public.list_page(1).unwrap().total_count, 2);
}

/// Missing identities are always reported as not found.
#[test]
fn test_missing_identity_is_not_found_everywhere() {
    let (store, public, admin) = surfaces();
    assert!(store.get(12).unwrap_err().is_not_found());
    assert!(store.delete(12).unwrap_err().is_not_found());
    assert!(public.show_detail(12).unwrap_err().is_not_found());
    assert!(admin.load_for_edit(12).unwrap_err().is_not_found());
}
