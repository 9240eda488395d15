use std::sync::Arc;

use diffnav_common::{ChangeStatus, FileChange, HunkStat, RenderRequest, RenderResult};
use diffnav_core::{Lookup, RenderCache, RenderParams, StoreOutcome};

fn change(path: &str, status: ChangeStatus) -> Arc<FileChange> {
    Arc::new(FileChange {
        old_path: path.to_string(),
        new_path: path.to_string(),
        status,
        hunks: vec![HunkStat {
            lines_added: 2,
            lines_deleted: 1,
        }],
        patch: format!("--- a/{path}\n+++ b/{path}\n@@ -1 +1,2 @@\n-x\n+y\n+z\n"),
    })
}

const PARAMS: RenderParams = RenderParams {
    width: 80,
    side_by_side: true,
};

fn request(cache: &mut RenderCache, key: &str, params: RenderParams) -> Option<RenderRequest> {
    let member = change(key, ChangeStatus::Modified);
    match cache.get(key, || vec![member], params) {
        Lookup::Requested(req) => Some(req),
        Lookup::Ready(_) | Lookup::Pending => None,
    }
}

fn done(req: &RenderRequest, text: &str) -> RenderResult {
    RenderResult {
        key: req.key.clone(),
        generation: req.generation,
        outcome: Ok(text.to_string()),
    }
}

#[test]
fn repeated_lookups_issue_one_request() {
    let mut cache = RenderCache::new();
    let first = request(&mut cache, "a.rs", PARAMS).expect("first lookup requests");
    assert_eq!(request(&mut cache, "a.rs", PARAMS), None, "pending lookup");

    assert_eq!(cache.store(done(&first, "styled")), StoreOutcome::Rendered);
    for _ in 0..5 {
        assert_eq!(
            cache.get("a.rs", Vec::new, PARAMS),
            Lookup::Ready("styled")
        );
    }
}

#[test]
fn entry_aggregates_member_stats_and_patches() {
    let mut cache = RenderCache::new();
    let members = vec![
        change("d/a.rs", ChangeStatus::Modified),
        change("d/b.rs", ChangeStatus::Modified),
    ];
    let req = match cache.get("d/", || members, PARAMS) {
        Lookup::Requested(req) => req,
        other => panic!("expected request, got {other:?}"),
    };
    let entry = cache.entry("d/").unwrap();
    assert_eq!((entry.added, entry.deleted), (4, 2));
    assert!(req.patch.contains("+++ b/d/a.rs"));
    assert!(req.patch.contains("+++ b/d/b.rs"));
    assert_eq!(req.width, 80);
}

#[test]
fn whole_file_changes_never_render_side_by_side() {
    let mut cache = RenderCache::new();
    let added = change("new.rs", ChangeStatus::Added);
    let Lookup::Requested(req) = cache.get("new.rs", || vec![added], PARAMS) else {
        panic!("expected request");
    };
    assert!(!req.side_by_side);

    let req = request(&mut cache, "mod.rs", PARAMS).unwrap();
    assert!(req.side_by_side);
}

#[test]
fn refresh_reissues_only_the_given_key() {
    let mut cache = RenderCache::new();
    let a = request(&mut cache, "a.rs", PARAMS).unwrap();
    let b = request(&mut cache, "b.rs", PARAMS).unwrap();
    cache.store(done(&a, "a80"));
    cache.store(done(&b, "b80"));

    let narrow = RenderParams {
        width: 40,
        side_by_side: false,
    };
    let again = cache.refresh("a.rs", narrow).unwrap();
    assert_eq!(again.key, "a.rs");
    assert_eq!(again.width, 40);
    assert!(!again.side_by_side);
    assert!(again.generation > a.generation);

    // old text stays until the new render lands
    assert_eq!(cache.entry("a.rs").unwrap().text(), Some("a80"));
    assert_eq!(cache.entry("b.rs").unwrap().text(), Some("b80"));
    assert_eq!(cache.refresh("missing.rs", narrow), None);

    cache.store(done(&again, "a40"));
    assert_eq!(cache.entry("a.rs").unwrap().text(), Some("a40"));
}

#[test]
fn superseded_result_is_dropped() {
    let mut cache = RenderCache::new();
    let old = request(&mut cache, "a.rs", PARAMS).unwrap();
    let new = cache.refresh("a.rs", PARAMS).unwrap();

    assert_eq!(cache.store(done(&old, "old")), StoreOutcome::Stale);
    assert_eq!(cache.entry("a.rs").unwrap().text(), None);
    assert_eq!(cache.store(done(&new, "new")), StoreOutcome::Rendered);
    assert_eq!(cache.entry("a.rs").unwrap().text(), Some("new"));
}

#[test]
fn late_result_fills_its_own_entry() {
    let mut cache = RenderCache::new();
    let a = request(&mut cache, "a.rs", PARAMS).unwrap();
    let _b = request(&mut cache, "b.rs", PARAMS).unwrap();

    assert_eq!(cache.store(done(&a, "late a")), StoreOutcome::Rendered);
    assert_eq!(cache.entry("a.rs").unwrap().text(), Some("late a"));
    assert_eq!(cache.entry("b.rs").unwrap().text(), None);
}

#[test]
fn result_for_unknown_key_is_ignored() {
    let mut cache = RenderCache::new();
    let result = RenderResult {
        key: "ghost.rs".into(),
        generation: 1,
        outcome: Ok("boo".into()),
    };
    assert_eq!(cache.store(result), StoreOutcome::Stale);
    assert!(cache.is_empty());
}

#[test]
fn formatter_failure_falls_back_to_raw_patch() {
    let mut cache = RenderCache::new();
    let req = request(&mut cache, "a.rs", PARAMS).unwrap();
    let outcome = cache.store(RenderResult {
        key: req.key.clone(),
        generation: req.generation,
        outcome: Err("delta: not found".into()),
    });
    assert_eq!(outcome, StoreOutcome::Fallback("delta: not found".into()));
    assert_eq!(cache.entry("a.rs").unwrap().text(), Some(req.patch.as_str()));
    assert_eq!(request(&mut cache, "a.rs", PARAMS), None);
}
