//! Integration tests for the publishing engine against the in-memory store.

use pagesync_engine::{ActionKind, Publisher, SyncConfig, SyncError};
use pagesync_model::{LocalPage, PageMeta, SectionKey, SiteTree};
use pagesync_store::{MemoryStore, PageStore};
use std::collections::HashMap;

const REPO: &str = "org/docs";

fn config() -> SyncConfig {
    SyncConfig::new("Project Docs", REPO)
}

fn page(path: &str, section: Option<&str>) -> LocalPage {
    LocalPage::new(
        title_for(path),
        PageMeta::new(REPO, path),
        format!("<p>{path}</p>"),
    )
    .in_section(section.map_or_else(SectionKey::root, SectionKey::named))
}

fn title_for(path: &str) -> String {
    path.trim_end_matches(".md").to_uppercase()
}

fn sections(entries: &[(&str, Option<&str>)]) -> HashMap<String, SectionKey> {
    entries
        .iter()
        .map(|(name, parent)| {
            (
                name.to_string(),
                parent.map_or_else(SectionKey::root, SectionKey::named),
            )
        })
        .collect()
}

fn site(pages: Vec<LocalPage>, hierarchy: &[(&str, Option<&str>)]) -> SiteTree {
    SiteTree {
        home: None,
        pages,
        sections: sections(hierarchy),
    }
}

#[test]
fn first_publish_builds_the_tree() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let site = site(
        vec![
            page("intro.md", None),
            page("guide.md", Some("docs")),
            page("api.md", Some("docs")),
        ],
        &[("docs", None)],
    );

    let report = publisher.publish(&site).unwrap();

    // Home plus three pages.
    assert_eq!(report.created, 4);
    assert_eq!(report.updated, 0);
    assert_eq!(report.deleted, 0);
    assert_eq!(publisher.store().len(), 4);

    let store = publisher.store();
    let home = store.page(report.home).unwrap();
    assert_eq!(home.title, "Project Docs");
    assert_eq!(home.parent, None);

    // Root pages and docs pages both sit under home: sibling sections
    // share the physical parent.
    for id in 2..=4 {
        assert_eq!(store.page(id).unwrap().parent, Some(report.home));
    }
}

#[test]
fn placeholder_home_is_generated_when_unauthored() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let report = publisher.publish(&site(vec![], &[])).unwrap();

    let body = publisher.store().body(report.home).unwrap();
    assert_eq!(body, "<h1>Project Docs</h1>");
}

#[test]
fn second_identical_run_converges() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let tree = site(
        vec![
            page("intro.md", None),
            page("guide.md", Some("docs")),
            page("deep.md", Some("internals")),
        ],
        &[("docs", None), ("internals", Some("docs"))],
    );

    publisher.publish(&tree).unwrap();
    publisher.store().reset_counters();

    let report = publisher.publish(&tree).unwrap();

    assert!(report.is_converged());
    // Three pages plus the home page, all untouched.
    assert_eq!(report.unchanged, 4);
    assert_eq!(publisher.store().counters().mutations(), 0);
}

#[test]
fn changed_body_updates_in_place() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let before = site(vec![page("guide.md", None)], &[]);
    publisher.publish(&before).unwrap();

    let guide_id = publisher.store().find_page("GUIDE").unwrap().unwrap().id;

    let mut changed = page("guide.md", None);
    changed.body = "<p>rewritten</p>".into();
    let after = site(vec![changed], &[]);
    let report = publisher.publish(&after).unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.created, 0);
    // Matched by path, so the page keeps its id.
    let guide = publisher.store().find_page("GUIDE").unwrap().unwrap();
    assert_eq!(guide.id, guide_id);
    assert_eq!(
        publisher.store().body(guide_id).as_deref(),
        Some("<p>rewritten</p>")
    );
}

#[test]
fn removed_page_is_deleted_exactly_once() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    publisher
        .publish(&site(vec![page("a.md", None), page("b.md", None)], &[]))
        .unwrap();

    let shrunk = site(vec![page("a.md", None)], &[]);
    let report = publisher.publish(&shrunk).unwrap();
    assert_eq!(report.deleted, 1);
    assert!(publisher.store().find_page("B").unwrap().is_none());

    publisher.store().reset_counters();
    let again = publisher.publish(&shrunk).unwrap();
    assert!(again.is_converged());
    assert_eq!(publisher.store().counters().deletes, 0);
}

#[test]
fn new_first_page_becomes_the_section_anchor() {
    // Publish docs with only "b.md", then prepend "a.md" and add a child
    // section. The union for docs is [Create(a), Update(b)], so the child
    // section must nest under the newly created "a.md".
    let publisher = Publisher::new(config(), MemoryStore::new());
    publisher
        .publish(&site(vec![page("b.md", Some("docs"))], &[("docs", None)]))
        .unwrap();

    let grown = site(
        vec![
            page("a.md", Some("docs")),
            page("b.md", Some("docs")),
            page("nested.md", Some("guides")),
        ],
        &[("docs", None), ("guides", Some("docs"))],
    );
    publisher.publish(&grown).unwrap();

    let store = publisher.store();
    let a = store.find_page("A").unwrap().unwrap();
    let nested = store.find_page("NESTED").unwrap().unwrap();
    assert_eq!(nested.parent, Some(a.id));
}

#[test]
fn emptied_section_deletes_its_pages_and_records_no_anchor() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    publisher
        .publish(&site(
            vec![page("a.md", Some("docs")), page("sub.md", Some("guides"))],
            &[("docs", None), ("guides", Some("docs"))],
        ))
        .unwrap();
    publisher.store().reset_counters();

    // docs keeps its declaration but loses all pages; its union is pure
    // deletions, so no anchor is recorded and guides resolves a None
    // parent.
    let emptied = site(
        vec![page("sub.md", Some("guides"))],
        &[("docs", None), ("guides", Some("docs"))],
    );
    let report = publisher.publish(&emptied).unwrap();

    // a.md deleted; sub.md was under a.md, which no longer exists, so it
    // is re-created under the anchorless parent.
    assert_eq!(report.deleted, 1);
    assert!(publisher.store().counters().none_parent_queries >= 1);
    assert!(publisher.store().find_page("SUB").unwrap().is_some());
}

#[test]
fn defunct_section_pages_are_swept() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    publisher
        .publish(&site(
            vec![page("keep.md", None), page("old.md", Some("legacy"))],
            &[("legacy", None)],
        ))
        .unwrap();

    // "legacy" disappears from the hierarchy entirely; its pages under
    // home are stale and must go, while root pages survive.
    let report = publisher
        .publish(&site(vec![page("keep.md", None)], &[]))
        .unwrap();

    assert_eq!(report.deleted, 1);
    assert!(publisher.store().find_page("OLD").unwrap().is_none());
    assert!(publisher.store().find_page("KEEP").unwrap().is_some());
}

#[test]
fn unmanaged_child_of_home_is_swept() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let tree = site(vec![page("a.md", None)], &[]);
    let report = publisher.publish(&tree).unwrap();

    publisher
        .store()
        .insert_unmanaged("Handmade", Some(report.home));
    let report = publisher.publish(&tree).unwrap();

    assert_eq!(report.deleted, 1);
    assert!(publisher.store().find_page("Handmade").unwrap().is_none());
}

#[test]
fn sibling_sections_do_not_delete_each_other() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let tree = site(
        vec![page("a.md", Some("alpha")), page("b.md", Some("beta"))],
        &[("alpha", None), ("beta", None)],
    );

    publisher.publish(&tree).unwrap();
    publisher.store().reset_counters();

    // Both pages live under home; reconciling "alpha" must not treat
    // "beta"'s page as a leftover.
    let report = publisher.publish(&tree).unwrap();
    assert!(report.is_converged());
    assert!(publisher.store().find_page("A").unwrap().is_some());
    assert!(publisher.store().find_page("B").unwrap().is_some());
}

#[test]
fn reparented_section_leaves_no_page_behind() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let before = site(
        vec![
            page("a.md", Some("alpha")),
            page("b.md", Some("beta")),
            page("s.md", Some("sub")),
        ],
        &[("alpha", None), ("beta", None), ("sub", Some("alpha"))],
    );
    publisher.publish(&before).unwrap();

    // "sub" moves under "beta", leaving "alpha" with no child sections.
    // The old copy of "s.md" sits under alpha's anchor, which only
    // alpha's own reconciler visits now.
    let after = site(
        vec![
            page("a.md", Some("alpha")),
            page("b.md", Some("beta")),
            page("s.md", Some("sub")),
        ],
        &[("alpha", None), ("beta", None), ("sub", Some("beta"))],
    );

    let plans = publisher.plan(&after).unwrap();
    let alpha = plans
        .iter()
        .find(|p| p.section == SectionKey::named("alpha"))
        .expect("alpha plan");
    assert!(alpha
        .actions
        .iter()
        .any(|a| a.kind == ActionKind::Delete && a.path.as_deref() == Some("s.md")));

    let report = publisher.publish(&after).unwrap();
    assert_eq!(report.deleted, 1);
    assert_eq!(report.created, 1);

    let b_id = publisher.store().find_page("B").unwrap().unwrap().id;
    let s = publisher.store().find_page("S").unwrap().unwrap();
    assert_eq!(s.parent, Some(b_id));
    // Home, a.md, b.md and the single moved page.
    assert_eq!(publisher.store().len(), 4);

    publisher.store().reset_counters();
    let report = publisher.publish(&after).unwrap();
    assert!(report.is_converged());
    assert_eq!(publisher.store().counters().mutations(), 0);
}

#[test]
fn foreign_repo_home_aborts_before_any_mutation() {
    // Another project already owns the "Project Docs" title.
    let theirs = Publisher::new(SyncConfig::new("Project Docs", "other/repo"), MemoryStore::new());
    theirs.publish(&site(vec![], &[])).unwrap();
    let store = theirs.into_store();
    store.reset_counters();

    let publisher = Publisher::new(config(), store);
    let err = publisher
        .publish(&site(vec![page("a.md", None)], &[]))
        .unwrap_err();

    match err {
        SyncError::RepoConflict { theirs, ours, .. } => {
            assert_eq!(theirs, "other/repo");
            assert_eq!(ours, REPO);
        }
        other => panic!("expected RepoConflict, got {other}"),
    }
    assert_eq!(publisher.store().counters().mutations(), 0);
}

#[test]
fn unmanaged_home_title_holder_is_a_conflict() {
    let store = MemoryStore::new();
    store.insert_unmanaged("Project Docs", None);

    let publisher = Publisher::new(config(), store);
    let err = publisher.publish(&site(vec![], &[])).unwrap_err();
    assert!(matches!(err, SyncError::RepoConflict { .. }));
}

#[test]
fn missing_parent_page_fails_fast() {
    let publisher = Publisher::new(
        config().with_parent_page("Team Space"),
        MemoryStore::new(),
    );
    let err = publisher.publish(&site(vec![], &[])).unwrap_err();

    assert!(matches!(err, SyncError::ParentNotFound(ref t) if t == "Team Space"));
    assert_eq!(publisher.store().counters().mutations(), 0);
}

#[test]
fn home_nests_under_the_configured_parent() {
    let store = MemoryStore::new();
    let space = store.insert_unmanaged("Team Space", None);

    let publisher = Publisher::new(config().with_parent_page("Team Space"), store);
    let report = publisher.publish(&site(vec![], &[])).unwrap();

    let home = publisher.store().page(report.home).unwrap();
    assert_eq!(home.parent, Some(space));
}

#[test]
fn cyclic_hierarchy_fails_before_any_remote_call() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let err = publisher
        .publish(&site(
            vec![page("a.md", Some("a"))],
            &[("a", Some("b")), ("b", Some("a"))],
        ))
        .unwrap_err();

    assert!(matches!(err, SyncError::CyclicHierarchy(_)));
    assert_eq!(publisher.store().counters().mutations(), 0);
    assert_eq!(publisher.store().counters().child_queries, 0);
}

#[test]
fn duplicate_path_in_one_section_fails_fast() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let err = publisher
        .publish(&site(vec![page("a.md", None), page("a.md", None)], &[]))
        .unwrap_err();

    assert!(matches!(err, SyncError::DuplicatePath { ref path, .. } if path == "a.md"));
    assert_eq!(publisher.store().counters().mutations(), 0);
}

#[test]
fn unreachable_section_is_skipped_not_fatal() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let report = publisher
        .publish(&site(
            vec![page("a.md", None), page("lost.md", Some("orphan"))],
            &[("orphan", Some("ghost"))],
        ))
        .unwrap();

    // Home plus the root page; the orphan section is never visited.
    assert_eq!(report.created, 2);
    assert!(publisher.store().find_page("LOST").unwrap().is_none());
}

#[test]
fn plan_previews_without_mutating() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let tree = site(
        vec![page("intro.md", None), page("guide.md", Some("docs"))],
        &[("docs", None)],
    );

    let plans = publisher.plan(&tree).unwrap();

    assert_eq!(publisher.store().counters().mutations(), 0);
    assert!(publisher.store().is_empty());

    let root = plans
        .iter()
        .find(|p| p.section.is_root())
        .expect("root plan");
    assert!(root
        .actions
        .iter()
        .any(|a| a.kind == ActionKind::Create && a.path.as_deref() == Some("intro.md")));
    // The docs anchor does not exist yet, so its page plans as a create.
    let docs = plans
        .iter()
        .find(|p| p.section == SectionKey::named("docs"))
        .expect("docs plan");
    assert_eq!(docs.actions.len(), 1);
    assert_eq!(docs.actions[0].kind, ActionKind::Create);
}

#[test]
fn plan_after_publish_is_empty() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let tree = site(
        vec![page("intro.md", None), page("guide.md", Some("docs"))],
        &[("docs", None)],
    );
    publisher.publish(&tree).unwrap();
    publisher.store().reset_counters();

    let plans = publisher.plan(&tree).unwrap();
    assert!(plans.is_empty());
    assert_eq!(publisher.store().counters().mutations(), 0);
}

#[test]
fn unpublish_removes_children_then_home() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    publisher
        .publish(&site(
            vec![page("a.md", None), page("b.md", Some("docs"))],
            &[("docs", None)],
        ))
        .unwrap();

    let report = publisher.unpublish().unwrap();

    assert!(report.home_found);
    assert_eq!(report.deleted, 3);
    assert!(publisher.store().is_empty());
}

#[test]
fn unpublish_without_home_is_a_noop() {
    let publisher = Publisher::new(config(), MemoryStore::new());
    let report = publisher.unpublish().unwrap();

    assert!(!report.home_found);
    assert_eq!(report.deleted, 0);
    assert_eq!(publisher.store().counters().mutations(), 0);
}
