//! Integration tests — membership invariants enforced over data read
//! through the repository seam, the way a project service consumes it.

use taskdesk_core::authz::{self, Actor};
use taskdesk_core::models::identity::SystemRole;
use taskdesk_core::models::project::{MembershipRole, ProjectMembership};
use taskdesk_core::store::MembershipRepository;
use taskdesk_core::store::memory::MemoryStore;

const PROJECT: &str = "p1";

fn membership(user_id: &str, role: MembershipRole) -> ProjectMembership {
    ProjectMembership {
        project_id: PROJECT.into(),
        user_id: user_id.into(),
        role,
    }
}

/// Store with one admin (`ann`, the creator), one editor, one viewer,
/// plus a membership in an unrelated project.
fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    store.seed_membership(membership("ann", MembershipRole::Admin));
    store.seed_membership(membership("ed", MembershipRole::Edit));
    store.seed_membership(membership("vi", MembershipRole::View));
    store.seed_membership(ProjectMembership {
        project_id: "other".into(),
        user_id: "stranger".into(),
        role: MembershipRole::Admin,
    });
    store
}

#[tokio::test]
async fn list_is_scoped_to_the_project() {
    let store = seeded();
    let members = store.list_for_project(PROJECT).await.unwrap();
    assert_eq!(3, members.len());
    assert!(members.iter().all(|m| m.project_id == PROJECT));
}

#[tokio::test]
async fn removing_the_last_admin_is_rejected_and_state_is_unchanged() {
    let store = seeded();
    let members = store.list_for_project(PROJECT).await.unwrap();

    let err = authz::ensure_admin_remains(&members, "ann").unwrap_err();
    assert_eq!("ERR_PERMISSION", err.code());

    // The guard performed no mutation; a re-read sees the same rows.
    let after = store.list_for_project(PROJECT).await.unwrap();
    assert_eq!(3, after.len());
    assert!(
        after
            .iter()
            .any(|m| m.user_id == "ann" && m.role == MembershipRole::Admin)
    );
}

#[tokio::test]
async fn removal_passes_once_a_second_admin_exists() {
    let store = seeded();
    store.seed_membership(membership("bea", MembershipRole::Admin));

    let members = store.list_for_project(PROJECT).await.unwrap();
    assert!(authz::ensure_admin_remains(&members, "ann").is_ok());
    // Non-admin departures never trip the guard.
    assert!(authz::ensure_admin_remains(&members, "ed").is_ok());
}

#[tokio::test]
async fn creator_guard_runs_over_repository_data() {
    let store = seeded();
    store.seed_membership(membership("bea", MembershipRole::Admin));
    let members = store.list_for_project(PROJECT).await.unwrap();

    // With a second admin the last-admin guard passes for `ann`, but
    // she created the project, so her removal is still rejected.
    assert!(authz::ensure_admin_remains(&members, "ann").is_ok());
    assert!(authz::ensure_not_creator("ann", "ann").is_err());
    assert!(authz::ensure_not_creator("ann", "ed").is_ok());
}

#[tokio::test]
async fn effective_role_from_a_fetched_membership() {
    let store = seeded();
    let editor = Actor::new("ed", vec![SystemRole::Contributor]);

    let found = store.find(PROJECT, "ed").await.unwrap();
    let role = found.map(|m| m.role);
    assert_eq!(
        Some(MembershipRole::Edit),
        authz::resolve_effective_role(&editor, role)
    );
    assert!(authz::assert_project_role(&editor, role, MembershipRole::Edit).is_ok());
    assert!(authz::assert_project_role(&editor, role, MembershipRole::Admin).is_err());

    // No membership row at all: no access, unless the actor is a
    // system admin.
    let absent = store.find(PROJECT, "stranger").await.unwrap().map(|m| m.role);
    assert_eq!(None, absent);
    assert!(authz::assert_project_role(&editor, absent, MembershipRole::View).is_err());
    let root = Actor::new("root", vec![SystemRole::Admin]);
    assert!(authz::assert_project_role(&root, absent, MembershipRole::Admin).is_ok());
}
