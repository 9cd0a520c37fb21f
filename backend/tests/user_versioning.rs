//! Role history of users, driven through the account and history services.

mod support;

use rstest::{fixture, rstest};
use timesheet::domain::ports::{UpdateUserRequest, UserAccounts, UserHistory};
use timesheet::domain::{ErrorCode, Role, UserName};

use support::{World, at, date, employee_request, role};

#[fixture]
fn roles() -> (Role, Role, Role) {
    (role("developer", false), role("lead", false), role("manager", true))
}

#[fixture]
fn world(roles: (Role, Role, Role)) -> (World, (Role, Role, Role)) {
    let world = World::new(at(2009, 4, 1, 9));
    world.store.add_role(roles.0.clone());
    world.store.add_role(roles.1.clone());
    world.store.add_role(roles.2.clone());
    (world, roles)
}

fn change_role(role: &Role) -> UpdateUserRequest {
    UpdateUserRequest {
        role_id: Some(role.id),
        ..UpdateUserRequest::default()
    }
}

#[rstest]
#[tokio::test]
async fn new_user_has_exactly_one_version_stamped_at_creation(
    world: (World, (Role, Role, Role)),
) {
    let (world, (developer, _, _)) = world;
    let user = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("user created");

    let versions = world.versioning.versions(&user.id).await.expect("history");
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].modified_at, user.created_at);
    assert_eq!(versions[0].snapshot, user.snapshot);
}

#[rstest]
#[tokio::test]
async fn each_role_change_appends_one_version(world: (World, (Role, Role, Role))) {
    let (world, (developer, lead, manager)) = world;
    let user = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("user created");

    world.clock.set(at(2009, 5, 1, 9));
    world
        .accounts
        .update_user(&user.id, change_role(&lead))
        .await
        .expect("promoted to lead");
    world.clock.set(at(2009, 6, 1, 9));
    world
        .accounts
        .update_user(&user.id, change_role(&manager))
        .await
        .expect("promoted to manager");

    let versions = world.versioning.versions(&user.id).await.expect("history");
    assert_eq!(versions.len(), 3);

    let between = world
        .versioning
        .version_at(&user.id, at(2009, 5, 15, 12))
        .await
        .expect("version in effect");
    assert_eq!(between.snapshot.role_id, Some(lead.id));
}

#[rstest]
#[tokio::test]
async fn non_role_changes_do_not_version(world: (World, (Role, Role, Role))) {
    let (world, (developer, _, _)) = world;
    let user = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("user created");

    world.clock.advance_seconds(3_600);
    let renamed = UpdateUserRequest {
        name: Some(UserName::new("Ada King").expect("valid name")),
        ..UpdateUserRequest::default()
    };
    world
        .accounts
        .update_user(&user.id, renamed)
        .await
        .expect("renamed");

    assert_eq!(world.versioning.count_versions(&user.id).await.expect("count"), 1);
}

#[rstest]
#[tokio::test]
async fn lookups_clamp_to_the_ends_of_history(world: (World, (Role, Role, Role))) {
    let (world, (developer, lead, _)) = world;
    let user = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("user created");
    world.clock.set(at(2009, 5, 1, 9));
    world
        .accounts
        .update_user(&user.id, change_role(&lead))
        .await
        .expect("promoted");

    let before = world
        .versioning
        .version_at(&user.id, at(2000, 1, 1, 0))
        .await
        .expect("earliest version");
    assert_eq!(before.snapshot.role_id, Some(developer.id));

    let after = world
        .versioning
        .version_on(&user.id, date(2020, 1, 1))
        .await
        .expect("latest version");
    assert_eq!(after.snapshot.role_id, Some(lead.id));
}

#[rstest]
#[tokio::test]
async fn missing_history_is_backfilled_on_lookup(world: (World, (Role, Role, Role))) {
    let (world, (developer, _, _)) = world;
    let user = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("user created");
    world
        .versioning
        .delete_history(&user.id)
        .await
        .expect("history wiped");

    let version = world
        .versioning
        .version_at(&user.id, at(2009, 4, 2, 0))
        .await
        .expect("synthesised version");
    assert_eq!(version.modified_at, user.created_at);
    assert_eq!(world.store.stored_versions(&user.id).len(), 1);
}

#[rstest]
#[tokio::test]
async fn destroying_a_user_removes_its_history(world: (World, (Role, Role, Role))) {
    let (world, (developer, lead, _)) = world;
    let user = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("user created");
    world
        .accounts
        .update_user(&user.id, change_role(&lead))
        .await
        .expect("promoted");

    world.accounts.destroy_user(&user.id).await.expect("destroyed");

    assert!(world.store.stored_versions(&user.id).is_empty());
    let err = world
        .versioning
        .versions(&user.id)
        .await
        .expect_err("user is gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn users_with_activities_cannot_be_destroyed(world: (World, (Role, Role, Role))) {
    let (world, (developer, _, _)) = world;
    let user = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("user created");
    world.log_activity(&user, date(2009, 4, 1), 60, "kick-off");

    let err = world
        .accounts
        .destroy_user(&user.id)
        .await
        .expect_err("user has activities");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(world.store.stored_versions(&user.id).len(), 1);
}

#[rstest]
#[tokio::test]
async fn role_change_after_wiped_history_keeps_the_old_role_first(
    world: (World, (Role, Role, Role)),
) {
    let (world, (developer, lead, _)) = world;
    let user = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("user created");
    world
        .versioning
        .delete_history(&user.id)
        .await
        .expect("history wiped");

    world.clock.set(at(2009, 5, 1, 9));
    world
        .accounts
        .update_user(&user.id, change_role(&lead))
        .await
        .expect("promoted");

    let versions = world.versioning.versions(&user.id).await.expect("history");
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].snapshot.role_id, Some(developer.id));
    assert_eq!(versions[0].modified_at, user.created_at);
    assert_eq!(versions[1].snapshot.role_id, Some(lead.id));
    assert_eq!(versions[1].modified_at, at(2009, 5, 1, 9));
}

#[rstest]
#[tokio::test]
async fn the_last_role_change_of_a_day_wins_for_that_date(world: (World, (Role, Role, Role))) {
    let (world, (developer, lead, manager)) = world;
    let user = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("user created");

    world.clock.set(at(2009, 5, 1, 14));
    world
        .accounts
        .update_user(&user.id, change_role(&lead))
        .await
        .expect("afternoon change");
    world.clock.set(at(2009, 5, 1, 22));
    world
        .accounts
        .update_user(&user.id, change_role(&manager))
        .await
        .expect("evening change");
    world.clock.set(at(2009, 5, 2, 9));
    world
        .accounts
        .update_user(&user.id, change_role(&developer))
        .await
        .expect("next morning change");

    let on_the_day = world
        .versioning
        .version_on(&user.id, date(2009, 5, 1))
        .await
        .expect("version for the date");
    assert_eq!(on_the_day.snapshot.role_id, Some(manager.id));
    assert_eq!(on_the_day.modified_at, at(2009, 5, 1, 22));

    let mid_afternoon = world
        .versioning
        .version_at(&user.id, at(2009, 5, 1, 18))
        .await
        .expect("version in effect");
    assert_eq!(mid_afternoon.snapshot.role_id, Some(lead.id));
}

#[rstest]
#[tokio::test]
async fn failed_version_write_leaves_the_update_committed(world: (World, (Role, Role, Role))) {
    let (world, (developer, lead, _)) = world;
    let user = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("user created");

    world.store.fail_version_writes(true);
    world.clock.set(at(2009, 5, 1, 9));
    let err = world
        .accounts
        .update_user(&user.id, change_role(&lead))
        .await
        .expect_err("version write rejected");
    assert_eq!(err.code(), ErrorCode::InternalError);

    let stored = world.accounts.find_user(&user.id).await.expect("user kept");
    assert_eq!(stored.snapshot.role_id, Some(lead.id));
    assert_eq!(stored.modified_at, at(2009, 5, 1, 9));
    let versions = world.store.stored_versions(&user.id);
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].snapshot.role_id, Some(developer.id));
}
