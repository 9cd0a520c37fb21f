//! Mails sent on account changes and by the timesheet mailer.

mod support;

use rstest::rstest;
use timesheet::domain::calendar::DateRange;
use timesheet::domain::ports::UserAccounts;
use timesheet::domain::{Email, ErrorCode, PASSWORD_RESET_TOKEN_TTL_HOURS};

use support::{World, at, client_request, date, employee_request, role};

#[tokio::test]
async fn creating_a_user_sends_a_welcome_mail() {
    let world = World::new(at(2009, 4, 1, 9));
    let developer = role("developer", false);
    let user = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("user created");

    let sent = world.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, user.snapshot.email);
    assert_eq!(sent[0].subject, "Welcome to Timesheet!");
}

#[tokio::test]
async fn welcome_mail_failure_keeps_the_user() {
    let world = World::new(at(2009, 4, 1, 9));
    world.mailer.fail_deliveries(true);

    let user = world
        .accounts
        .create_user(employee_request("ada", role("developer", false).id))
        .await
        .expect("user created despite mail failure");

    assert!(world.accounts.find_user(&user.id).await.is_ok());
}

#[rstest]
#[case("ada")]
#[case("ada@example.com")]
#[tokio::test]
async fn password_reset_issues_a_token_and_mails_the_link(#[case] needle: &str) {
    let world = World::new(at(2009, 4, 1, 9));
    let user = world
        .accounts
        .create_user(employee_request("ada", role("developer", false).id))
        .await
        .expect("user created");

    world
        .accounts
        .request_password_reset(needle)
        .await
        .expect("reset requested");

    let token = world.store.reset_token(&user.id).expect("token stored");
    assert_eq!(
        token.expires_at,
        at(2009, 4, 1, 9) + chrono::TimeDelta::hours(PASSWORD_RESET_TOKEN_TTL_HOURS)
    );
    let last = world.mailer.sent().pop().expect("reset mail");
    assert!(last.body.contains(&token.token));
}

#[tokio::test]
async fn password_reset_mail_failure_is_reported() {
    let world = World::new(at(2009, 4, 1, 9));
    world
        .accounts
        .create_user(employee_request("ada", role("developer", false).id))
        .await
        .expect("user created");
    world.mailer.fail_deliveries(true);

    let err = world
        .accounts
        .request_password_reset("ada")
        .await
        .expect_err("relay is down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn naggers_and_reporter_cover_idle_employees_only() {
    let world = World::new(at(2009, 4, 1, 9));
    let developer = role("developer", false);
    let busy = world
        .accounts
        .create_user(employee_request("busy", developer.id))
        .await
        .expect("user created");
    let idle = world
        .accounts
        .create_user(employee_request("idle", developer.id))
        .await
        .expect("user created");
    world
        .accounts
        .create_user(client_request("client"))
        .await
        .expect("client created");
    let day = date(2009, 4, 2);
    world.log_activity(&busy, day, 480, "coding");
    let welcomes = world.mailer.sent().len();

    let report = world
        .notifications
        .send_naggers_for(day)
        .await
        .expect("naggers sent");
    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 0);
    let sent = world.mailer.sent();
    assert_eq!(sent.len(), welcomes + 1);
    assert_eq!(sent[welcomes].to, idle.snapshot.email);

    let boss = Email::new("boss@example.com").expect("valid email");
    world
        .notifications
        .send_reporter_for(day, &boss)
        .await
        .expect("report sent");
    let report_mail = world.mailer.sent().pop().expect("report mail");
    assert_eq!(report_mail.to, boss);
    assert!(report_mail.body.contains(idle.snapshot.name.as_ref()));
    assert!(!report_mail.body.contains(busy.snapshot.name.as_ref()));
}

#[tokio::test]
async fn summary_lists_each_day_of_the_range() {
    let world = World::new(at(2009, 4, 1, 9));
    let user = world
        .accounts
        .create_user(employee_request("ada", role("developer", false).id))
        .await
        .expect("user created");
    world.log_activity(&user, date(2009, 4, 1), 90, "code review");

    world
        .notifications
        .send_summary_for(&user.id, DateRange::new(date(2009, 4, 1), date(2009, 4, 2)))
        .await
        .expect("summary sent");

    let summary = world.mailer.sent().pop().expect("summary mail");
    assert!(summary.body.contains("code review"));
    assert!(summary.body.contains("2009-04-02: no activities"));
    assert!(summary.body.contains("Total: 1:30"));
}
