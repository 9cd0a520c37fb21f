//! End-to-end HTTP flows over the in-memory store.

mod support;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use timesheet::Trace;
use timesheet::domain::ports::UserAccounts;
use timesheet::domain::{RoleId, TRACE_ID_HEADER, User};
use timesheet::inbound::http::activities::{calendar, days_without_activities, declare_free_day};
use timesheet::inbound::http::activity_log::{
    activities_of_day, change_activity, get_activity, log_activity, project_calendar,
    project_choices, remove_activity,
};
use timesheet::inbound::http::auth::{login, logout, request_password_reset};
use timesheet::inbound::http::directory::{managers, users_with_activities};
use timesheet::inbound::http::menu::menu;
use timesheet::inbound::http::users::{
    create_user, current_user, delete_user, get_user, update_user,
};
use timesheet::inbound::http::versions::{list_versions, version_at};

use support::{
    PASSWORD, World, admin_request, at, client_of, date, employee_request, role,
};

macro_rules! api_app {
    ($world:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($world.http_state()))
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .wrap(
                            SessionMiddleware::builder(
                                CookieSessionStore::default(),
                                Key::generate(),
                            )
                            .cookie_name("session".to_owned())
                            .cookie_secure(false)
                            .build(),
                        )
                        .service(login)
                        .service(logout)
                        .service(request_password_reset)
                        .service(current_user)
                        .service(menu)
                        .service(create_user)
                        .service(list_versions)
                        .service(version_at)
                        .service(days_without_activities)
                        .service(calendar)
                        .service(declare_free_day)
                        .service(project_choices)
                        .service(users_with_activities)
                        .service(managers)
                        .service(log_activity)
                        .service(activities_of_day)
                        .service(get_activity)
                        .service(change_activity)
                        .service(remove_activity)
                        .service(project_calendar)
                        .service(get_user)
                        .service(update_user)
                        .service(delete_user),
                ),
        )
        .await
    };
}

async fn seeded_world() -> (World, User, User, RoleId) {
    let world = World::new(at(2009, 4, 1, 9));
    let developer = role("developer", false);
    let lead = role("lead", true);
    world.store.add_role(developer.clone());
    world.store.add_role(lead.clone());
    let admin = world
        .accounts
        .create_user(admin_request("admin", developer.id))
        .await
        .expect("admin created");
    let ada = world
        .accounts
        .create_user(employee_request("ada", developer.id))
        .await
        .expect("employee created");
    (world, admin, ada, lead.id)
}

fn login_request(login_name: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "login": login_name, "password": PASSWORD }))
}

fn session_cookie<B>(res: &actix_web::dev::ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

#[actix_web::test]
async fn admin_promotes_an_employee_and_history_follows() {
    let (world, _admin, ada, lead) = seeded_world().await;
    let app = api_app!(world);

    let res = test::call_service(&app, login_request("admin").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res);

    let me: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/me")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(me["kind"], "admin");

    world.clock.set(at(2009, 5, 1, 9));
    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/users/{}", ada.id))
            .cookie(cookie.clone())
            .set_json(json!({ "roleId": lead.to_string() }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let versions: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/users/{}/versions", ada.id))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(versions.as_array().map(Vec::len), Some(2));

    let earlier: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/users/{}/versions/at?date=2009-04-15", ada.id))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_ne!(earlier["roleId"], json!(lead.to_string()));

    let profile: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/users/{}", ada.id))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(profile["canManageFinancialData"], true);
}

#[actix_web::test]
async fn employees_cannot_change_their_own_role() {
    let (world, _admin, ada, lead) = seeded_world().await;
    let app = api_app!(world);

    let res = test::call_service(&app, login_request("ada").to_request()).await;
    let cookie = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/users/{}", ada.id))
            .cookie(cookie.clone())
            .set_json(json!({ "roleId": lead.to_string() }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/users/{}", ada.id))
            .cookie(cookie)
            .set_json(json!({ "name": "Ada King" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(world.store.stored_versions(&ada.id).len(), 1);
}

#[actix_web::test]
async fn days_without_activities_honours_the_weekday_filter() {
    let (world, _admin, ada, _lead) = seeded_world().await;
    world.log_activity(&ada, date(2009, 4, 15), 60, "planning");
    world.log_activity(&ada, date(2009, 4, 17), 120, "review");
    world.store.add_free_day(&ada.id, date(2009, 4, 21));
    world.store.add_free_day(&ada.id, date(2009, 4, 22));
    let app = api_app!(world);

    let res = test::call_service(&app, login_request("ada").to_request()).await;
    let cookie = session_cookie(&res);

    let all: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/v1/users/{}/days-without-activities?from=2009-04-01&to=2009-04-30",
                ada.id
            ))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(all["count"], 26);

    let weekdays: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/v1/users/{}/days-without-activities?from=2009-04-01&to=2009-04-30&weekdaysOnly=true",
                ada.id
            ))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(weekdays["count"], 18);
}

#[actix_web::test]
async fn wrong_password_is_unauthorised_and_traced() {
    let (world, _admin, _ada, _lead) = seeded_world().await;
    let app = api_app!(world);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "login": "ada", "password": "wrong" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["traceId"], header);
}

#[actix_web::test]
async fn signed_out_requests_are_rejected() {
    let (world, _admin, ada, _lead) = seeded_world().await;
    let app = api_app!(world);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/users/{}/versions", ada.id))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

macro_rules! gap_count {
    ($app:expr, $cookie:expr, $user:expr) => {{
        let body: Value = test::call_and_read_body_json(
            $app,
            test::TestRequest::get()
                .uri(&format!(
                    "/api/v1/users/{}/days-without-activities?from=2009-04-01&to=2009-04-30",
                    $user.id
                ))
                .cookie($cookie.clone())
                .to_request(),
        )
        .await;
        body["count"].clone()
    }};
}

#[actix_web::test]
async fn logged_activities_are_managed_by_their_owner() {
    let (world, admin, ada, _lead) = seeded_world().await;
    let grace = world
        .accounts
        .create_user(employee_request("grace", admin.snapshot.role_id.expect("role")))
        .await
        .expect("grace created");
    let project_id = world.project.id;
    let app = api_app!(world);
    let ada_cookie = session_cookie(&test::call_service(&app, login_request("ada").to_request()).await);
    let grace_cookie =
        session_cookie(&test::call_service(&app, login_request("grace").to_request()).await);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/activities")
            .cookie(ada_cookie.clone())
            .set_json(json!({
                "userId": grace.id.to_string(),
                "projectId": project_id.to_string(),
                "date": "2009-04-15",
                "hours": "3:03",
                "comments": "planning",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let logged: Value = test::read_body_json(res).await;
    assert_eq!(logged["userId"], ada.id.to_string());
    assert_eq!(logged["minutes"], 183);
    let activity_uri = format!("/api/v1/activities/{}", logged["id"].as_str().expect("id"));
    assert_eq!(gap_count!(&app, ada_cookie, ada), 29);

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&activity_uri)
            .cookie(grace_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&activity_uri)
            .cookie(ada_cookie.clone())
            .set_json(json!({ "date": "2009-04-16" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let day: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/activities/day?date=2009-04-16")
            .cookie(ada_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(day.as_array().map(Vec::len), Some(1));

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&activity_uri)
            .cookie(ada_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(gap_count!(&app, ada_cookie, ada), 30);
}

#[actix_web::test]
async fn activities_on_unknown_projects_are_bad_requests() {
    let (world, _admin, _ada, _lead) = seeded_world().await;
    let app = api_app!(world);
    let cookie = session_cookie(&test::call_service(&app, login_request("ada").to_request()).await);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/activities")
            .cookie(cookie)
            .set_json(json!({
                "projectId": "6f1c1f4e-3a51-4d0a-9a43-5f0f3c6c2b11",
                "date": "2009-04-15",
                "minutes": 60,
                "comments": "planning",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "projectId");
}

#[actix_web::test]
async fn declared_free_days_leave_the_gap_list() {
    let (world, _admin, ada, _lead) = seeded_world().await;
    let app = api_app!(world);
    let cookie = session_cookie(&test::call_service(&app, login_request("ada").to_request()).await);

    for _ in 0..2 {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/users/{}/free-days", ada.id))
                .cookie(cookie.clone())
                .set_json(json!({ "date": "2009-04-21" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    assert_eq!(gap_count!(&app, cookie, ada), 29);
}

#[actix_web::test]
async fn overlong_ranges_are_rejected_on_the_to_field() {
    let (world, _admin, ada, _lead) = seeded_world().await;
    let app = api_app!(world);
    let cookie = session_cookie(&test::call_service(&app, login_request("ada").to_request()).await);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/v1/users/{}/calendar?from=0001-01-01&to=9999-12-31",
                ada.id
            ))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "to");
}

#[actix_web::test]
async fn calendars_of_unknown_users_are_not_found() {
    let (world, _admin, _ada, _lead) = seeded_world().await;
    let app = api_app!(world);
    let cookie =
        session_cookie(&test::call_service(&app, login_request("admin").to_request()).await);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/v1/users/{}/days-without-activities?from=2009-04-01&to=2009-04-30",
                timesheet::domain::UserId::random()
            ))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn client_users_follow_their_project_calendar() {
    let (world, _admin, ada, _lead) = seeded_world().await;
    world.log_activity(&ada, date(2009, 4, 15), 150, "billing");
    world
        .accounts
        .create_user(client_of("acme", world.project.client_id))
        .await
        .expect("client user created");
    let project_id = world.project.id;
    let app = api_app!(world);
    let cookie = session_cookie(&test::call_service(&app, login_request("acme").to_request()).await);

    let days: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/v1/projects/{project_id}/calendar?from=2009-04-15&to=2009-04-16"
            ))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(days[0]["totalMinutes"], 150);
    assert_eq!(days[0]["total"], "2:30");
    assert_eq!(days[1]["totalMinutes"], 0);

    let contributors: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/with-activities")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(contributors[0]["id"], ada.id.to_string());
}
