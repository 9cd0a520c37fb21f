//! Handler tests for user accounts.

use super::*;
use crate::domain::User;
use crate::inbound::http::test_utils::{
    MockPorts, session_cookie, sign_in_as, sign_in_request, test_session_middleware, user,
};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

/// Sign in as `actor`, then send `req`.
async fn call_as(actor: &User, ports: MockPorts, req: test::TestRequest) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .app_data(ports.into_state())
            .wrap(test_session_middleware())
            .route("/test/sign-in/{id}", web::post().to(sign_in_as))
            .service(
                web::scope("/api/v1")
                    .service(current_user)
                    .service(get_user)
                    .service(create_user)
                    .service(update_user)
                    .service(delete_user),
            ),
    )
    .await;
    let signed_in = test::call_service(&app, sign_in_request(&actor.id).to_request()).await;
    let cookie = session_cookie(&signed_in);
    test::call_service(&app, req.cookie(cookie).to_request()).await
}

fn create_body() -> Value {
    json!({
        "name": "Grace Hopper",
        "login": "grace",
        "email": "grace@example.com",
        "password": "secret",
        "roleId": "6f1c1f4e-3a51-4d0a-9a43-5f0f3c6c2b11",
    })
}

#[actix_web::test]
async fn requests_without_a_session_are_unauthorised() {
    let app = test::init_service(
        App::new()
            .app_data(MockPorts::new().into_state())
            .wrap(test_session_middleware())
            .service(web::scope("/api/v1").service(current_user)),
    )
    .await;
    let res = test::call_service(&app, test::TestRequest::get().uri("/api/v1/me").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn me_returns_the_session_profile() {
    let ada = user(false);
    let ports = MockPorts::new().with_known_users(&[ada.clone()]);

    let res = call_as(&ada, ports, test::TestRequest::get().uri("/api/v1/me")).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["id"], ada.id.to_string());
    assert_eq!(body["login"], "ada");
    assert_eq!(body["kind"], "employee");
    assert_eq!(body["canManageFinancialData"], false);
}

#[actix_web::test]
async fn admins_create_users() {
    let admin = user(true);
    let mut ports = MockPorts::new().with_known_users(&[admin.clone()]);
    ports
        .accounts
        .expect_create_user()
        .withf(|request| request.login.as_ref() == "grace" && request.active)
        .times(1)
        .returning(|request| {
            let mut created = user(false);
            created.snapshot.login = request.login;
            Ok(created)
        });

    let res = call_as(
        &admin,
        ports,
        test::TestRequest::post().uri("/api/v1/users").set_json(create_body()),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(res.headers().contains_key("location"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["login"], "grace");
}

#[actix_web::test]
async fn employees_cannot_create_users() {
    let ada = user(false);
    let ports = MockPorts::new().with_known_users(&[ada.clone()]);

    let res = call_as(
        &ada,
        ports,
        test::TestRequest::post().uri("/api/v1/users").set_json(create_body()),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case(json!({ "login": "x" }), "login")]
#[case(json!({ "email": "not-an-email" }), "email")]
#[case(json!({ "roleId": "admin" }), "roleId")]
#[actix_web::test]
async fn invalid_update_fields_are_named(#[case] patch: Value, #[case] field: &str) {
    let admin = user(true);
    let ports = MockPorts::new().with_known_users(&[admin.clone()]);

    let res = call_as(
        &admin,
        ports,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/users/{}", admin.id))
            .set_json(patch),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn users_edit_their_own_contact_details() {
    let ada = user(false);
    let mut ports = MockPorts::new().with_known_users(&[ada.clone()]);
    let expected_id = ada.id.clone();
    let updated = ada.clone();
    ports
        .accounts
        .expect_update_user()
        .withf(move |id, request| *id == expected_id && request.email.is_some())
        .times(1)
        .return_once(move |_, _| Ok(updated));

    let res = call_as(
        &ada,
        ports,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/users/{}", ada.id))
            .set_json(json!({ "email": "ada@lovelace.example" })),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[case(json!({ "roleId": "6f1c1f4e-3a51-4d0a-9a43-5f0f3c6c2b11" }))]
#[case(json!({ "admin": true }))]
#[case(json!({ "active": false }))]
#[actix_web::test]
async fn users_cannot_change_their_own_privileges(#[case] patch: Value) {
    let ada = user(false);
    let ports = MockPorts::new().with_known_users(&[ada.clone()]);

    let res = call_as(
        &ada,
        ports,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/users/{}", ada.id))
            .set_json(patch),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn users_cannot_edit_others() {
    let ada = user(false);
    let grace = user(false);
    let ports = MockPorts::new().with_known_users(&[ada.clone(), grace.clone()]);

    let res = call_as(
        &ada,
        ports,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/users/{}", grace.id))
            .set_json(json!({ "name": "Amazing Grace" })),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn deleting_a_user_with_activities_conflicts() {
    let admin = user(true);
    let mut ports = MockPorts::new().with_known_users(&[admin.clone()]);
    ports
        .accounts
        .expect_destroy_user()
        .times(1)
        .returning(|_| Err(Error::conflict("user has activities and cannot be deleted")));

    let res = call_as(
        &admin,
        ports,
        test::TestRequest::delete().uri(&format!("/api/v1/users/{}", user(false).id)),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn admins_delete_users() {
    let admin = user(true);
    let mut ports = MockPorts::new().with_known_users(&[admin.clone()]);
    ports.accounts.expect_destroy_user().times(1).returning(|_| Ok(()));

    let res = call_as(
        &admin,
        ports,
        test::TestRequest::delete().uri(&format!("/api/v1/users/{}", user(false).id)),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}
