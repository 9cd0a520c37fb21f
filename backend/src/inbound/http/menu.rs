//! Navigation menu handler.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ErrorCode, MenuItem, RequestContext, main_menu_items, sub_menu_items};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access::current_profile;
use crate::inbound::http::schemas::{ErrorSchema, MenuItemSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MenuQuery {
    /// Section being displayed, e.g. `activities` or `users`.
    #[serde(default)]
    pub controller: String,
    /// Page within the section, e.g. `index` or `calendar`.
    #[serde(default)]
    pub action: String,
    /// Optional list filter, e.g. `issued`.
    pub filter: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    #[schema(value_type = Vec<MenuItemSchema>)]
    pub main: Vec<MenuItem>,
    #[schema(value_type = Vec<MenuItemSchema>)]
    pub sub: Vec<MenuItem>,
}

/// Main and section menus for the signed-in user. Both are empty when
/// nobody is signed in.
#[utoipa::path(
    get,
    path = "/api/v1/menu",
    params(MenuQuery),
    responses(
        (status = 200, description = "Menus", body = MenuResponse),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["presentation"],
    operation_id = "menu",
    security([])
)]
#[get("/menu")]
pub async fn menu(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<MenuQuery>,
) -> ApiResult<web::Json<MenuResponse>> {
    let profile = if session.user_id()?.is_some() {
        match current_profile(&state, &session).await {
            Ok(profile) => Some(profile),
            Err(error) if error.code() == ErrorCode::Unauthorized => None,
            Err(error) => return Err(error),
        }
    } else {
        None
    };

    let ctx = RequestContext {
        current_user: profile.as_ref().map(|profile| &profile.user),
        controller: &query.controller,
        action: &query.action,
        filter: query.filter.as_deref(),
    };
    Ok(web::Json(MenuResponse {
        main: main_menu_items(&ctx),
        sub: sub_menu_items(&ctx),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{
        MockPorts, client_user, session_cookie, sign_in_as, sign_in_request,
        test_session_middleware, user,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::Value;

    fn titles(items: &Value) -> Vec<&str> {
        items
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|item| item["title"].as_str())
            .collect()
    }

    #[actix_web::test]
    async fn signed_out_menus_are_empty() {
        let app = test::init_service(
            App::new()
                .app_data(MockPorts::new().into_state())
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(menu)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/v1/menu?controller=activities&action=index")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(titles(&body["main"]).is_empty());
        assert!(titles(&body["sub"]).is_empty());
    }

    #[actix_web::test]
    async fn menus_follow_the_session_user() {
        let admin = user(true);
        let customer = client_user();
        let app = test::init_service(
            App::new()
                .app_data(
                    MockPorts::new()
                        .with_known_users(&[admin.clone(), customer.clone()])
                        .into_state(),
                )
                .wrap(test_session_middleware())
                .route("/test/sign-in/{id}", web::post().to(sign_in_as))
                .service(web::scope("/api/v1").service(menu)),
        )
        .await;

        let signed_in = test::call_service(&app, sign_in_request(&admin.id).to_request()).await;
        let req = test::TestRequest::get()
            .uri("/api/v1/menu?controller=invoices&action=index&filter=pending")
            .cookie(session_cookie(&signed_in))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(titles(&body["main"]), ["Activities", "Invoices", "Manage"]);
        let selected: Vec<_> = body["sub"]
            .as_array()
            .expect("array")
            .iter()
            .filter(|item| item["selected"] == true)
            .filter_map(|item| item["title"].as_str())
            .collect();
        assert_eq!(selected, ["Pending"]);

        let signed_in =
            test::call_service(&app, sign_in_request(&customer.id).to_request()).await;
        let req = test::TestRequest::get()
            .uri("/api/v1/menu?controller=projects&action=index")
            .cookie(session_cookie(&signed_in))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(titles(&body["main"]), ["Activities", "Projects", "Invoices"]);
    }
}
