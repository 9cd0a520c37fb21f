//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, test, web};
use chrono::Utc;

use crate::domain::ports::{
    MockActivityCalendar, MockActivityLog, MockLoginService, MockUserAccounts, MockUserDirectory,
    MockUserHistory, MockUserProfiles, UserProfile,
};
use crate::domain::{
    ClientId, Email, Error, Login, RoleId, User, UserId, UserName, UserSnapshot,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const COOKIE_NAME: &str = "session";

/// Cookie session middleware with a fresh key and no `Secure` flag.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Route signing in whichever user id is in the path.
pub async fn sign_in_as(path: web::Path<String>, session: SessionContext) -> Result<HttpResponse, Error> {
    let id = UserId::new(path.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.sign_in(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Request hitting the [`sign_in_as`] route mounted at `/test/sign-in/{id}`.
pub fn sign_in_request(user_id: &UserId) -> test::TestRequest {
    test::TestRequest::post().uri(&format!("/test/sign-in/{user_id}"))
}

pub fn user(admin: bool) -> User {
    let now = Utc::now();
    User {
        id: UserId::random(),
        snapshot: UserSnapshot {
            name: UserName::new("Ada Lovelace").expect("valid name"),
            login: Login::new("ada").expect("valid login"),
            email: Email::new("ada@example.com").expect("valid email"),
            role_id: Some(RoleId::random()),
            client_id: None,
            admin,
            active: true,
        },
        created_at: now,
        modified_at: now,
    }
}

pub fn client_user() -> User {
    let mut user = user(false);
    user.snapshot.role_id = None;
    user.snapshot.client_id = Some(ClientId::random());
    user
}

pub fn profile_of(user: &User) -> UserProfile {
    UserProfile {
        user: user.clone(),
        kind: user.kind(),
        can_manage_financial_data: user.is_admin(),
    }
}

/// Mocked driving ports, configured per test then frozen into [`HttpState`].
pub struct MockPorts {
    pub login: MockLoginService,
    pub accounts: MockUserAccounts,
    pub profiles: MockUserProfiles,
    pub history: MockUserHistory,
    pub calendar: MockActivityCalendar,
    pub activity_log: MockActivityLog,
    pub directory: MockUserDirectory,
}

impl MockPorts {
    pub fn new() -> Self {
        Self {
            login: MockLoginService::new(),
            accounts: MockUserAccounts::new(),
            profiles: MockUserProfiles::new(),
            history: MockUserHistory::new(),
            calendar: MockActivityCalendar::new(),
            activity_log: MockActivityLog::new(),
            directory: MockUserDirectory::new(),
        }
    }

    /// Resolve `users` by id for session lookups.
    pub fn with_known_users(mut self, users: &[User]) -> Self {
        let users = users.to_vec();
        self.profiles.expect_profile().returning(move |id| {
            users
                .iter()
                .find(|user| user.id == *id)
                .map(profile_of)
                .ok_or_else(|| Error::not_found("no such user"))
        });
        self
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            login: Arc::new(self.login),
            accounts: Arc::new(self.accounts),
            profiles: Arc::new(self.profiles),
            history: Arc::new(self.history),
            calendar: Arc::new(self.calendar),
            activity_log: Arc::new(self.activity_log),
            directory: Arc::new(self.directory),
        })
    }
}
