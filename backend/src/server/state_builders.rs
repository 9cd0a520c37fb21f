//! Wires Diesel repositories into the domain services behind [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use timesheet::domain::ports::{
    ActivityRepository, FreeDayRepository, ProjectRepository, RoleRepository, UserRepository,
    UserVersionRepository,
};
use timesheet::domain::{
    ActivityCalendarService, ActivityLogService, LocalLoginService, UserLifecycleService,
    UserProfileService, UserVersioningService,
};
use timesheet::inbound::http::state::HttpState;
use timesheet::outbound::persistence::{
    DbPool, DieselActivityRepository, DieselFreeDayRepository, DieselProjectRepository,
    DieselRoleRepository, DieselUserRepository, DieselUserVersionRepository,
};

use super::ServerConfig;

/// Driven ports backed by one connection pool.
struct Repositories {
    users: Arc<dyn UserRepository>,
    versions: Arc<dyn UserVersionRepository>,
    activities: Arc<dyn ActivityRepository>,
    free_days: Arc<dyn FreeDayRepository>,
    roles: Arc<dyn RoleRepository>,
    projects: Arc<dyn ProjectRepository>,
}

impl Repositories {
    fn from_pool(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            versions: Arc::new(DieselUserVersionRepository::new(pool.clone())),
            activities: Arc::new(DieselActivityRepository::new(pool.clone())),
            free_days: Arc::new(DieselFreeDayRepository::new(pool.clone())),
            roles: Arc::new(DieselRoleRepository::new(pool.clone())),
            projects: Arc::new(DieselProjectRepository::new(pool.clone())),
        }
    }
}

/// Build the handler state for `config`.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repos = Repositories::from_pool(&config.db_pool);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let versioning = UserVersioningService::new(
        repos.users.clone(),
        repos.versions.clone(),
        clock.clone(),
    );
    let accounts = UserLifecycleService::new(
        repos.users.clone(),
        repos.activities.clone(),
        versioning.clone(),
        config.mailer.clone(),
        config.mail.clone(),
        clock,
    );

    let profiles = Arc::new(UserProfileService::new(repos.users.clone(), repos.roles));
    let activity_log = ActivityLogService::new(
        repos.activities.clone(),
        repos.projects,
        repos.users.clone(),
    );

    web::Data::new(HttpState {
        login: Arc::new(LocalLoginService::new(repos.users)),
        accounts: Arc::new(accounts),
        profiles: profiles.clone(),
        directory: profiles,
        history: Arc::new(versioning),
        calendar: Arc::new(ActivityCalendarService::new(
            repos.activities,
            repos.free_days,
        )),
        activity_log: Arc::new(activity_log),
    })
}
