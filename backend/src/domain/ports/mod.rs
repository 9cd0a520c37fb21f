//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`Mailer`]) are implemented by outbound
//! adapters. Driving ports ([`LoginService`], [`UserAccounts`],
//! [`UserHistory`], [`ActivityCalendar`], [`ActivityLog`], [`UserDirectory`])
//! are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod activity_calendar;
mod activity_log;
mod activity_repository;
mod free_day_repository;
mod login_service;
mod mailer;
mod project_repository;
mod role_repository;
mod user_accounts;
mod user_directory;
mod user_history;
mod user_profiles;
mod user_repository;
mod user_version_repository;

#[cfg(test)]
pub use activity_calendar::MockActivityCalendar;
pub use activity_calendar::ActivityCalendar;
#[cfg(test)]
pub use activity_log::MockActivityLog;
pub use activity_log::{ActivityLog, ChangeActivityRequest, DayScope, LogActivityRequest};
#[cfg(test)]
pub use activity_repository::MockActivityRepository;
pub use activity_repository::{ActivityRepository, ActivityRepositoryError};
#[cfg(test)]
pub use free_day_repository::MockFreeDayRepository;
pub use free_day_repository::{FreeDayRepository, FreeDayRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{Mailer, MailerError};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::{RoleRepository, RoleRepositoryError};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{CreateUserRequest, UpdateUserRequest, UserAccounts};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_history::MockUserHistory;
pub use user_history::UserHistory;
#[cfg(test)]
pub use user_profiles::MockUserProfiles;
pub use user_profiles::{UserProfile, UserProfiles};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_version_repository::MockUserVersionRepository;
pub use user_version_repository::{UserVersionRepository, UserVersionRepositoryError};
