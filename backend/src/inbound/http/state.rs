//! Ports shared by every HTTP handler through `web::Data`.

use std::sync::Arc;

use crate::domain::ports::{
    ActivityCalendar, ActivityLog, LoginService, UserAccounts, UserDirectory, UserHistory,
    UserProfiles,
};

/// Dependency bundle for HTTP handlers.
///
/// Handlers depend on driving ports only, so tests can swap in mocks.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn UserAccounts>,
    pub profiles: Arc<dyn UserProfiles>,
    pub history: Arc<dyn UserHistory>,
    pub calendar: Arc<dyn ActivityCalendar>,
    pub activity_log: Arc<dyn ActivityLog>,
    pub directory: Arc<dyn UserDirectory>,
}
