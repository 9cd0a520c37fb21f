//! Port for the projects activities are booked against.

use async_trait::async_trait;

use crate::domain::{Project, ProjectId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "project repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError>;

    /// Every project, ordered by name.
    async fn list_all(&self) -> Result<Vec<Project>, ProjectRepositoryError>;
}
