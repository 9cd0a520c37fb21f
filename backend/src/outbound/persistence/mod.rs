//! PostgreSQL adapters for the repository ports.
//!
//! Adapters only translate between Diesel rows and domain types. Row structs
//! and table definitions stay private to this module; every Diesel failure
//! leaves as the owning port's error type.
//!
//! ```no_run
//! use timesheet::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), timesheet::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/timesheet")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_activity_repository;
mod diesel_basic_error_mapping;
mod diesel_free_day_repository;
mod diesel_project_repository;
mod diesel_role_repository;
mod diesel_user_repository;
mod diesel_user_version_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_activity_repository::DieselActivityRepository;
pub use diesel_free_day_repository::DieselFreeDayRepository;
pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_role_repository::DieselRoleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_user_version_repository::DieselUserVersionRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
