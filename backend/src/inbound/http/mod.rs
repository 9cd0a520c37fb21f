//! HTTP inbound adapter exposing the REST endpoints under `/api/v1`.

pub(crate) mod access;
pub mod activities;
pub mod activity_log;
pub mod auth;
pub mod directory;
pub mod error;
pub mod health;
pub mod menu;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod versions;

pub use error::ApiResult;
