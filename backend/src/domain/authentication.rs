//! Local password authentication.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::port_error_mapping::map_user_error;
use crate::domain::ports::{LoginService, UserRepository};
use crate::domain::{Error, LoginCredentials, UserId};

/// Authenticates against the salted digests stored with each user.
///
/// Inactive users and unknown logins fail exactly like a wrong password.
#[derive(Clone)]
pub struct LocalLoginService {
    users: Arc<dyn UserRepository>,
}

impl LocalLoginService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl LoginService for LocalLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let rejected = || Error::unauthorized("invalid credentials");

        let Some(user) = self
            .users
            .find_by_login(credentials.login())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login rejected: unknown login");
            return Err(rejected());
        };
        if !user.snapshot.active {
            debug!(user_id = %user.id, "login rejected: inactive user");
            return Err(rejected());
        }

        let digest = self
            .users
            .find_password_digest(&user.id)
            .await
            .map_err(map_user_error)?;
        match digest {
            Some(digest) if digest.matches(credentials.password()) => Ok(user.id),
            _ => Err(rejected()),
        }
    }
}
