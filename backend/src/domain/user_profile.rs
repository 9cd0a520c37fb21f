//! Resolves users with their role-derived permissions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::port_error_mapping::{map_role_error, map_user_error};
use crate::domain::ports::{
    RoleRepository, UserDirectory, UserProfile, UserProfiles, UserRepository,
};
use crate::domain::role::MANAGER_ROLE_NAME;
use crate::domain::{ClientId, Error, User, UserId};

#[derive(Clone)]
pub struct UserProfileService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl UserProfileService {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }
}

#[async_trait]
impl UserProfiles for UserProfileService {
    async fn profile(&self, id: &UserId) -> Result<UserProfile, Error> {
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;

        // A dangling role reference grants nothing.
        let role = match user.snapshot.role_id {
            Some(role_id) => self
                .roles
                .find_by_id(&role_id)
                .await
                .map_err(map_role_error)?,
            None => None,
        };

        Ok(UserProfile {
            kind: user.kind(),
            can_manage_financial_data: user.can_manage_financial_data(role.as_ref()),
            user,
        })
    }
}

#[async_trait]
impl UserDirectory for UserProfileService {
    async fn users_with_activities(&self, client: Option<ClientId>) -> Result<Vec<User>, Error> {
        self.users
            .list_with_activities(client)
            .await
            .map_err(map_user_error)
    }

    async fn managers(&self) -> Result<Vec<User>, Error> {
        let users = self
            .users
            .list_by_role_name(MANAGER_ROLE_NAME)
            .await
            .map_err(map_user_error)?;
        Ok(users.into_iter().filter(User::is_employee).collect())
    }
}
