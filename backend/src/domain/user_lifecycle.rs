//! User account lifecycle.
//!
//! Every side effect of creating, updating or destroying a user happens here
//! as an explicit call: version bookkeeping, the welcome mail, cascade
//! deletion of history and the password reset mail.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::port_error_mapping::{map_activity_error, map_mailer_error, map_user_error};
use crate::domain::ports::{
    ActivityRepository, CreateUserRequest, Mailer, UpdateUserRequest, UserAccounts,
    UserRepository,
};
use crate::domain::{
    Error, MailMessage, MailSettings, PasswordDigest, PasswordResetToken, User, UserId,
    UserSnapshot, UserValidationError, UserVersioningService,
};

fn invalid_user(error: UserValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "code": "invalid_user" }))
}

/// Implements [`UserAccounts`] on top of the user, activity and mail ports.
#[derive(Clone)]
pub struct UserLifecycleService {
    users: Arc<dyn UserRepository>,
    activities: Arc<dyn ActivityRepository>,
    versioning: UserVersioningService,
    mailer: Arc<dyn Mailer>,
    mail: MailSettings,
    clock: Arc<dyn Clock>,
}

impl UserLifecycleService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        activities: Arc<dyn ActivityRepository>,
        versioning: UserVersioningService,
        mailer: Arc<dyn Mailer>,
        mail: MailSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            activities,
            versioning,
            mailer,
            mail,
            clock,
        }
    }

    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn send_welcome(&self, user: &User) {
        let message = MailMessage::welcome(&self.mail, user);
        // Welcome mail failures are logged only.
        if let Err(error) = self.mailer.deliver(&message).await {
            warn!(user_id = %user.id, %error, "welcome mail was not delivered");
        }
    }
}

fn apply_changes(user: &mut User, request: UpdateUserRequest) {
    let UpdateUserRequest {
        name,
        login,
        email,
        role_id,
        admin,
        active,
    } = request;
    let snapshot = &mut user.snapshot;
    if let Some(name) = name {
        snapshot.name = name;
    }
    if let Some(login) = login {
        snapshot.login = login;
    }
    if let Some(email) = email {
        snapshot.email = email;
    }
    if let Some(role_id) = role_id {
        snapshot.role_id = Some(role_id);
    }
    if let Some(admin) = admin {
        snapshot.admin = admin;
    }
    if let Some(active) = active {
        snapshot.active = active;
    }
}

#[async_trait]
impl UserAccounts for UserLifecycleService {
    async fn find_user(&self, id: &UserId) -> Result<User, Error> {
        self.load(id).await
    }

    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        if request.password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        let snapshot = UserSnapshot {
            name: request.name,
            login: request.login,
            email: request.email,
            role_id: request.role_id,
            client_id: request.client_id,
            admin: request.admin,
            active: request.active,
        };
        snapshot.validate_affiliation().map_err(invalid_user)?;

        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            snapshot,
            created_at: now,
            modified_at: now,
        };
        let digest = PasswordDigest::generate(request.password.as_str());
        self.users
            .insert(&user, &digest)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, login = %user.snapshot.login, "user created");

        self.versioning
            .record_after_save(&user, user.snapshot.role_id)
            .await?;
        self.send_welcome(&user).await;
        Ok(user)
    }

    async fn update_user(&self, id: &UserId, request: UpdateUserRequest) -> Result<User, Error> {
        let mut user = self.load(id).await?;
        // History must hold the pre-update state before a role change is appended.
        self.versioning.ensure_first_version(&user).await?;

        let previous_role = user.snapshot.role_id;
        apply_changes(&mut user, request);
        user.snapshot.validate_affiliation().map_err(invalid_user)?;
        user.modified_at = self.clock.utc().max(user.created_at);

        self.users.update(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, "user updated");

        self.versioning
            .record_after_save(&user, previous_role)
            .await?;
        Ok(user)
    }

    async fn destroy_user(&self, id: &UserId) -> Result<(), Error> {
        let user = self.load(id).await?;
        let activity_count = self
            .activities
            .count_for_user(&user.id)
            .await
            .map_err(map_activity_error)?;
        if activity_count > 0 {
            return Err(Error::conflict("user has activities and cannot be deleted")
                .with_details(json!({ "activities": activity_count })));
        }

        self.versioning.delete_history(&user.id).await?;
        if !self.users.delete(&user.id).await.map_err(map_user_error)? {
            return Err(Error::not_found(format!("user {id} not found")));
        }
        info!(user_id = %user.id, "user destroyed");
        Ok(())
    }

    async fn request_password_reset(&self, login_or_email: &str) -> Result<(), Error> {
        let needle = login_or_email.trim();
        if needle.is_empty() {
            return Err(Error::invalid_request("login or email must not be empty"));
        }
        let user = self
            .users
            .find_by_login_or_email(needle)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("no user with this login or email"))?;

        let token = PasswordResetToken::issue(self.clock.utc());
        self.users
            .store_password_reset_token(&user.id, &token)
            .await
            .map_err(map_user_error)?;

        let message = MailMessage::password_reset_link(&self.mail, &user, &token.token);
        self.mailer
            .deliver(&message)
            .await
            .map_err(map_mailer_error)?;
        info!(user_id = %user.id, "password reset link sent");
        Ok(())
    }
}
