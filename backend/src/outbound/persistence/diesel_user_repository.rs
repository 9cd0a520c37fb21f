//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    ClientId, Email, Login, PasswordDigest, PasswordResetToken, RoleId, User, UserId, UserName,
    UserSnapshot,
};

use super::diesel_basic_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{CredentialsRow, NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{activities, projects, roles, users};

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

pub(super) fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |field: &str, err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {} has invalid {field}: {err}", row.id))
    };
    let snapshot = UserSnapshot {
        name: UserName::new(row.name.clone()).map_err(|err| invalid("name", err))?,
        login: Login::new(row.login.clone()).map_err(|err| invalid("login", err))?,
        email: Email::new(row.email.clone()).map_err(|err| invalid("email", err))?,
        role_id: row.role_id.map(RoleId::from_uuid),
        client_id: row.client_id.map(ClientId::from_uuid),
        admin: row.admin,
        active: row.active,
    };
    Ok(User {
        id: UserId::from_uuid(row.id),
        snapshot,
        created_at: row.created_at,
        modified_at: row.modified_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        user: &User,
        password: &PasswordDigest,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let snapshot = &user.snapshot;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            name: snapshot.name.as_ref(),
            login: snapshot.login.as_ref(),
            email: snapshot.email.as_ref(),
            role_id: snapshot.role_id.map(|id| *id.as_uuid()),
            client_id: snapshot.client_id.map(|id| *id.as_uuid()),
            admin: snapshot.admin,
            active: snapshot.active,
            password_digest: &password.digest,
            password_salt: &password.salt,
            created_at: user.created_at,
            modified_at: user.modified_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate_login(snapshot.login.as_ref())
                } else {
                    diesel_error(err)
                }
            })
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let snapshot = &user.snapshot;
        let changes = UserUpdate {
            name: snapshot.name.as_ref(),
            login: snapshot.login.as_ref(),
            email: snapshot.email.as_ref(),
            role_id: snapshot.role_id.map(|id| *id.as_uuid()),
            client_id: snapshot.client_id.map(|id| *id.as_uuid()),
            admin: snapshot.admin,
            active: snapshot.active,
            modified_at: user.modified_at,
        };

        let updated = diesel::update(users::table.find(user.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate_login(snapshot.login.as_ref())
                } else {
                    diesel_error(err)
                }
            })?;
        if updated == 0 {
            return Err(UserPersistenceError::query(format!(
                "user {} vanished before update",
                user.id
            )));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .filter(users::login.eq(login))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_login_or_email(
        &self,
        value: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .filter(users::login.eq(value).or(users::email.eq(value)))
            .order(users::created_at.asc())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_password_digest(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordDigest>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<CredentialsRow> = users::table
            .find(id.as_uuid())
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(|row| PasswordDigest {
            salt: row.password_salt,
            digest: row.password_digest,
        }))
    }

    async fn store_password_reset_token(
        &self,
        id: &UserId,
        token: &PasswordResetToken,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(users::table.find(id.as_uuid()))
            .set((
                users::password_reset_token.eq(Some(token.token.as_str())),
                users::password_reset_token_expires_at.eq(Some(token.expires_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list_active_employees(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::active.eq(true))
            .filter(users::client_id.is_null())
            .order((users::name.asc(), users::login.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn list_with_activities(
        &self,
        client: Option<ClientId>,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ordered = users::table
            .order((users::name.asc(), users::login.asc()))
            .select(UserRow::as_select());
        let rows: Vec<UserRow> = match client {
            Some(client_id) => ordered
                .filter(
                    users::id.eq_any(
                        activities::table
                            .inner_join(projects::table)
                            .filter(projects::client_id.eq(*client_id.as_uuid()))
                            .select(activities::user_id),
                    ),
                )
                .load::<UserRow>(&mut conn)
                .await,
            None => ordered
                .filter(users::id.eq_any(activities::table.select(activities::user_id)))
                .load::<UserRow>(&mut conn)
                .await,
        }
        .map_err(diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn list_by_role_name(&self, role_name: &str) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(
                users::role_id.eq_any(
                    roles::table
                        .filter(roles::name.eq(role_name))
                        .select(roles::id.nullable()),
                ),
            )
            .order((users::name.asc(), users::login.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(users::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
