//! Who is asking, and may they?

use crate::domain::ports::UserProfile;
use crate::domain::{Error, ErrorCode, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Profile of the signed-in user.
///
/// A session pointing at a deleted or deactivated user counts as signed out.
pub(crate) async fn current_profile(
    state: &HttpState,
    session: &SessionContext,
) -> Result<UserProfile, Error> {
    let user_id = session.require_user_id()?;
    match state.profiles.profile(&user_id).await {
        Ok(profile) if profile.user.snapshot.active => Ok(profile),
        Ok(_) => Err(Error::unauthorized("account is inactive")),
        Err(error) if error.code() == ErrorCode::NotFound => {
            Err(Error::unauthorized("login required"))
        }
        Err(error) => Err(error),
    }
}

pub(crate) fn require_admin(current: &UserProfile) -> Result<(), Error> {
    if current.user.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden("administrator rights required"))
    }
}

/// Fail with `not_found` unless `target` exists. The signed-in user always
/// does.
pub(crate) async fn require_known_user(
    state: &HttpState,
    current: &UserProfile,
    target: &UserId,
) -> Result<(), Error> {
    if current.user.id == *target {
        return Ok(());
    }
    state.profiles.profile(target).await.map(|_| ())
}

/// Self-service or administration of `target`.
pub(crate) fn require_self_or_admin(current: &UserProfile, target: &UserId) -> Result<(), Error> {
    if current.user.id == *target || current.user.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden("not allowed to access this user"))
    }
}
