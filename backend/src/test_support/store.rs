//! One in-memory store backing every driven repository port.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::calendar::DateRange;
use crate::domain::ports::{
    ActivityRepository, ActivityRepositoryError, FreeDayRepository, FreeDayRepositoryError,
    ProjectRepository, ProjectRepositoryError, RoleRepository, RoleRepositoryError,
    UserPersistenceError, UserRepository, UserVersionRepository, UserVersionRepositoryError,
};
use crate::domain::{
    Activity, ActivityId, ClientId, FreeDay, NewUserVersion, PasswordDigest, PasswordResetToken,
    Project, ProjectId, Role, RoleId, User, UserId, UserVersion,
};

const OUTAGE: &str = "store is unavailable";

#[derive(Default)]
struct State {
    users: Vec<User>,
    digests: HashMap<UserId, PasswordDigest>,
    reset_tokens: HashMap<UserId, PasswordResetToken>,
    versions: Vec<UserVersion>,
    next_sequence: i64,
    activities: Vec<Activity>,
    free_days: BTreeSet<(UserId, NaiveDate)>,
    roles: Vec<Role>,
    projects: Vec<Project>,
}

/// Thread-safe store implementing every repository port.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    unavailable: AtomicBool,
    version_writes_fail: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every repository call fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make appending user versions fail while every other call succeeds.
    pub fn fail_version_writes(&self, fail: bool) {
        self.version_writes_fail.store(fail, Ordering::SeqCst);
    }

    pub fn add_project(&self, project: Project) {
        self.lock().projects.push(project);
    }

    pub fn add_role(&self, role: Role) {
        self.lock().roles.push(role);
    }

    pub fn add_activity(&self, activity: Activity) {
        self.lock().activities.push(activity);
    }

    pub fn add_free_day(&self, user_id: &UserId, date: NaiveDate) {
        self.lock().free_days.insert((user_id.clone(), date));
    }

    /// Latest reset token issued for `user_id`.
    pub fn reset_token(&self, user_id: &UserId) -> Option<PasswordResetToken> {
        self.lock().reset_tokens.get(user_id).cloned()
    }

    /// Versions of `user_id` in insertion order.
    pub fn stored_versions(&self, user_id: &UserId) -> Vec<UserVersion> {
        self.lock()
            .versions
            .iter()
            .filter(|version| &version.user_id == user_id)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("store mutex"),
        }
    }

    fn check<E>(&self, outage: impl FnOnce(&'static str) -> E) -> Result<(), E> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(outage(OUTAGE))
        } else {
            Ok(())
        }
    }
}

fn sort_by_name(users: &mut [User]) {
    users.sort_by(|a, b| {
        (a.snapshot.name.as_ref(), a.snapshot.login.as_ref())
            .cmp(&(b.snapshot.name.as_ref(), b.snapshot.login.as_ref()))
    });
}

fn login_taken(state: &State, user: &User) -> bool {
    state
        .users
        .iter()
        .any(|other| other.id != user.id && other.snapshot.login == user.snapshot.login)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User, password: &PasswordDigest) -> Result<(), UserPersistenceError> {
        self.check(UserPersistenceError::connection)?;
        let mut state = self.lock();
        if login_taken(&state, user) {
            return Err(UserPersistenceError::duplicate_login(
                user.snapshot.login.as_ref(),
            ));
        }
        state.users.push(user.clone());
        state.digests.insert(user.id.clone(), password.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.check(UserPersistenceError::connection)?;
        let mut state = self.lock();
        if login_taken(&state, user) {
            return Err(UserPersistenceError::duplicate_login(
                user.snapshot.login.as_ref(),
            ));
        }
        match state.users.iter_mut().find(|stored| stored.id == user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query(format!("user {} vanished", user.id))),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.check(UserPersistenceError::connection)?;
        Ok(self.lock().users.iter().find(|user| &user.id == id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, UserPersistenceError> {
        self.check(UserPersistenceError::connection)?;
        Ok(self
            .lock()
            .users
            .iter()
            .find(|user| user.snapshot.login.as_ref() == login)
            .cloned())
    }

    async fn find_by_login_or_email(
        &self,
        value: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.check(UserPersistenceError::connection)?;
        Ok(self
            .lock()
            .users
            .iter()
            .find(|user| {
                user.snapshot.login.as_ref() == value || user.snapshot.email.as_ref() == value
            })
            .cloned())
    }

    async fn find_password_digest(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordDigest>, UserPersistenceError> {
        self.check(UserPersistenceError::connection)?;
        Ok(self.lock().digests.get(id).cloned())
    }

    async fn store_password_reset_token(
        &self,
        id: &UserId,
        token: &PasswordResetToken,
    ) -> Result<(), UserPersistenceError> {
        self.check(UserPersistenceError::connection)?;
        self.lock().reset_tokens.insert(id.clone(), token.clone());
        Ok(())
    }

    async fn list_active_employees(&self) -> Result<Vec<User>, UserPersistenceError> {
        self.check(UserPersistenceError::connection)?;
        let mut employees: Vec<User> = self
            .lock()
            .users
            .iter()
            .filter(|user| user.snapshot.active && user.snapshot.client_id.is_none())
            .cloned()
            .collect();
        sort_by_name(&mut employees);
        Ok(employees)
    }

    async fn list_with_activities(
        &self,
        client: Option<ClientId>,
    ) -> Result<Vec<User>, UserPersistenceError> {
        self.check(UserPersistenceError::connection)?;
        let state = self.lock();
        let active: HashSet<&UserId> = state
            .activities
            .iter()
            .filter(|activity| {
                client.is_none_or(|client_id| activity.project.client_id == client_id)
            })
            .map(|activity| &activity.user_id)
            .collect();
        let mut users: Vec<User> = state
            .users
            .iter()
            .filter(|user| active.contains(&user.id))
            .cloned()
            .collect();
        sort_by_name(&mut users);
        Ok(users)
    }

    async fn list_by_role_name(&self, role_name: &str) -> Result<Vec<User>, UserPersistenceError> {
        self.check(UserPersistenceError::connection)?;
        let state = self.lock();
        let role_ids: HashSet<RoleId> = state
            .roles
            .iter()
            .filter(|role| role.name == role_name)
            .map(|role| role.id)
            .collect();
        let mut users: Vec<User> = state
            .users
            .iter()
            .filter(|user| user.snapshot.role_id.is_some_and(|id| role_ids.contains(&id)))
            .cloned()
            .collect();
        sort_by_name(&mut users);
        Ok(users)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        self.check(UserPersistenceError::connection)?;
        let mut state = self.lock();
        let before = state.users.len();
        state.users.retain(|user| &user.id != id);
        state.digests.remove(id);
        state.reset_tokens.remove(id);
        Ok(state.users.len() < before)
    }
}

#[async_trait]
impl UserVersionRepository for InMemoryStore {
    async fn append(
        &self,
        version: &NewUserVersion,
    ) -> Result<UserVersion, UserVersionRepositoryError> {
        self.check(UserVersionRepositoryError::connection)?;
        if self.version_writes_fail.load(Ordering::SeqCst) {
            return Err(UserVersionRepositoryError::query("version write rejected"));
        }
        let mut state = self.lock();
        state.next_sequence += 1;
        let stored = UserVersion {
            user_id: version.user_id.clone(),
            sequence: state.next_sequence,
            modified_at: version.modified_at,
            snapshot: version.snapshot.clone(),
        };
        state.versions.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserVersion>, UserVersionRepositoryError> {
        self.check(UserVersionRepositoryError::connection)?;
        let mut versions = self.stored_versions(user_id);
        versions.sort_by_key(|version| (version.modified_at, version.sequence));
        Ok(versions)
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, UserVersionRepositoryError> {
        self.check(UserVersionRepositoryError::connection)?;
        Ok(self.stored_versions(user_id).len() as u64)
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, UserVersionRepositoryError> {
        self.check(UserVersionRepositoryError::connection)?;
        let mut state = self.lock();
        let before = state.versions.len();
        state.versions.retain(|version| &version.user_id != user_id);
        Ok((before - state.versions.len()) as u64)
    }
}

#[async_trait]
impl ActivityRepository for InMemoryStore {
    async fn list_for_user(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<Vec<Activity>, ActivityRepositoryError> {
        self.check(ActivityRepositoryError::connection)?;
        let mut activities: Vec<Activity> = self
            .lock()
            .activities
            .iter()
            .filter(|activity| &activity.user_id == user_id && range.contains(activity.date))
            .cloned()
            .collect();
        activities.sort_by_key(|activity| activity.date);
        Ok(activities)
    }

    async fn activity_dates(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<BTreeSet<NaiveDate>, ActivityRepositoryError> {
        self.check(ActivityRepositoryError::connection)?;
        Ok(self
            .lock()
            .activities
            .iter()
            .filter(|activity| &activity.user_id == user_id && range.contains(activity.date))
            .map(|activity| activity.date)
            .collect())
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, ActivityRepositoryError> {
        self.check(ActivityRepositoryError::connection)?;
        Ok(self
            .lock()
            .activities
            .iter()
            .filter(|activity| &activity.user_id == user_id)
            .count() as u64)
    }

    async fn users_with_activities_on(
        &self,
        date: NaiveDate,
    ) -> Result<HashSet<UserId>, ActivityRepositoryError> {
        self.check(ActivityRepositoryError::connection)?;
        Ok(self
            .lock()
            .activities
            .iter()
            .filter(|activity| activity.date == date)
            .map(|activity| activity.user_id.clone())
            .collect())
    }

    async fn find_by_id(&self, id: &ActivityId) -> Result<Option<Activity>, ActivityRepositoryError> {
        self.check(ActivityRepositoryError::connection)?;
        Ok(self
            .lock()
            .activities
            .iter()
            .find(|activity| &activity.id == id)
            .cloned())
    }

    async fn insert(&self, activity: &Activity) -> Result<(), ActivityRepositoryError> {
        self.check(ActivityRepositoryError::connection)?;
        self.add_activity(activity.clone());
        Ok(())
    }

    async fn update(&self, activity: &Activity) -> Result<bool, ActivityRepositoryError> {
        self.check(ActivityRepositoryError::connection)?;
        let mut state = self.lock();
        match state.activities.iter_mut().find(|stored| stored.id == activity.id) {
            Some(stored) => {
                *stored = activity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ActivityId) -> Result<bool, ActivityRepositoryError> {
        self.check(ActivityRepositoryError::connection)?;
        let mut state = self.lock();
        let before = state.activities.len();
        state.activities.retain(|activity| &activity.id != id);
        Ok(state.activities.len() < before)
    }

    async fn list_for_project(
        &self,
        project_id: &ProjectId,
        range: DateRange,
    ) -> Result<Vec<Activity>, ActivityRepositoryError> {
        self.check(ActivityRepositoryError::connection)?;
        let mut activities: Vec<Activity> = self
            .lock()
            .activities
            .iter()
            .filter(|activity| &activity.project.id == project_id && range.contains(activity.date))
            .cloned()
            .collect();
        activities.sort_by_key(|activity| activity.date);
        Ok(activities)
    }

    async fn recent_projects(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Project>, ActivityRepositoryError> {
        self.check(ActivityRepositoryError::connection)?;
        let state = self.lock();
        let mut latest: Vec<(NaiveDate, &Project)> = Vec::new();
        for activity in state.activities.iter().filter(|a| &a.user_id == user_id) {
            match latest
                .iter_mut()
                .find(|(_, project)| project.id == activity.project.id)
            {
                Some((date, _)) => *date = (*date).max(activity.date),
                None => latest.push((activity.date, &activity.project)),
            }
        }
        latest.sort_by(|(a_date, a), (b_date, b)| b_date.cmp(a_date).then(a.name.cmp(&b.name)));
        Ok(latest
            .into_iter()
            .take(limit)
            .map(|(_, project)| project.clone())
            .collect())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        self.check(ProjectRepositoryError::connection)?;
        Ok(self
            .lock()
            .projects
            .iter()
            .find(|project| &project.id == id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Project>, ProjectRepositoryError> {
        self.check(ProjectRepositoryError::connection)?;
        let mut projects = self.lock().projects.clone();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }
}

#[async_trait]
impl FreeDayRepository for InMemoryStore {
    async fn dates_for_user(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> Result<BTreeSet<NaiveDate>, FreeDayRepositoryError> {
        self.check(FreeDayRepositoryError::connection)?;
        Ok(self
            .lock()
            .free_days
            .iter()
            .filter(|(owner, date)| owner == user_id && range.contains(*date))
            .map(|(_, date)| *date)
            .collect())
    }

    async fn add(&self, free_day: &FreeDay) -> Result<(), FreeDayRepositoryError> {
        self.check(FreeDayRepositoryError::connection)?;
        self.add_free_day(&free_day.user_id, free_day.date);
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, RoleRepositoryError> {
        self.check(RoleRepositoryError::connection)?;
        Ok(self.lock().roles.iter().find(|role| &role.id == id).cloned())
    }
}
