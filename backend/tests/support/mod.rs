//! Shared world for integration tests: in-memory store, controllable clock
//! and recording mailer wired into the real domain services.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use zeroize::Zeroizing;

use timesheet::domain::ports::CreateUserRequest;
use timesheet::domain::{
    Activity, ActivityCalendarService, ActivityId, ActivityLogService, ClientId, Email,
    LocalLoginService, Login, MailSettings, Project, ProjectId, Role, RoleId,
    TimesheetNotificationService, User, UserLifecycleService, UserName, UserProfileService,
    UserVersioningService,
};
use timesheet::inbound::http::state::HttpState;
use timesheet::test_support::{InMemoryStore, MutableClock, RecordingMailer};

pub const PASSWORD: &str = "correct horse";

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn role(name: &str, can_manage_financial_data: bool) -> Role {
    Role {
        id: RoleId::random(),
        name: name.to_owned(),
        can_manage_financial_data,
    }
}

pub fn employee_request(login: &str, role_id: RoleId) -> CreateUserRequest {
    CreateUserRequest {
        name: UserName::new(format!("Employee {login}")).expect("valid name"),
        login: Login::new(login).expect("valid login"),
        email: Email::new(format!("{login}@example.com")).expect("valid email"),
        role_id: Some(role_id),
        client_id: None,
        admin: false,
        active: true,
        password: Zeroizing::new(PASSWORD.to_owned()),
    }
}

pub fn admin_request(login: &str, role_id: RoleId) -> CreateUserRequest {
    CreateUserRequest {
        admin: true,
        ..employee_request(login, role_id)
    }
}

pub fn client_request(login: &str) -> CreateUserRequest {
    client_of(login, ClientId::random())
}

pub fn client_of(login: &str, client_id: ClientId) -> CreateUserRequest {
    CreateUserRequest {
        role_id: None,
        client_id: Some(client_id),
        ..employee_request(login, RoleId::random())
    }
}

pub struct World {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub mailer: Arc<RecordingMailer>,
    pub versioning: UserVersioningService,
    pub accounts: UserLifecycleService,
    pub calendar: ActivityCalendarService,
    pub activity_log: ActivityLogService,
    pub profiles: UserProfileService,
    pub notifications: TimesheetNotificationService,
    pub project: Project,
}

impl World {
    pub fn new(now: DateTime<Utc>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(now));
        let mailer = Arc::new(RecordingMailer::new());
        let mail = MailSettings::new(
            Email::new("timesheet@example.com").expect("valid email"),
            "https://timesheet.example.com",
        );

        let versioning = UserVersioningService::new(store.clone(), store.clone(), clock.clone());
        let accounts = UserLifecycleService::new(
            store.clone(),
            store.clone(),
            versioning.clone(),
            mailer.clone(),
            mail.clone(),
            clock.clone(),
        );
        let calendar = ActivityCalendarService::new(store.clone(), store.clone());
        let notifications = TimesheetNotificationService::new(
            store.clone(),
            store.clone(),
            Arc::new(calendar.clone()),
            mailer.clone(),
            mail,
        );
        let activity_log = ActivityLogService::new(store.clone(), store.clone(), store.clone());
        let profiles = UserProfileService::new(store.clone(), store.clone());
        let project = Project {
            id: ProjectId::random(),
            client_id: ClientId::random(),
            name: "Timesheet".to_owned(),
        };
        store.add_project(project.clone());

        Self {
            store,
            clock,
            mailer,
            versioning,
            accounts,
            calendar,
            activity_log,
            profiles,
            notifications,
            project,
        }
    }

    /// Register another project owned by `client_id`.
    pub fn add_project(&self, name: &str, client_id: ClientId) -> Project {
        let project = Project {
            id: ProjectId::random(),
            client_id,
            name: name.to_owned(),
        };
        self.store.add_project(project.clone());
        project
    }

    /// Log `minutes` of work for `user` on `day`.
    pub fn log_activity(&self, user: &User, day: NaiveDate, minutes: u32, comments: &str) {
        self.log_on(user, &self.project, day, minutes, comments);
    }

    /// Log `minutes` of work for `user` on `project`.
    pub fn log_on(
        &self,
        user: &User,
        project: &Project,
        day: NaiveDate,
        minutes: u32,
        comments: &str,
    ) {
        self.store.add_activity(Activity {
            id: ActivityId::random(),
            user_id: user.id.clone(),
            project: project.clone(),
            date: day,
            minutes,
            comments: comments.to_owned(),
        });
    }

    /// Handler state backed by this world.
    pub fn http_state(&self) -> HttpState {
        HttpState {
            login: Arc::new(LocalLoginService::new(self.store.clone())),
            accounts: Arc::new(self.accounts.clone()),
            profiles: Arc::new(self.profiles.clone()),
            directory: Arc::new(self.profiles.clone()),
            history: Arc::new(self.versioning.clone()),
            calendar: Arc::new(self.calendar.clone()),
            activity_log: Arc::new(self.activity_log.clone()),
        }
    }
}
