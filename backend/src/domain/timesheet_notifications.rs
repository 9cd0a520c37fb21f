//! Timesheet reminder, report and summary mails.
//!
//! Invoked by the `timesheet-mailer` binary, which an external scheduler runs
//! once per working day.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::calendar::DateRange;
use crate::domain::port_error_mapping::{map_activity_error, map_mailer_error, map_user_error};
use crate::domain::ports::{ActivityCalendar, ActivityRepository, Mailer, UserRepository};
use crate::domain::{Email, Error, MailMessage, MailSettings, User, UserId};

/// Outcome of a batch of mails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct TimesheetNotificationService {
    users: Arc<dyn UserRepository>,
    activities: Arc<dyn ActivityRepository>,
    calendar: Arc<dyn ActivityCalendar>,
    mailer: Arc<dyn Mailer>,
    mail: MailSettings,
}

impl TimesheetNotificationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        activities: Arc<dyn ActivityRepository>,
        calendar: Arc<dyn ActivityCalendar>,
        mailer: Arc<dyn Mailer>,
        mail: MailSettings,
    ) -> Self {
        Self {
            users,
            activities,
            calendar,
            mailer,
            mail,
        }
    }

    /// Active employees that logged nothing on `date`, ordered by name.
    pub async fn users_without_activities_on(&self, date: NaiveDate) -> Result<Vec<User>, Error> {
        let employees = self
            .users
            .list_active_employees()
            .await
            .map_err(map_user_error)?;
        let busy = self
            .activities
            .users_with_activities_on(date)
            .await
            .map_err(map_activity_error)?;
        Ok(employees
            .into_iter()
            .filter(|user| !busy.contains(&user.id))
            .collect())
    }

    /// Remind every idle employee. Individual delivery failures are counted
    /// and logged; the batch carries on.
    pub async fn send_naggers_for(&self, date: NaiveDate) -> Result<DeliveryReport, Error> {
        let mut report = DeliveryReport::default();
        for user in self.users_without_activities_on(date).await? {
            let message = MailMessage::timesheet_nagger(&self.mail, &user, date);
            match self.mailer.deliver(&message).await {
                Ok(()) => report.sent += 1,
                Err(error) => {
                    warn!(user_id = %user.id, %error, "timesheet nagger was not delivered");
                    report.failed += 1;
                }
            }
        }
        info!(%date, sent = report.sent, failed = report.failed, "timesheet naggers sent");
        Ok(report)
    }

    /// Send one mail to `to` listing the idle employees.
    pub async fn send_reporter_for(&self, date: NaiveDate, to: &Email) -> Result<(), Error> {
        let idle = self.users_without_activities_on(date).await?;
        let message = MailMessage::timesheet_reporter(&self.mail, to, date, &idle);
        self.mailer
            .deliver(&message)
            .await
            .map_err(map_mailer_error)?;
        info!(%date, idle = idle.len(), "timesheet report sent");
        Ok(())
    }

    /// Mail a user the day-by-day summary of `range`.
    pub async fn send_summary_for(&self, user_id: &UserId, range: DateRange) -> Result<(), Error> {
        if range.is_empty() {
            return Err(Error::invalid_request("summary range ends before it starts"));
        }
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
        let days = self
            .calendar
            .activities_by_dates_and_projects(user_id, range)
            .await?;
        let message = MailMessage::timesheet_summary(&self.mail, &user, range, &days);
        self.mailer
            .deliver(&message)
            .await
            .map_err(map_mailer_error)?;
        info!(user_id = %user_id, "timesheet summary sent");
        Ok(())
    }
}
