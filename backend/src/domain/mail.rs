//! Plain-text mail messages sent by the application.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::domain::calendar::DateRange;
use crate::domain::{DayActivities, Email, User, format_minutes};

/// Sender address and links used when rendering mails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub from: Email,
    pub site_url: String,
}

impl MailSettings {
    pub fn new(from: Email, site_url: impl Into<String>) -> Self {
        let site_url = site_url.into().trim_end_matches('/').to_owned();
        Self { from, site_url }
    }
}

/// Fully rendered message handed to a [`crate::domain::ports::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: Email,
    pub from: Email,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Mail greeting a freshly created user.
    pub fn welcome(settings: &MailSettings, user: &User) -> Self {
        let body = format!(
            "Hello {name},\n\n\
             welcome to Timesheet! Your account has been created with the login \"{login}\".\n\n\
             Sign in at {site}\n",
            name = user.snapshot.name,
            login = user.snapshot.login,
            site = settings.site_url,
        );
        Self {
            to: user.snapshot.email.clone(),
            from: settings.from.clone(),
            subject: "Welcome to Timesheet!".to_owned(),
            body,
        }
    }

    /// Mail carrying the password reset link.
    pub fn password_reset_link(settings: &MailSettings, user: &User, token: &str) -> Self {
        let body = format!(
            "Hello {name},\n\n\
             somebody asked to reset password for your account. If it was you, \
             open the link below within 24 hours:\n\n\
             {site}/password-reset/{token}\n\n\
             Otherwise you can ignore this message.\n",
            name = user.snapshot.name,
            site = settings.site_url,
        );
        Self {
            to: user.snapshot.email.clone(),
            from: settings.from.clone(),
            subject: "Password reset request from Timesheet".to_owned(),
            body,
        }
    }

    /// Reminder for an employee who logged nothing on `date`.
    pub fn timesheet_nagger(settings: &MailSettings, user: &User, date: NaiveDate) -> Self {
        let body = format!(
            "Hello {name},\n\n\
             you have not logged any activities for {date}. Please fill in your timesheet at \
             {site}/activities\n",
            name = user.snapshot.name,
            site = settings.site_url,
        );
        Self {
            to: user.snapshot.email.clone(),
            from: settings.from.clone(),
            subject: format!("Timesheet reminder for {date}"),
            body,
        }
    }

    /// Report listing every employee who logged nothing on `date`.
    pub fn timesheet_reporter(
        settings: &MailSettings,
        to: &Email,
        date: NaiveDate,
        idle_users: &[User],
    ) -> Self {
        let mut body = format!("Employees without activities on {date}:\n\n");
        if idle_users.is_empty() {
            body.push_str("(none)\n");
        }
        for user in idle_users {
            let _ = writeln!(body, "- {} <{}>", user.snapshot.name, user.snapshot.email);
        }
        Self {
            to: to.clone(),
            from: settings.from.clone(),
            subject: format!("Employees without activities on {date}"),
            body,
        }
    }

    /// Day-by-day summary of a user's activities.
    pub fn timesheet_summary(
        settings: &MailSettings,
        user: &User,
        range: DateRange,
        days: &[DayActivities],
    ) -> Self {
        let mut body = format!(
            "Hello {},\n\nhere is your timesheet for {}..{}:\n",
            user.snapshot.name, range.start, range.end
        );
        for day in days {
            let _ = write!(body, "\n{}", day.date);
            if day.projects.is_empty() {
                body.push_str(": no activities\n");
                continue;
            }
            let _ = writeln!(body, " ({})", format_minutes(Some(day.total_minutes())));
            for project in &day.projects {
                let _ = writeln!(
                    body,
                    "  {}: {}",
                    project.project.name,
                    format_minutes(Some(project.total_minutes()))
                );
                for activity in project.activities.iter().filter(|a| !a.comments.is_empty()) {
                    let _ = writeln!(body, "    - {}", activity.comments);
                }
            }
        }
        let total = days.iter().map(DayActivities::total_minutes).sum::<u32>();
        let _ = writeln!(body, "\nTotal: {}", format_minutes(Some(total)));
        Self {
            to: user.snapshot.email.clone(),
            from: settings.from.clone(),
            subject: format!("Timesheet summary for {}..{}", range.start, range.end),
            body,
        }
    }
}
