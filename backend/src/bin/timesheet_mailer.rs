//! Send timesheet reminders, reports and summaries.
//!
//! Meant to be run by an external scheduler once per working day.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use timesheet::domain::calendar::{DateRange, previous_weekday};
use timesheet::domain::{ActivityCalendarService, TimesheetNotificationService, UserId};
use timesheet::outbound::persistence::{
    DbPool, DieselActivityRepository, DieselFreeDayRepository, DieselUserRepository,
    run_pending_migrations,
};
use timesheet::settings::AppSettings;

/// `timesheet-mailer` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "timesheet-mailer",
    about = "Send timesheet reminders, reports and summaries",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Remind every active employee who logged nothing on a day.
    Naggers {
        /// Day to check; defaults to the previous weekday.
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },
    /// Mail the configured reporter the list of idle employees.
    Reporter {
        /// Day to check; defaults to the previous weekday.
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },
    /// Mail one user the summary of a date range.
    Summary {
        #[arg(long, value_name = "uuid")]
        user: UserId,
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: NaiveDate,
        #[arg(long, value_name = "YYYY-MM-DD")]
        to: NaiveDate,
    },
    /// Apply pending database migrations.
    Migrate,
}

fn default_day(date: Option<NaiveDate>) -> Result<NaiveDate> {
    match date {
        Some(date) => Ok(date),
        None => previous_weekday(Utc::now().date_naive())
            .ok_or_else(|| eyre!("no weekday precedes today")),
    }
}

async fn notification_service(settings: &AppSettings) -> Result<TimesheetNotificationService> {
    let pool = DbPool::new(settings.pool_config()?)
        .await
        .wrap_err("create database pool")?;
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let activities = Arc::new(DieselActivityRepository::new(pool.clone()));
    let calendar = Arc::new(ActivityCalendarService::new(
        activities.clone(),
        Arc::new(DieselFreeDayRepository::new(pool)),
    ));
    Ok(TimesheetNotificationService::new(
        users,
        activities,
        calendar,
        settings.mailer()?,
        settings.mail_settings()?,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = AppSettings::from_env("timesheet-mailer")?;

    match args.command {
        Command::Migrate => {
            let applied = run_pending_migrations(settings.database_url()?).await?;
            info!(applied, "migrations applied");
        }
        Command::Naggers { date } => {
            let date = default_day(date)?;
            let report = notification_service(&settings)
                .await?
                .send_naggers_for(date)
                .await?;
            if report.failed > 0 {
                return Err(eyre!(
                    "{} of {} reminders for {date} were not delivered",
                    report.failed,
                    report.sent + report.failed
                ));
            }
        }
        Command::Reporter { date } => {
            let date = default_day(date)?;
            let to = settings.reporter_email()?;
            notification_service(&settings)
                .await?
                .send_reporter_for(date, &to)
                .await?;
        }
        Command::Summary { user, from, to } => {
            notification_service(&settings)
                .await?
                .send_summary_for(&user, DateRange::new(from, to))
                .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[rstest]
    #[case(&["timesheet-mailer", "naggers"], None)]
    #[case(&["timesheet-mailer", "naggers", "--date", "2009-08-03"], NaiveDate::from_ymd_opt(2009, 8, 3))]
    fn parses_naggers(#[case] argv: &[&str], #[case] expected: Option<NaiveDate>) {
        let args = CliArgs::try_parse_from(argv).expect("valid arguments");
        assert!(matches!(args.command, Command::Naggers { date } if date == expected));
    }

    #[test]
    fn summary_requires_a_range() {
        let user = UserId::random().to_string();
        assert!(CliArgs::try_parse_from(["timesheet-mailer", "summary", "--user", &user]).is_err());
        let args = CliArgs::try_parse_from([
            "timesheet-mailer",
            "summary",
            "--user",
            &user,
            "--from",
            "2009-08-01",
            "--to",
            "2009-08-31",
        ])
        .expect("valid arguments");
        assert!(matches!(args.command, Command::Summary { .. }));
    }

    #[test]
    fn explicit_date_wins_over_default() {
        let date = NaiveDate::from_ymd_opt(2009, 8, 3).expect("valid date");
        assert_eq!(default_day(Some(date)).expect("date"), date);
    }
}
