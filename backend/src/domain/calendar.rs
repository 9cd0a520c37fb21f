//! Calendar helpers shared by the aggregator and the mailer.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Whether `date` falls on a Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether `date` falls between Monday and Friday.
pub fn is_weekday(date: NaiveDate) -> bool {
    !is_weekend(date)
}

/// The closest weekday strictly before `date`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use timesheet::domain::calendar::previous_weekday;
///
/// let monday = NaiveDate::from_ymd_opt(2009, 4, 20).expect("valid date");
/// let friday = NaiveDate::from_ymd_opt(2009, 4, 17).expect("valid date");
/// assert_eq!(previous_weekday(monday), Some(friday));
/// ```
pub fn previous_weekday(date: NaiveDate) -> Option<NaiveDate> {
    let mut current = date.pred_opt()?;
    while is_weekend(current) {
        current = current.pred_opt()?;
    }
    Some(current)
}

/// Inclusive range of calendar dates.
///
/// A range whose `end` precedes `start` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// Keep only Monday to Friday.
pub fn weekdays_only(days: impl IntoIterator<Item = NaiveDate>) -> Vec<NaiveDate> {
    days.into_iter().filter(|day| is_weekday(*day)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[rstest]
    #[case(date(2009, 4, 18), true)]
    #[case(date(2009, 4, 19), true)]
    #[case(date(2009, 4, 20), false)]
    #[case(date(2009, 4, 17), false)]
    fn classifies_weekends(#[case] day: NaiveDate, #[case] weekend: bool) {
        assert_eq!(is_weekend(day), weekend);
        assert_eq!(is_weekday(day), !weekend);
    }

    #[rstest]
    #[case(date(2009, 4, 20), date(2009, 4, 17))]
    #[case(date(2009, 4, 19), date(2009, 4, 17))]
    #[case(date(2009, 4, 18), date(2009, 4, 17))]
    #[case(date(2009, 4, 22), date(2009, 4, 21))]
    fn previous_weekday_skips_weekends(#[case] from: NaiveDate, #[case] expected: NaiveDate) {
        assert_eq!(previous_weekday(from), Some(expected));
    }

    #[rstest]
    fn range_is_inclusive() {
        let range = DateRange::new(date(2009, 4, 1), date(2009, 4, 30));
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 30);
        assert_eq!(days.first(), Some(&date(2009, 4, 1)));
        assert_eq!(days.last(), Some(&date(2009, 4, 30)));
        assert_eq!(weekdays_only(range.days()).len(), 22);
    }

    #[rstest]
    fn reversed_range_is_empty() {
        let range = DateRange::new(date(2009, 4, 30), date(2009, 4, 1));
        assert!(range.is_empty());
        assert_eq!(range.days().count(), 0);
    }
}
