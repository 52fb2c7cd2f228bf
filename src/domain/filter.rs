use chrono::{DateTime, Datelike, Days, Local, Utc};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;
use super::task::{Task, TaskStatus};

/// Status dimension of the view filter. Applied by the store at fetch
/// time, so the fetched collection already reflects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    /// Value for the `status` query parameter, `None` when unfiltered.
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status.as_str()),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        if normalized == "all" {
            return Ok(StatusFilter::All);
        }
        normalized
            .parse::<TaskStatus>()
            .map(StatusFilter::Only)
            .map_err(|_| DomainError::UnrecognizedFilter(s.to_string()))
    }
}

/// Creation-time dimension of the view filter. Applied client-side
/// against `created_at`, in local time. Weeks start on Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    All,
    Today,
    ThisWeek,
    ThisMonth,
}

impl TimeFilter {
    /// Whether a task created at `created_at` falls inside this window,
    /// evaluated at `now`. Tasks without a creation timestamp fail every
    /// window except `All`.
    pub fn matches(&self, created_at: Option<DateTime<Utc>>, now: DateTime<Local>) -> bool {
        if matches!(self, TimeFilter::All) {
            return true;
        }
        let Some(created) = created_at else {
            return false;
        };
        let created = created.with_timezone(&Local);
        match self {
            TimeFilter::All => true,
            TimeFilter::Today => created.date_naive() == now.date_naive(),
            TimeFilter::ThisWeek => {
                let week_start =
                    now.date_naive() - Days::new(u64::from(now.weekday().num_days_from_sunday()));
                created.date_naive() >= week_start
            }
            TimeFilter::ThisMonth => {
                created.year() == now.year() && created.month() == now.month()
            }
        }
    }

    /// Pure projection of the collection onto this window. Never mutates
    /// or reorders the input.
    pub fn apply(&self, tasks: &[Task], now: DateTime<Local>) -> Vec<Task> {
        tasks
            .iter()
            .filter(|task| self.matches(task.created_at, now))
            .cloned()
            .collect()
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeFilter::All => "all",
            TimeFilter::Today => "today",
            TimeFilter::ThisWeek => "this_week",
            TimeFilter::ThisMonth => "this_month",
        };
        write!(f, "{s}")
    }
}

impl FromStr for TimeFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "all" => Ok(TimeFilter::All),
            "today" => Ok(TimeFilter::Today),
            "this_week" => Ok(TimeFilter::ThisWeek),
            "this_month" => Ok(TimeFilter::ThisMonth),
            _ => Err(DomainError::UnrecognizedFilter(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskId;
    use chrono::TimeZone;

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn created(y: i32, m: u32, d: u32, h: u32) -> Option<DateTime<Utc>> {
        Some(local(y, m, d, h).with_timezone(&Utc))
    }

    fn task(id: &str, created_at: Option<DateTime<Utc>>) -> Task {
        Task {
            id: TaskId::from(id),
            title: format!("task {id}"),
            description: None,
            status: TaskStatus::Pending,
            created_at,
            updated_at: None,
        }
    }

    // 2026-08-05 is a Wednesday; the week containing it starts on
    // Sunday 2026-08-02.
    fn wednesday_noon() -> DateTime<Local> {
        local(2026, 8, 5, 12)
    }

    #[test]
    fn all_filter_is_the_identity() {
        let tasks = vec![
            task("1", created(2026, 8, 5, 9)),
            task("2", None),
            task("3", created(1999, 1, 1, 0)),
        ];
        assert_eq!(TimeFilter::All.apply(&tasks, wednesday_noon()), tasks);
    }

    #[test]
    fn missing_created_at_fails_every_window() {
        let now = wednesday_noon();
        for filter in [TimeFilter::Today, TimeFilter::ThisWeek, TimeFilter::ThisMonth] {
            assert!(filter.apply(&[task("1", None)], now).is_empty());
        }
    }

    #[test]
    fn today_requires_calendar_day_equality() {
        let now = wednesday_noon();
        assert!(TimeFilter::Today.matches(created(2026, 8, 5, 0), now));
        assert!(TimeFilter::Today.matches(created(2026, 8, 5, 23), now));
        assert!(!TimeFilter::Today.matches(created(2026, 8, 4, 23), now));
        assert!(!TimeFilter::Today.matches(created(2026, 8, 6, 0), now));
        assert!(!TimeFilter::Today.matches(created(2025, 8, 5, 12), now));
    }

    #[test]
    fn this_week_starts_on_sunday_midnight() {
        let now = wednesday_noon();
        // Sunday itself is inside the week, from midnight on.
        assert!(TimeFilter::ThisWeek.matches(created(2026, 8, 2, 0), now));
        assert!(TimeFilter::ThisWeek.matches(created(2026, 8, 4, 12), now));
        // Saturday of the previous week is outside.
        assert!(!TimeFilter::ThisWeek.matches(created(2026, 8, 1, 23), now));
    }

    #[test]
    fn this_week_on_a_sunday_covers_only_that_day_so_far() {
        let sunday = local(2026, 8, 2, 12);
        assert!(TimeFilter::ThisWeek.matches(created(2026, 8, 2, 1), sunday));
        assert!(!TimeFilter::ThisWeek.matches(created(2026, 8, 1, 23), sunday));
    }

    #[test]
    fn this_month_requires_same_year_and_month() {
        let now = wednesday_noon();
        assert!(TimeFilter::ThisMonth.matches(created(2026, 8, 1, 0), now));
        assert!(TimeFilter::ThisMonth.matches(created(2026, 8, 31, 23), now));
        assert!(!TimeFilter::ThisMonth.matches(created(2026, 7, 31, 23), now));
        assert!(!TimeFilter::ThisMonth.matches(created(2025, 8, 15, 12), now));
    }

    #[test]
    fn task_created_today_passes_today_window() {
        let now = wednesday_noon();
        let tasks = vec![task("1", created(2026, 8, 5, 9))];
        let visible = TimeFilter::Today.apply(&tasks, now);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, TaskId::from("1"));
    }

    #[test]
    fn task_from_previous_month_is_filtered_out() {
        let now = wednesday_noon();
        let tasks = vec![task("1", created(2026, 7, 15, 9))];
        assert!(TimeFilter::ThisMonth.apply(&tasks, now).is_empty());
    }

    #[test]
    fn apply_preserves_store_order() {
        let now = wednesday_noon();
        let tasks = vec![
            task("3", created(2026, 8, 5, 9)),
            task("1", created(2026, 8, 5, 10)),
            task("2", created(2026, 8, 5, 8)),
        ];
        let visible = TimeFilter::Today.apply(&tasks, now);
        let ids: Vec<&str> = visible.iter().map(|t| t.id.0.as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[test]
    fn status_filter_query_values() {
        assert_eq!(StatusFilter::All.query_value(), None);
        assert_eq!(
            StatusFilter::Only(TaskStatus::InProgress).query_value(),
            Some("in_progress")
        );
    }

    #[test]
    fn filters_parse_from_cli_spellings() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "in-progress".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(TaskStatus::InProgress)
        );
        assert_eq!(
            "this_week".parse::<TimeFilter>().unwrap(),
            TimeFilter::ThisWeek
        );
        assert_eq!(
            "this-month".parse::<TimeFilter>().unwrap(),
            TimeFilter::ThisMonth
        );
        assert!("yesterday".parse::<TimeFilter>().is_err());
        assert!("done".parse::<StatusFilter>().is_err());
    }
}
