//! Summary figures shown on the dashboard. Recomputed from the full
//! collection on every refresh.

use crate::preferences::DurationFormat;
use crate::task::Task;

pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_tasks: usize,
    /// Sum of every task's duration, in minutes.
    pub total_minutes: u64,
    pub most_used_tag: Option<String>,
    /// Newest first.
    pub recent: Vec<Task>,
}

impl Summary {
    pub fn from_tasks(tasks: &[Task], recent_limit: usize) -> Self {
        Self {
            total_tasks: tasks.len(),
            total_minutes: total_minutes(tasks),
            most_used_tag: most_used_tag(tasks),
            recent: recent_tasks(tasks, recent_limit),
        }
    }
}

pub fn total_minutes(tasks: &[Task]) -> u64 {
    tasks.iter().map(|t| u64::from(t.duration)).sum()
}

/// Tag with the highest count. On a tie the tag seen first wins.
pub fn most_used_tag(tasks: &[Task]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for task in tasks {
        match counts.iter_mut().find(|(tag, _)| *tag == task.tag) {
            Some((_, count)) => *count += 1,
            None => counts.push((task.tag.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (tag, count) in counts {
        if best.map_or(true, |(_, max)| count > max) {
            best = Some((tag, count));
        }
    }
    best.map(|(tag, _)| tag.to_string())
}

/// Up to `limit` tasks ordered by creation time, newest first.
pub fn recent_tasks(tasks: &[Task], limit: usize) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// "125 mins", or in hours "2.08 hrs" / "2 hrs".
pub fn format_total_duration(total_minutes: u64, format: DurationFormat) -> String {
    match format {
        DurationFormat::Minutes => format!("{total_minutes} mins"),
        DurationFormat::Hours => {
            if total_minutes % 60 == 0 {
                format!("{} hrs", total_minutes / 60)
            } else {
                format!("{:.2} hrs", total_minutes as f64 / 60.0)
            }
        }
    }
}

/// "45 mins", "1 hr", "2 hrs 5 mins", "1 hr 1 min".
pub fn format_hrs_mins(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes} min{}", plural(minutes));
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{hours} hr{}", plural(hours))
    } else {
        format!("{hours} hr{} {rest} min{}", plural(hours), plural(rest))
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn task(n: i64, tag: &str, duration: u32) -> Task {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(n);
        Task {
            id: format!("rec_{n:03}"),
            title: format!("Task {n}"),
            duration,
            tag: tag.to_string(),
            due_date: "2024-03-15".to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_most_used_tag_prefers_first_on_tie() {
        let tasks: Vec<Task> = ["A", "B", "A", "C", "B"]
            .iter()
            .enumerate()
            .map(|(i, tag)| task(i as i64, tag, 10))
            .collect();
        assert_eq!(most_used_tag(&tasks).as_deref(), Some("A"));
    }

    #[test]
    fn test_most_used_tag_highest_count_wins() {
        let tasks: Vec<Task> = ["A", "B", "B"]
            .iter()
            .enumerate()
            .map(|(i, tag)| task(i as i64, tag, 10))
            .collect();
        assert_eq!(most_used_tag(&tasks).as_deref(), Some("B"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::from_tasks(&[], DEFAULT_RECENT_LIMIT);
        assert_eq!(summary.total_tasks, 0);
        assert_eq!(summary.total_minutes, 0);
        assert_eq!(summary.most_used_tag, None);
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn test_summary_totals_and_recent_order() {
        let tasks: Vec<Task> = (1..=7).map(|n| task(n, "Lab", 30)).collect();
        let summary = Summary::from_tasks(&tasks, DEFAULT_RECENT_LIMIT);
        assert_eq!(summary.total_tasks, 7);
        assert_eq!(summary.total_minutes, 210);
        let recent: Vec<&str> = summary.recent.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(recent, vec!["rec_007", "rec_006", "rec_005", "rec_004", "rec_003"]);
    }

    #[test]
    fn test_recent_ignores_storage_order() {
        let tasks = vec![task(5, "A", 1), task(9, "A", 1), task(2, "A", 1)];
        let recent: Vec<String> = recent_tasks(&tasks, 5).into_iter().map(|t| t.id).collect();
        assert_eq!(recent, vec!["rec_009", "rec_005", "rec_002"]);
    }

    #[test]
    fn test_format_total_duration() {
        assert_eq!(format_total_duration(125, DurationFormat::Minutes), "125 mins");
        assert_eq!(format_total_duration(125, DurationFormat::Hours), "2.08 hrs");
        assert_eq!(format_total_duration(120, DurationFormat::Hours), "2 hrs");
        assert_eq!(format_total_duration(90, DurationFormat::Hours), "1.50 hrs");
        assert_eq!(format_total_duration(0, DurationFormat::Hours), "0 hrs");
    }

    #[test]
    fn test_format_hrs_mins() {
        assert_eq!(format_hrs_mins(0), "0 mins");
        assert_eq!(format_hrs_mins(1), "1 min");
        assert_eq!(format_hrs_mins(45), "45 mins");
        assert_eq!(format_hrs_mins(60), "1 hr");
        assert_eq!(format_hrs_mins(61), "1 hr 1 min");
        assert_eq!(format_hrs_mins(125), "2 hrs 5 mins");
        assert_eq!(format_hrs_mins(180), "3 hrs");
    }
}
