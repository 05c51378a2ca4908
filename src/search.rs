use regex::RegexBuilder;

use crate::task::Task;
use crate::Result;

/// Tasks whose title or tag matches `query`, a case-insensitive regular
/// expression. A blank query matches everything.
pub fn search_tasks(tasks: &[Task], query: &str) -> Result<Vec<Task>> {
    if query.trim().is_empty() {
        return Ok(tasks.to_vec());
    }
    let pattern = RegexBuilder::new(query).case_insensitive(true).build()?;
    Ok(tasks
        .iter()
        .filter(|t| pattern.is_match(&t.title) || pattern.is_match(&t.tag))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use chrono::Utc;

    fn task(id: &str, title: &str, tag: &str) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            title: title.to_string(),
            duration: 30,
            tag: tag.to_string(),
            due_date: "2024-03-15".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("rec_001", "Study algebra", "School"),
            task("rec_002", "Gym session", "Health"),
            task("rec_003", "Read novel", "Leisure"),
        ]
    }

    #[test]
    fn test_blank_query_returns_all() {
        assert_eq!(search_tasks(&sample(), "  ").unwrap().len(), 3);
    }

    #[test]
    fn test_matches_title_or_tag_case_insensitively() {
        let ids = |q: &str| -> Vec<String> {
            search_tasks(&sample(), q)
                .unwrap()
                .into_iter()
                .map(|t| t.id)
                .collect()
        };
        assert_eq!(ids("STUDY"), vec!["rec_001"]);
        assert_eq!(ids("health"), vec!["rec_002"]);
        assert_eq!(ids("^(gym|read)"), vec!["rec_002", "rec_003"]);
        assert!(ids("nothing").is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let err = search_tasks(&sample(), "(unclosed").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }
}
