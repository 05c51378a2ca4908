//! Field acceptance checks for task input.
//!
//! Every check is a pure function of its input. The store never calls these;
//! callers validate a [`TaskDraft`] before handing it to the store.

use std::fmt::Display;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::task::TaskDraft;

pub const TITLE_ERROR: &str = "Invalid title format";
pub const DURATION_ERROR: &str = "Invalid duration";
pub const DATE_ERROR: &str = "Invalid date format";
pub const TAG_ERROR: &str = "Invalid tag format";

static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S(?:.*\S)?$").expect("title pattern"));

// Positive number, no leading zero, up to two decimals after a literal dot.
static DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]*(?:\.[0-9]{1,2})?$").expect("duration pattern"));

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12][0-9]|3[01])$").expect("date pattern")
});

static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+(?:[ -][A-Za-z]+)*$").expect("tag pattern"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("word pattern"));

static TIME_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{2}:[0-9]{2}\b").expect("time pattern"));

/// Outcome of [`validate_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

pub fn validate_title(title: &str) -> bool {
    TITLE.is_match(title)
}

/// Checks the value's textual form, so both `90` and `"12.5"` can be passed.
pub fn validate_duration<D: Display>(duration: D) -> bool {
    DURATION.is_match(&duration.to_string())
}

/// `YYYY-MM-DD` that also names a real calendar day.
pub fn validate_date(date: &str) -> bool {
    DATE.is_match(date) && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

pub fn validate_tag(tag: &str) -> bool {
    TAG.is_match(tag)
}

/// True when the same word appears twice in a row, e.g. "the the".
pub fn has_duplicate_words(text: &str) -> bool {
    let mut previous: Option<regex::Match<'_>> = None;
    for word in WORD.find_iter(text) {
        if let Some(prev) = previous {
            let gap = &text[prev.end()..word.start()];
            if prev.as_str() == word.as_str() && gap.chars().all(char::is_whitespace) {
                return true;
            }
        }
        previous = Some(word);
    }
    false
}

/// Every `HH:MM` token in `text`, in order of appearance.
pub fn extract_time_tokens(text: &str) -> Vec<String> {
    TIME_TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Runs all four field checks without short-circuiting. Messages are ordered
/// title, duration, date, tag.
pub fn validate_fields<D: Display>(
    title: &str,
    duration: D,
    tag: &str,
    due_date: &str,
) -> ValidationReport {
    let mut errors = Vec::new();

    if !validate_title(title) {
        errors.push(TITLE_ERROR.to_string());
    }
    if !validate_duration(duration) {
        errors.push(DURATION_ERROR.to_string());
    }
    if !validate_date(due_date) {
        errors.push(DATE_ERROR.to_string());
    }
    if !validate_tag(tag) {
        errors.push(TAG_ERROR.to_string());
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn validate_task(draft: &TaskDraft) -> ValidationReport {
    validate_fields(&draft.title, &draft.duration, &draft.tag, &draft.due_date)
}
