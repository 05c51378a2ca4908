//! Handlers behind each CLI subcommand.

use std::fs;
use std::path::Path;

use planner::dashboard::{self, Summary};
use planner::preferences::{self, DurationFormat, Theme};
use planner::search::search_tasks;
use planner::storage::KeyValueStore;
use planner::validation;
use planner::{Error, ImportMode, Result, Task, TaskDraft, TaskStore};

pub fn add<K: KeyValueStore>(store: &mut TaskStore<K>, draft: TaskDraft) -> Result<()> {
    let fields = draft.trimmed().validate()?;
    let task = store.add_task(fields)?;
    println!("Added {} \"{}\"", task.id, task.title);
    Ok(())
}

pub struct EditArgs {
    pub title: Option<String>,
    pub duration: Option<String>,
    pub tag: Option<String>,
    pub due: Option<String>,
}

/// Validates the task as it would look after the edit, then stores it.
pub fn edit<K: KeyValueStore>(store: &mut TaskStore<K>, id: &str, args: EditArgs) -> Result<()> {
    let existing = store
        .find_task(id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;

    let mut draft = TaskDraft::from(&existing);
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(duration) = args.duration {
        draft.duration = duration;
    }
    if let Some(tag) = args.tag {
        draft.tag = tag;
    }
    if let Some(due) = args.due {
        draft.due_date = due;
    }

    let fields = draft.trimmed().validate()?;
    let task = store
        .update_task(id, fields.into())?
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    println!("Updated {} \"{}\"", task.id, task.title);
    Ok(())
}

pub fn delete<K: KeyValueStore>(store: &mut TaskStore<K>, id: &str) -> Result<()> {
    if store.delete_task(id)? {
        println!("Deleted {id}");
    } else {
        println!("No task {id}, nothing deleted");
    }
    Ok(())
}

pub fn list<K: KeyValueStore>(store: &TaskStore<K>) -> Result<()> {
    print_tasks(&store.get_tasks());
    Ok(())
}

pub fn show<K: KeyValueStore>(store: &TaskStore<K>, id: &str) -> Result<()> {
    let task = store
        .find_task(id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    println!("{} {}", task.id, task.title);
    println!("  Due:      {}", task.due_date);
    println!("  Duration: {}", dashboard::format_hrs_mins(task.duration));
    println!("  Tag:      {}", task.tag);
    println!("  Created:  {}", task.created_at.to_rfc3339());
    println!("  Updated:  {}", task.updated_at.to_rfc3339());
    Ok(())
}

pub fn search<K: KeyValueStore>(store: &TaskStore<K>, query: &str) -> Result<()> {
    let matches = search_tasks(&store.get_tasks(), query)?;
    print_tasks(&matches);
    Ok(())
}

pub fn stats<K: KeyValueStore>(store: &TaskStore<K>, recent_limit: usize) -> Result<()> {
    let summary = Summary::from_tasks(&store.get_tasks(), recent_limit);
    let format = preferences::duration_format(store.storage());
    println!("Total tasks:    {}", summary.total_tasks);
    println!(
        "Total duration: {}",
        dashboard::format_total_duration(summary.total_minutes, format)
    );
    println!(
        "Most used tag:  {}",
        summary.most_used_tag.as_deref().unwrap_or("-")
    );
    println!("Recent activity:");
    for task in &summary.recent {
        println!(
            "  {} ({} - {})",
            task.title,
            task.tag,
            dashboard::format_hrs_mins(task.duration)
        );
    }
    Ok(())
}

pub fn export<K: KeyValueStore>(store: &TaskStore<K>, output: Option<&Path>) -> Result<()> {
    let data = store.export_data()?;
    match output {
        Some(path) => {
            fs::write(path, data)?;
            println!("Exported tasks to {}", path.display());
        }
        None => println!("{data}"),
    }
    Ok(())
}

pub fn import<K: KeyValueStore>(store: &mut TaskStore<K>, file: &Path, mode: ImportMode) -> Result<()> {
    let text = fs::read_to_string(file)?;
    let count = store.import_data(&text, mode)?;
    println!("Imported {count} tasks");
    Ok(())
}

pub fn set_format<K: KeyValueStore>(store: &mut TaskStore<K>, format: DurationFormat) -> Result<()> {
    preferences::set_duration_format(store.storage_mut(), format)?;
    println!("Duration format set to {format}");
    Ok(())
}

/// `None` prints the current theme, `Some(None)` toggles it.
pub fn theme<K: KeyValueStore>(store: &mut TaskStore<K>, target: Option<Option<Theme>>) -> Result<()> {
    let theme = match target {
        None => preferences::theme(store.storage()),
        Some(None) => preferences::toggle_theme(store.storage_mut())?,
        Some(Some(theme)) => {
            preferences::set_theme(store.storage_mut(), theme)?;
            theme
        }
    };
    println!("Theme: {theme}");
    Ok(())
}

/// Runs every field check on raw input and prints the verdicts.
pub fn check(title: &str, duration: &str, tag: &str, due: &str) -> Result<()> {
    let report = validation::validate_fields(title, duration, tag, due);

    if validation::has_duplicate_words(title) {
        println!("Hint: title repeats a word");
    }
    let times = validation::extract_time_tokens(title);
    if !times.is_empty() {
        println!("Times mentioned: {}", times.join(", "));
    }

    if report.is_valid {
        println!("Valid");
        Ok(())
    } else {
        Err(Error::Validation(report.errors))
    }
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks");
        return;
    }
    for task in tasks {
        println!(
            "{}  {}  [{}]  due {}  {}",
            task.id,
            task.title,
            task.tag,
            task.due_date,
            dashboard::format_hrs_mins(task.duration)
        );
    }
}
