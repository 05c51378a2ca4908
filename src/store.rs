use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, TASKS_KEY};
use crate::task::{NewTask, Task, TaskPatch};
use crate::{Error, Result};

const ID_PREFIX: &str = "rec_";

/// How an imported document is merged into the stored collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// The document becomes the whole collection.
    #[default]
    Replace,
    /// Every imported task gets a fresh id and is appended.
    Append,
}

/// Task record as accepted from an external document. Ids and timestamps
/// may be missing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedTask {
    id: Option<String>,
    title: String,
    duration: u32,
    tag: String,
    due_date: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl ImportedTask {
    fn into_task(self, id: String, now: DateTime<Utc>) -> Task {
        let created_at = self.created_at.unwrap_or(now);
        let updated_at = self.updated_at.unwrap_or(now).max(created_at);
        Task {
            id,
            title: self.title,
            duration: self.duration,
            tag: self.tag,
            due_date: self.due_date,
            created_at,
            updated_at,
        }
    }
}

/// Owner of the persisted task collection.
///
/// Every mutation reads the full collection, changes it and writes it back;
/// nothing is cached between calls.
#[derive(Debug)]
pub struct TaskStore<K> {
    storage: K,
}

impl<K: KeyValueStore> TaskStore<K> {
    pub fn new(storage: K) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut K {
        &mut self.storage
    }

    /// Whether a collection has ever been written. A storage read failure
    /// is returned rather than read as "absent".
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.storage.get_item(TASKS_KEY)?.is_some())
    }

    /// Loads the seed document as the initial collection, once. Returns
    /// `true` if seeding happened. An unusable seed is logged and skipped.
    pub fn initialize(&mut self, seed: Option<&Path>) -> Result<bool> {
        if self.is_initialized()? {
            return Ok(false);
        }
        let Some(seed) = seed else {
            return Ok(false);
        };
        let text = match fs::read_to_string(seed) {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(path = %seed.display(), %err, "failed to read seed data");
                return Ok(false);
            }
        };
        match self.import_data(&text, ImportMode::Replace) {
            Ok(count) => {
                tracing::info!(path = %seed.display(), count, "loaded seed data");
                Ok(true)
            }
            Err(Error::Import(reason)) => {
                tracing::error!(path = %seed.display(), %reason, "failed to load seed data");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// The full collection in storage order. Absent or corrupt state reads
    /// as empty.
    pub fn get_tasks(&self) -> Vec<Task> {
        let data = match self.storage.get_item(TASKS_KEY) {
            Ok(Some(data)) => data,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(%err, "failed to read tasks, treating as empty");
                return Vec::new();
            }
        };
        serde_json::from_str(&data).unwrap_or_else(|err| {
            tracing::warn!(%err, "stored tasks are corrupt, treating as empty");
            Vec::new()
        })
    }

    pub fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        let data = serde_json::to_string(tasks)?;
        self.storage.set_item(TASKS_KEY, &data)
    }

    pub fn find_task(&self, id: &str) -> Option<Task> {
        self.get_tasks().into_iter().find(|t| t.id == id)
    }

    pub fn add_task(&mut self, fields: NewTask) -> Result<Task> {
        let mut tasks = self.get_tasks();
        let id = IdCounter::after(tasks.iter().map(|t| t.id.as_str())).mint()?;
        let now = Utc::now();
        let task = Task {
            id,
            title: fields.title,
            duration: fields.duration,
            tag: fields.tag,
            due_date: fields.due_date,
            created_at: now,
            updated_at: now,
        };
        tasks.push(task.clone());
        self.save_tasks(&tasks)?;
        tracing::info!(id = %task.id, "added task");
        Ok(task)
    }

    /// Merges `patch` over the task with `id`. Returns `None` without
    /// writing anything when no such task exists.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<Option<Task>> {
        let mut tasks = self.get_tasks();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(id, "update of unknown task ignored");
            return Ok(None);
        };
        patch.apply(task);
        task.updated_at = Utc::now().max(task.updated_at);
        let updated = task.clone();
        self.save_tasks(&tasks)?;
        tracing::info!(id, "updated task");
        Ok(Some(updated))
    }

    /// Removes the task with `id`, if any. Returns whether one was removed.
    pub fn delete_task(&mut self, id: &str) -> Result<bool> {
        let tasks = self.get_tasks();
        let before = tasks.len();
        let remaining: Vec<Task> = tasks.into_iter().filter(|t| t.id != id).collect();
        self.save_tasks(&remaining)?;
        let removed = remaining.len() != before;
        if removed {
            tracing::info!(id, "deleted task");
        }
        Ok(removed)
    }

    pub fn export_data(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.get_tasks())?)
    }

    /// Merges a JSON array of tasks into the collection according to `mode`.
    /// A malformed document fails with [`Error::Import`] and nothing is
    /// written. Returns the number of imported tasks.
    pub fn import_data(&mut self, text: &str, mode: ImportMode) -> Result<usize> {
        let imported = parse_import(text)?;
        let count = imported.len();
        let now = Utc::now();

        let tasks = match mode {
            ImportMode::Replace => {
                ensure_unique_ids(&imported)?;
                let mut ids =
                    IdCounter::after(imported.iter().filter_map(|t| t.id.as_deref()));
                imported
                    .into_iter()
                    .map(|mut record| {
                        let id = match record.id.take() {
                            Some(id) => id,
                            None => ids.mint().map_err(import_exhausted)?,
                        };
                        Ok(record.into_task(id, now))
                    })
                    .collect::<Result<Vec<_>>>()?
            }
            ImportMode::Append => {
                let mut tasks = self.get_tasks();
                let mut ids = IdCounter::after(tasks.iter().map(|t| t.id.as_str()));
                for record in imported {
                    let id = ids.mint().map_err(import_exhausted)?;
                    tasks.push(record.into_task(id, now));
                }
                tasks
            }
        };

        self.save_tasks(&tasks)?;
        tracing::info!(?mode, count, "imported tasks");
        Ok(count)
    }
}

fn parse_import(text: &str) -> Result<Vec<ImportedTask>> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| Error::Import(format!("not valid JSON: {e}")))?;
    if !value.is_array() {
        return Err(Error::Import("expected a JSON array of tasks".to_string()));
    }
    serde_json::from_value(value).map_err(|e| Error::Import(format!("invalid task record: {e}")))
}

fn ensure_unique_ids(imported: &[ImportedTask]) -> Result<()> {
    let mut seen = HashSet::new();
    for id in imported.iter().filter_map(|t| t.id.as_deref()) {
        if !seen.insert(id) {
            return Err(Error::Import(format!("duplicate id {id}")));
        }
    }
    Ok(())
}

/// Numeric suffix of a `rec_NNN` id.
fn id_number(id: &str) -> Option<u64> {
    let digits = id.strip_prefix(ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Hands out `rec_NNN` ids above the highest one already in use.
struct IdCounter {
    next: Option<u64>,
}

impl IdCounter {
    fn after<'a>(ids: impl Iterator<Item = &'a str>) -> Self {
        let next = match ids.filter_map(id_number).max() {
            Some(n) => n.checked_add(1),
            None => Some(1),
        };
        Self { next }
    }

    fn mint(&mut self) -> Result<String> {
        let n = self.next.ok_or(Error::IdsExhausted)?;
        self.next = n.checked_add(1);
        Ok(format_id(n))
    }
}

fn import_exhausted(_: Error) -> Error {
    Error::Import("id counter exhausted".to_string())
}

fn format_id(n: u64) -> String {
    format!("{ID_PREFIX}{n:03}")
}
