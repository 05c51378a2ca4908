//! Display preferences persisted next to the task collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, DURATION_FORMAT_KEY, THEME_KEY};
use crate::{Error, Result};

/// How the dashboard shows the total duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationFormat {
    #[default]
    Minutes,
    Hours,
}

impl DurationFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Minutes => Self::Hours,
            Self::Hours => Self::Minutes,
        }
    }
}

impl fmt::Display for DurationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            other => Err(Error::InvalidInput(format!("unknown duration format: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(Error::InvalidInput(format!("unknown theme: {other}"))),
        }
    }
}

/// Reads a stored preference, falling back to the default when the key is
/// absent, unreadable or holds an unknown value.
fn load<T: FromStr + Default>(storage: &impl KeyValueStore, key: &str) -> T {
    match storage.get_item(key) {
        Ok(Some(value)) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, %value, "ignoring unknown preference value");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(err) => {
            tracing::warn!(key, %err, "failed to read preference");
            T::default()
        }
    }
}

pub fn duration_format(storage: &impl KeyValueStore) -> DurationFormat {
    load(storage, DURATION_FORMAT_KEY)
}

pub fn set_duration_format(storage: &mut impl KeyValueStore, format: DurationFormat) -> Result<()> {
    storage.set_item(DURATION_FORMAT_KEY, format.as_str())
}

pub fn theme(storage: &impl KeyValueStore) -> Theme {
    load(storage, THEME_KEY)
}

pub fn set_theme(storage: &mut impl KeyValueStore, theme: Theme) -> Result<()> {
    storage.set_item(THEME_KEY, theme.as_str())
}

/// Flips the stored theme and returns the new one.
pub fn toggle_theme(storage: &mut impl KeyValueStore) -> Result<Theme> {
    let next = theme(storage).toggle();
    set_theme(storage, next)?;
    Ok(next)
}
