//! CLI argument definitions for the planner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use planner::preferences::{DurationFormat, Theme};
use planner::ImportMode;

/// Personal task planner with a terminal dashboard.
///
/// Run without a subcommand to open the dashboard.
#[derive(Parser, Debug)]
#[command(name = "planner")]
#[command(author, version, about = "Personal task planner with a terminal dashboard", long_about = None)]
pub struct Cli {
    /// Directory holding the task collection and preferences
    #[arg(short = 'D', long, global = true, env = "PLANNER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file to read instead of ~/.config/planner/config.toml
    #[arg(long, global = true, env = "PLANNER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed document loaded on first run (overrides the config file)
    #[arg(long, global = true, env = "PLANNER_SEED")]
    pub seed: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive dashboard
    Dashboard,

    /// Add a new task
    Add {
        /// Task title
        #[arg(short, long)]
        title: String,
        /// Duration in minutes (fractions are truncated)
        #[arg(short = 'm', long, allow_hyphen_values = true)]
        duration: String,
        /// Tag, e.g. "School Work"
        #[arg(short = 'g', long)]
        tag: String,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: String,
    },

    /// Change fields of an existing task
    Edit {
        /// Task ID (e.g., rec_001)
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        /// Duration in minutes (fractions are truncated)
        #[arg(short = 'm', long, allow_hyphen_values = true)]
        duration: Option<String>,
        #[arg(short = 'g', long)]
        tag: Option<String>,
        #[arg(short, long)]
        due: Option<String>,
    },

    /// Delete a task
    Delete {
        /// Task ID (e.g., rec_001)
        id: String,
    },

    /// List all tasks in storage order
    List,

    /// Show one task
    Show {
        /// Task ID (e.g., rec_001)
        id: String,
    },

    /// Find tasks whose title or tag matches a case-insensitive regex
    Search { query: String },

    /// Print the dashboard summary
    Stats,

    /// Write all tasks as pretty-printed JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load tasks from a JSON file
    Import {
        file: PathBuf,
        /// Merge strategy (defaults to the config file's import_mode)
        #[arg(long, value_enum)]
        mode: Option<ImportModeArg>,
    },

    /// Choose how total duration is displayed
    Format {
        #[arg(value_enum)]
        format: FormatArg,
    },

    /// Show or change the theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeArg>,
    },

    /// Check task fields without saving anything
    Check {
        #[arg(short, long, default_value = "")]
        title: String,
        #[arg(short = 'm', long, default_value = "", allow_hyphen_values = true)]
        duration: String,
        #[arg(short = 'g', long, default_value = "")]
        tag: String,
        #[arg(short, long, default_value = "")]
        due: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ImportModeArg {
    Replace,
    Append,
}

impl From<ImportModeArg> for ImportMode {
    fn from(arg: ImportModeArg) -> Self {
        match arg {
            ImportModeArg::Replace => ImportMode::Replace,
            ImportModeArg::Append => ImportMode::Append,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FormatArg {
    Minutes,
    Hours,
}

impl From<FormatArg> for DurationFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Minutes => DurationFormat::Minutes,
            FormatArg::Hours => DurationFormat::Hours,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

impl ThemeArg {
    pub fn theme(self) -> Option<Theme> {
        match self {
            ThemeArg::Light => Some(Theme::Light),
            ThemeArg::Dark => Some(Theme::Dark),
            ThemeArg::Toggle => None,
        }
    }
}
