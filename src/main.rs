mod cli;
mod commands;
mod ui;

use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use planner::config::{self, Config};
use planner::storage::{FileStorage, KeyValueStore};
use planner::{TaskDraft, TaskStore};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> planner::Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let config = Config::load(&config_path)?;
    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref())?;
    let _guard = init_logging(&data_dir);

    let mut store = TaskStore::new(FileStorage::new(&data_dir));
    let seed = cli.seed.as_deref().or(config.seed_path.as_deref());
    store.initialize(seed)?;

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => run_dashboard(&mut store, config.recent_limit),
        Commands::Add {
            title,
            duration,
            tag,
            due,
        } => commands::add(&mut store, TaskDraft::new(title, duration, tag, due)),
        Commands::Edit {
            id,
            title,
            duration,
            tag,
            due,
        } => commands::edit(
            &mut store,
            &id,
            commands::EditArgs {
                title,
                duration,
                tag,
                due,
            },
        ),
        Commands::Delete { id } => commands::delete(&mut store, &id),
        Commands::List => commands::list(&store),
        Commands::Show { id } => commands::show(&store, &id),
        Commands::Search { query } => commands::search(&store, &query),
        Commands::Stats => commands::stats(&store, config.recent_limit),
        Commands::Export { output } => commands::export(&store, output.as_deref()),
        Commands::Import { file, mode } => {
            let mode = mode.map(Into::into).unwrap_or(config.import_mode);
            commands::import(&mut store, &file, mode)
        }
        Commands::Format { format } => commands::set_format(&mut store, format.into()),
        Commands::Theme { action } => commands::theme(&mut store, action.map(|a| a.theme())),
        Commands::Check {
            title,
            duration,
            tag,
            due,
        } => commands::check(&title, &duration, &tag, &due),
    }
}

/// Logs go to `<data_dir>/planner.log`; the dashboard owns the terminal.
fn init_logging(data_dir: &Path) -> Option<WorkerGuard> {
    if let Err(err) = fs::create_dir_all(data_dir) {
        eprintln!("Logging disabled: cannot create {}: {err}", data_dir.display());
        return None;
    }
    let appender = tracing_appender::rolling::never(data_dir, "planner.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("PLANNER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    Some(guard)
}

fn run_dashboard<K: KeyValueStore>(store: &mut TaskStore<K>, recent_limit: usize) -> planner::Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, store, recent_limit);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
