use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use planner::dashboard::{self, Summary};
use planner::preferences::{self, DurationFormat, Theme};
use planner::search::search_tasks;
use planner::storage::KeyValueStore;
use planner::{Task, TaskDraft, TaskStore};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

const HELP: &str =
    "a add  e edit  d delete  / search  c clear  f minutes/hours  t theme  q quit";

/// Dashboard state. `visible` is the (possibly filtered) task list; both it
/// and `summary` are rebuilt from the store after every change.
struct App {
    summary: Summary,
    visible: Vec<Task>,
    selected: usize,
    query: String,
    format: DurationFormat,
    theme: Theme,
    recent_limit: usize,
    status: String,
}

impl App {
    fn new<K: KeyValueStore>(store: &TaskStore<K>, recent_limit: usize) -> Self {
        let mut app = Self {
            summary: Summary::from_tasks(&[], recent_limit),
            visible: Vec::new(),
            selected: 0,
            query: String::new(),
            format: preferences::duration_format(store.storage()),
            theme: preferences::theme(store.storage()),
            recent_limit,
            status: String::new(),
        };
        app.refresh(store);
        app
    }

    fn refresh<K: KeyValueStore>(&mut self, store: &TaskStore<K>) {
        let tasks = store.get_tasks();
        self.summary = Summary::from_tasks(&tasks, self.recent_limit);
        self.visible = match search_tasks(&tasks, &self.query) {
            Ok(found) => found,
            Err(err) => {
                self.status = err.to_string();
                tasks
            }
        };
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    fn selected_task(&self) -> Option<&Task> {
        self.visible.get(self.selected)
    }

    fn palette(&self) -> (Style, Style) {
        match self.theme {
            Theme::Light => (
                Style::default().fg(Color::Black).bg(Color::White),
                Style::default().fg(Color::Blue),
            ),
            Theme::Dark => (
                Style::default().fg(Color::White).bg(Color::Black),
                Style::default().fg(Color::Cyan),
            ),
        }
    }
}

pub fn run_app<B: Backend, K: KeyValueStore>(
    terminal: &mut Terminal<B>,
    store: &mut TaskStore<K>,
    recent_limit: usize,
) -> planner::Result<()> {
    let mut app = App::new(store, recent_limit);
    loop {
        terminal.draw(|f| draw(f, &app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') => return Ok(()), // Quit
            KeyCode::Char('a') => {
                let draft = prompt_draft(None);
                app.status = submit(store, None, draft);
                terminal.clear()?;
            }
            KeyCode::Char('e') => {
                if let Some(task) = app.selected_task().cloned() {
                    let draft = prompt_draft(Some(&task));
                    app.status = submit(store, Some(&task.id), draft);
                    terminal.clear()?;
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = app.selected_task().cloned() {
                    let answer = prompt(&format!("Delete \"{}\"? (y/N)", task.title));
                    if matches!(answer.as_deref(), Some("y") | Some("Y")) {
                        app.status = match store.delete_task(&task.id) {
                            Ok(_) => format!("Deleted {}", task.id),
                            Err(err) => err.to_string(),
                        };
                    }
                    terminal.clear()?;
                }
            }
            KeyCode::Char('/') => {
                if let Some(query) = prompt("Search (regex, title or tag)") {
                    app.query = query;
                    app.selected = 0;
                    app.status.clear();
                }
                terminal.clear()?;
            }
            KeyCode::Char('c') => {
                app.query.clear();
                app.status.clear();
            }
            KeyCode::Char('f') => {
                app.format = app.format.toggle();
                preferences::set_duration_format(store.storage_mut(), app.format)?;
            }
            KeyCode::Char('t') => {
                app.theme = preferences::toggle_theme(store.storage_mut())?;
            }
            KeyCode::Up => {
                if app.selected > 0 {
                    app.selected -= 1;
                }
            }
            KeyCode::Down => {
                if app.selected + 1 < app.visible.len() {
                    app.selected += 1;
                }
            }
            _ => {}
        }
        app.refresh(store);
    }
}

fn draw(f: &mut Frame, app: &App) {
    let (base, accent) = app.palette();
    f.render_widget(Block::default().style(base), f.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_cards(f, app, rows[0], accent);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    draw_tasks(f, app, middle[0], accent);
    draw_recent(f, app, middle[1], accent);

    let footer = if app.status.is_empty() {
        HELP.to_string()
    } else {
        app.status.clone()
    };
    f.render_widget(Paragraph::new(footer).style(base), rows[2]);
}

fn draw_cards(f: &mut Frame, app: &App, area: Rect, accent: Style) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    let values = [
        ("Total Tasks", app.summary.total_tasks.to_string()),
        (
            "Total Duration",
            dashboard::format_total_duration(app.summary.total_minutes, app.format),
        ),
        (
            "Most Used Tag",
            app.summary
                .most_used_tag
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        ),
    ];

    for (i, (title, value)) in values.into_iter().enumerate() {
        let card = Paragraph::new(Span::styled(value, accent.add_modifier(Modifier::BOLD)))
            .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(card, cards[i]);
    }
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect, accent: Style) {
    let items: Vec<ListItem> = app
        .visible
        .iter()
        .map(|t| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("[{}] ", t.id)),
                Span::styled(t.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!(
                    " ({}) Due: {} - {}",
                    t.tag,
                    t.due_date,
                    dashboard::format_hrs_mins(t.duration)
                )),
            ]))
        })
        .collect();

    let title = if app.query.is_empty() {
        "Tasks".to_string()
    } else {
        format!("Tasks matching /{}/", app.query)
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(accent),
        )
        .highlight_style(accent.add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if !app.visible.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_recent(f: &mut Frame, app: &App, area: Rect, accent: Style) {
    let items: Vec<ListItem> = app
        .summary
        .recent
        .iter()
        .map(|t| {
            ListItem::new(vec![
                Line::from(Span::styled(t.title.as_str(), accent)),
                Line::from(format!("{} - {}", t.tag, dashboard::format_hrs_mins(t.duration))),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title("Recent Activity")
            .borders(Borders::ALL),
    );
    f.render_widget(list, area);
}

/// Asks for every field. With an existing task, an empty answer keeps the
/// current value.
fn prompt_draft(existing: Option<&Task>) -> Option<TaskDraft> {
    let mut draft = existing.map(TaskDraft::from).unwrap_or_default();
    let current = |value: String| -> String {
        if existing.is_some() {
            format!(" [{value}]")
        } else {
            String::new()
        }
    };

    let title = prompt(&format!("Title{}", current(draft.title.clone())))?;
    let duration = prompt(&format!(
        "Duration in minutes{}",
        current(draft.duration.clone())
    ))?;
    let tag = prompt(&format!("Tag{}", current(draft.tag.clone())))?;
    let due_date = prompt(&format!(
        "Due date (YYYY-MM-DD){}",
        current(draft.due_date.clone())
    ))?;

    let keep = existing.is_some();
    if !(keep && title.is_empty()) {
        draft.title = title;
    }
    if !(keep && duration.is_empty()) {
        draft.duration = duration;
    }
    if !(keep && tag.is_empty()) {
        draft.tag = tag;
    }
    if !(keep && due_date.is_empty()) {
        draft.due_date = due_date;
    }
    Some(draft)
}

/// Validates and stores a draft, returning the status line to show.
fn submit<K: KeyValueStore>(
    store: &mut TaskStore<K>,
    id: Option<&str>,
    draft: Option<TaskDraft>,
) -> String {
    let Some(draft) = draft else {
        return "Cancelled".to_string();
    };
    let fields = match draft.trimmed().validate() {
        Ok(fields) => fields,
        Err(err) => return err.to_string().replace('\n', " / "),
    };
    let result = match id {
        Some(id) => store
            .update_task(id, fields.into())
            .map(|task| task.map(|t| format!("Updated {}", t.id))),
        None => store.add_task(fields).map(|t| Some(format!("Added {}", t.id))),
    };
    match result {
        Ok(Some(message)) => message,
        Ok(None) => "Task no longer exists".to_string(),
        Err(err) => err.to_string(),
    }
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        enable_raw_mode().ok();
        Some(input.trim().to_string())
    } else {
        enable_raw_mode().ok();
        None
    }
}
