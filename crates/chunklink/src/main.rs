//! Chunklink CLI - side-by-side diff viewer with chunk actions and link maps

mod app;
mod config;
mod logging;
mod ui;
mod views;

use anyhow::{bail, Context, Result};
use app::{App, Document};
use chunklink_core::{ChunkNavigator, CopyPlacement, Mode, ScrollDirection, TextDirection};
use clap::Parser;
use config::Config;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "chl")]
#[command(author, version, about = "Side-by-side diff viewer with chunk actions")]
struct Args {
    /// Files to compare: two for a diff, three for a merge (left base right)
    #[arg(num_args = 2..=3, required = true)]
    paths: Vec<PathBuf>,

    /// Default gutter action
    #[arg(short, long, value_enum)]
    mode: Option<CliMode>,

    /// Make a pane read-only (0-based index, repeatable)
    #[arg(long, value_name = "PANE")]
    readonly: Vec<usize>,

    /// Lay panes out right-to-left
    #[arg(long)]
    rtl: bool,

    /// Print chunks, gutter icons and link map geometry as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliMode {
    /// Push chunks into the neighbouring pane
    #[value(alias = "apply")]
    Replace,
    /// Remove chunks from their own pane
    Delete,
    /// Copy chunks above or below the neighbour's chunk
    #[value(alias = "copy")]
    Insert,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Replace => Mode::Replace,
            CliMode::Delete => Mode::Delete,
            CliMode::Insert => Mode::Insert,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log {
        logging::init(path)?;
    }

    let config = Config::load();

    let mut readonly = config.panes.readonly.clone();
    readonly.extend(&args.readonly);
    if let Some(&pane) = readonly.iter().find(|&&p| p >= args.paths.len()) {
        bail!("No pane {} to make read-only", pane);
    }

    let text_direction = if args.rtl || config.ui.rtl {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    };

    let document = Document::load(&args.paths, &readonly)?;
    let mut app = App::new(document, text_direction).context("Failed to compare files")?;

    // CLI overrides config
    let mode = args
        .mode
        .map(Mode::from)
        .or_else(|| config.parse_mode())
        .unwrap_or_default();
    app.set_mode(mode);
    app.colors = config.colors.resolve();
    app.link_map_width = config.ui.link_map_width.max(1);

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&app.dump())?);
        return Ok(());
    }

    info!(panes = app.pane_count(), mode = %app.mode, "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(tick_rate)? {
            continue;
        }
        match event::read()? {
            Event::Mouse(me) => match me.kind {
                MouseEventKind::ScrollUp => app.handle_scroll(me.column, me.row, ScrollDirection::Up),
                MouseEventKind::ScrollDown => {
                    app.handle_scroll(me.column, me.row, ScrollDirection::Down)
                }
                MouseEventKind::Down(MouseButton::Left) if app.pending_copy.is_none() => {
                    app.handle_click(me.column, me.row)?;
                }
                _ => {}
            },
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                // Copy prompt takes every key until answered
                if app.pending_copy.is_some() {
                    match key.code {
                        KeyCode::Char('u') | KeyCode::Up => app.answer_copy(CopyPlacement::Up)?,
                        KeyCode::Char('d') | KeyCode::Down => {
                            app.answer_copy(CopyPlacement::Down)?
                        }
                        _ => app.cancel_copy(),
                    }
                    continue;
                }

                app.status = None;
                if !matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    app.cancel_quit();
                }
                match key.code {
                    KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        if let Err(err) = app.save() {
                            app.status = Some(format!("Save failed: {:#}", err));
                        }
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('q') | KeyCode::Esc => app.request_quit(),
                    KeyCode::Down | KeyCode::Char('j') => {
                        app.next_diff(ScrollDirection::Down);
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        app.next_diff(ScrollDirection::Up);
                    }
                    KeyCode::Char('J') | KeyCode::PageDown => app.scroll_by(3),
                    KeyCode::Char('K') | KeyCode::PageUp => app.scroll_by(-3),
                    KeyCode::Left | KeyCode::Char('h') => app.focus_left(),
                    KeyCode::Right | KeyCode::Char('l') => app.focus_right(),
                    KeyCode::Tab => app.toggle_target(),
                    KeyCode::Char('m') => app.cycle_mode(),
                    KeyCode::Enter => app.activate_current()?,
                    _ => {}
                }
            }
            _ => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
