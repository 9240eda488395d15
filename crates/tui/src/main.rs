// # -----------------------------
// # crates/tui/src/main.rs
// # -----------------------------
mod ansi;
mod event;
mod terminal;
mod ui;

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use diffnav_common::{parse_unified_diff, sort_files, Config, FileChange};
use diffnav_core::{App, Command, Input};
use diffnav_tools::formatter::{self, Formatter};
use diffnav_tools::{copy_to_clipboard, open_in_editor};
use ratatui::backend::{Backend, CrosstermBackend, TestBackend};
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::ansi::StyledDiff;
use crate::terminal::TerminalGuard;

/// Largest diff accepted on the command line or stdin.
const MAX_INPUT_BYTES: usize = 16 * 1024 * 1024;
const TICK: Duration = Duration::from_millis(50);
const HEADLESS_SIZE: (u16, u16) = (80, 24);

#[derive(Parser, Debug, Clone)]
#[command(name = "diffnav", version, about = "Browse a unified diff by file tree")]
struct Args {
    /// Unified diff to open ('-' or nothing reads stdin)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,
}

enum LoadError {
    NotFound,
    TooLarge,
    Read(String),
    Parse(String),
}

impl LoadError {
    fn reason(&self) -> &'static str {
        match self {
            LoadError::NotFound => "not_found",
            LoadError::TooLarge => "too_large",
            LoadError::Read(_) => "read_failed",
            LoadError::Parse(_) => "parse_error",
        }
    }
}

fn print_diff_error(err: &LoadError, path: &Path) {
    let mut error = serde_json::json!({
        "diff_load_failed": true,
        "reason": err.reason(),
        "path": path,
    });
    if let LoadError::Read(message) | LoadError::Parse(message) = err {
        error["message"] = serde_json::Value::from(message.as_str());
    }
    let _ = writeln!(
        std::io::stderr(),
        "{}",
        serde_json::json!({ "type": "tool.error", "error": error })
    );
}

fn main() -> Result<()> {
    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let headless = headless_mode();
    init_logging(headless)?;

    let path = args.path.unwrap_or_else(|| PathBuf::from("-"));
    let files = match load_diff(&path, MAX_INPUT_BYTES) {
        Ok(files) => files,
        Err(err) => {
            print_diff_error(&err, &path);
            std::process::exit(2);
        }
    };
    if files.is_empty() {
        info!("diff has no files");
        return Ok(());
    }
    info!(files = files.len(), path = %path.display(), "diff loaded");

    let config = Config::load();
    let mut app = App::new(config.ui, files);

    if headless {
        let (width, height) = HEADLESS_SIZE;
        app.update(Input::Resize { width, height });
        let mut terminal = Terminal::new(TestBackend::new(width, height))?;
        let mut styled = StyledDiff::default();
        terminal.draw(|f| ui::draw(f, &app, &mut styled))?;
        println!("{}", ui::outline(&app));
        return Ok(());
    }

    let formatter = Formatter::resolve(&app.config().formatter).map_err(|err| {
        warn!(error = %err, "diff formatter unavailable, showing raw patches");
        err.to_string()
    });
    let runtime = Runtime::new().context("start async runtime")?;
    let guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;
    let result = run_app(&mut terminal, &guard, &mut app, &runtime, formatter);
    terminal.show_cursor().ok();
    drop(guard);
    result
}

fn headless_mode() -> bool {
    std::env::var("DIFFNAV_HEADLESS")
        .ok()
        .map(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return true;
            }
            matches!(
                trimmed.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}

/// `DIFFNAV_LOG` filters (default `warn`). Logs go to `DIFFNAV_LOG_FILE`,
/// or stderr when headless; otherwise the screen belongs to the viewer.
fn init_logging(headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env("DIFFNAV_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Some(path) = std::env::var_os("DIFFNAV_LOG_FILE") {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open log file: {}", Path::new(&path).display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn load_diff(path: &Path, max_size: usize) -> Result<Vec<Arc<FileChange>>, LoadError> {
    let content = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .lock()
            .take(max_size as u64 + 1)
            .read_to_end(&mut buf)
            .map_err(|e| LoadError::Read(e.to_string()))?;
        if buf.len() > max_size {
            return Err(LoadError::TooLarge);
        }
        String::from_utf8_lossy(&buf).into_owned()
    } else {
        let metadata = fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound
            } else {
                LoadError::Read(e.to_string())
            }
        })?;
        if metadata.len() > max_size as u64 {
            return Err(LoadError::TooLarge);
        }
        let bytes = fs::read(path).map_err(|e| LoadError::Read(e.to_string()))?;
        String::from_utf8_lossy(&bytes).into_owned()
    };

    let mut files: Vec<Arc<FileChange>> = parse_unified_diff(&content)
        .map_err(|e| LoadError::Parse(e.to_string()))?
        .into_iter()
        .map(Arc::new)
        .collect();
    sort_files(&mut files);
    Ok(files)
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    guard: &TerminalGuard,
    app: &mut App,
    runtime: &Runtime,
    formatter: Result<Formatter, String>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut styled = StyledDiff::default();
    let mut queue = VecDeque::new();
    let size = terminal.size()?;
    queue.push_back(Input::Resize {
        width: size.width,
        height: size.height,
    });

    loop {
        while let Ok(result) = rx.try_recv() {
            queue.push_back(Input::Rendered(result));
        }
        while let Some(input) = queue.pop_front() {
            for command in app.update(input) {
                match command {
                    Command::Quit => return Ok(()),
                    Command::Render(request) => {
                        let formatter = formatter.clone();
                        let tx = tx.clone();
                        runtime.spawn(async move {
                            let result = formatter::run(formatter, request).await;
                            let _ = tx.send(result);
                        });
                    }
                    Command::CopyToClipboard(text) => {
                        if let Err(err) = copy_to_clipboard(&text) {
                            warn!(error = %err, "copy failed");
                            queue.push_back(Input::ToolFailed(err.to_string()));
                        }
                    }
                    Command::OpenEditor(path) => {
                        guard.suspend()?;
                        let opened = open_in_editor(&path);
                        guard.resume()?;
                        terminal.clear()?;
                        if let Err(err) = opened {
                            warn!(error = %err, "editor failed");
                            queue.push_back(Input::ToolFailed(err.to_string()));
                        }
                    }
                }
            }
        }

        terminal.draw(|f| ui::draw(f, app, &mut styled))?;

        if crossterm::event::poll(TICK)? {
            if let Some(input) = event::translate(crossterm::event::read()?) {
                queue.push_back(input);
            }
        }
    }
}
