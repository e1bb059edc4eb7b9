mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    tty::IsTty,
};
use cubetime::{
    app_dirs::AppDirs,
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore, StorageBackend},
    display::ScreenModel,
    input::{Action, KeyBindings},
    runtime::{CrosstermEventSource, Runner, StopwatchTicker, TimerEvent},
    storage::KvStore,
    store::SolveStore,
    SessionController, SessionOptions, SolveId,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

/// speedcubing timer with scrambles, solve history and progress chart
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A terminal speedcubing timer. Generates scrambles, times solves with the space bar, keeps a persistent history and charts your progress."
)]
pub struct Cli {
    /// refresh period of the running display, in milliseconds
    #[clap(short = 't', long)]
    tick_ms: Option<u64>,

    /// number of history rows to display
    #[clap(long)]
    history_rows: Option<usize>,

    /// where solves are persisted
    #[clap(long, value_enum)]
    storage: Option<StorageBackend>,

    /// custom path for the solve storage file
    #[clap(short = 'd', long)]
    data_file: Option<PathBuf>,

    /// hide the rotating cubing tips
    #[clap(long)]
    no_tips: bool,

    /// disable the hold-space-to-start gesture even if the terminal supports it
    #[clap(long)]
    no_hold: bool,

    /// write the effective settings to the config file before starting
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay command line flags on the persisted configuration
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(tick_ms) = self.tick_ms {
            cfg.tick_ms = tick_ms;
        }
        if let Some(rows) = self.history_rows {
            cfg.history_rows = rows;
        }
        if let Some(storage) = self.storage {
            cfg.storage = storage;
        }
        if self.no_tips {
            cfg.show_tips = false;
        }
        cfg
    }
}

pub type Controller = SessionController<Box<dyn KvStore>, SystemClock, ScreenModel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    Delete(SolveId),
    Clear,
}

/// Destructive action waiting on a y/n answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    pub kind: PendingKind,
    pub prompt: String,
}

pub struct App {
    pub controller: Controller,
    pub bindings: KeyBindings,
    pub selected: usize,
    pub pending: Option<Pending>,
}

impl App {
    pub fn with_store(kv: Box<dyn KvStore>, cfg: &Config, hold_mode: bool) -> Self {
        let controller = SessionController::new(
            SolveStore::load(kv),
            SystemClock,
            ScreenModel::default(),
            SessionOptions::from(cfg),
        );
        Self {
            controller,
            bindings: KeyBindings::new(hold_mode),
            selected: 0,
            pending: None,
        }
    }

    fn history_len(&self) -> usize {
        self.controller.sink().history.len()
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.history_len().saturating_sub(1));
    }

    /// Apply one action. Returns true when the app should exit.
    pub fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Primary => self.controller.primary_action(),
            Action::Press => self.controller.press(),
            Action::Release => self.controller.release(),
            Action::Save => {
                if self.controller.save().is_some() {
                    self.selected = 0;
                }
            }
            Action::Reset => self.controller.reset(),
            Action::NewScramble => self.controller.new_scramble(),
            Action::SelectUp => self.selected = self.selected.saturating_sub(1),
            Action::SelectDown => {
                self.selected += 1;
                self.clamp_selection();
            }
            Action::Delete => {
                let id = self.controller.sink().history.get(self.selected).map(|r| r.id);
                if let Some(id) = id {
                    self.pending = self.controller.delete_prompt(id).map(|prompt| Pending {
                        kind: PendingKind::Delete(id),
                        prompt,
                    });
                }
            }
            Action::ClearHistory => {
                self.pending = self.controller.clear_prompt().map(|prompt| Pending {
                    kind: PendingKind::Clear,
                    prompt,
                });
            }
            Action::Answer(answer) => {
                if let Some(pending) = self.pending.take() {
                    match pending.kind {
                        PendingKind::Delete(id) => {
                            self.controller.delete(id, &mut |_: &str| answer);
                        }
                        PendingKind::Clear => {
                            self.controller.clear_history(&mut |_: &str| answer);
                        }
                    }
                    self.clamp_selection();
                }
            }
        }
        false
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter =
        EnvFilter::try_from_env("CUBETIME_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let config_store = FileConfigStore::new();
    let cfg = cli.apply(config_store.load());
    if let Err(e) = cfg.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, e).exit();
    }
    if cli.save_config {
        config_store.save(&cfg)?;
        tracing::info!(path = %config_store.path().display(), "config saved");
    }

    let kv = cfg.open_store(cli.data_file.as_deref())?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let hold_mode = !cli.no_hold && supports_keyboard_enhancement().unwrap_or(false);
    if hold_mode {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    tracing::info!(hold_mode, tick_ms = cfg.tick_ms, "starting session");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_store(kv, &cfg, hold_mode);
    let result = start_tui(&mut terminal, &mut app);

    if hold_mode {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        StopwatchTicker::new(app.controller.options().tick_period),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step(app.controller.timer().is_running()) {
            TimerEvent::Tick => {
                if app.controller.tick().is_some() {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            TimerEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            TimerEvent::Key(key) => {
                let Some(action) = app.bindings.map(key, app.pending.is_some()) else {
                    continue;
                };
                if app.handle_action(action) {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
