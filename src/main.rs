pub mod ui;

use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use letterwheel::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    controller::GameController,
    layout::letter_index,
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner, WheelEvent},
    validator::Field,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use tracing::{info, warn};

use crate::ui::{audio::TerminalAudio, board::Board};

const MAX_FIELD_LEN: usize = 5;

/// letter wheel party game with a randomized countdown
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Reveal a wheel of letters while a hidden countdown runs. The countdown is drawn at random between the minimum and maximum time; when it runs out the alarm rings."
)]
pub struct Cli {
    /// shortest possible countdown, MM:SS between 00:30 and 04:00
    #[clap(short = 'm', long)]
    min: Option<String>,

    /// longest possible countdown, MM:SS between 00:30 and 04:00
    #[clap(short = 'M', long)]
    max: Option<String>,

    /// seed the countdown draw for a reproducible game
    #[clap(long)]
    seed: Option<u64>,

    /// config file to read instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> Config {
        let store = match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        };
        store
            .load()
            .with_overrides(self.min.clone(), self.max.clone())
    }
}

pub type WheelController = GameController<Board, TerminalAudio, StdRng>;

/// Composition root: one controller per process plus the editing state of
/// the two time fields.
pub struct App {
    pub controller: WheelController,
    pub focus: Field,
    min_input: String,
    max_input: String,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>, audio: TerminalAudio) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut controller = GameController::new(
            Board::default(),
            audio,
            rng,
            config.time_range(),
            config.layout(),
        );
        controller.initialize();

        Self {
            controller,
            focus: Field::Min,
            min_input: config.min_time,
            max_input: config.max_time,
        }
    }

    pub fn input(&self, field: Field) -> &str {
        match field {
            Field::Min => &self.min_input,
            Field::Max => &self.max_input,
        }
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        let field = self.focus;
        let text = match field {
            Field::Min => &mut self.min_input,
            Field::Max => &mut self.max_input,
        };
        edit(text);
        let text = text.clone();
        self.controller.set_field_text(field, &text);
    }

    fn toggle_game(&mut self, now: Instant) {
        if self.controller.is_running() {
            self.controller.request_stop(false, now);
        } else if let Err(e) = self.controller.request_start(now) {
            info!(error = %e, "game not started");
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.controller.poll(now);
    }

    /// Handles one key press. Returns false when the player wants to quit.
    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return false;
        }

        // modals swallow everything but their own dismissal
        if self.controller.presentation().notice_open {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.controller.acknowledge_notice();
            }
            return true;
        }
        if self.controller.presentation().error.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.controller.presentation_mut().dismiss_error();
            }
            return true;
        }

        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Enter => self.toggle_game(now),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Field::Min => Field::Max,
                    Field::Max => Field::Min,
                };
            }
            KeyCode::Backspace => self.edit_focused(|text| {
                text.pop();
            }),
            KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => {
                self.edit_focused(|text| {
                    if text.len() < MAX_FIELD_LEN {
                        text.push(c);
                    }
                });
            }
            KeyCode::Char(c) => {
                if let Some(index) = letter_index(c) {
                    self.controller.handle_element_activation(index);
                }
            }
            _ => {}
        }
        true
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // logging is best effort; the game runs without a log file
    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init_file_logging(&path) {
            eprintln!("letterwheel: logging disabled, {}: {e}", path.display());
        }
    }

    let config = cli.load_config();
    info!(min = %config.min_time, max = %config.max_time, "letterwheel starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, cli.seed, TerminalAudio::stdout());
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            WheelEvent::Tick | WheelEvent::Resize => {}
            WheelEvent::Closed => {
                warn!("terminal input closed");
                break;
            }
            WheelEvent::Key(key) => {
                if !app.on_key(key, Instant::now()) {
                    break;
                }
            }
        }
        // polling is time based, so doing it after every event never double ticks
        app.on_tick(Instant::now());
        terminal.draw(|f| ui(app, f))?;
    }

    info!(alarms = app.controller.audio().alarms_rung(), "letterwheel exiting");
    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}

#[cfg(test)]
pub(crate) fn test_app(min: &str, max: &str) -> App {
    let config = Config {
        min_time: min.to_string(),
        max_time: max.to_string(),
        ..Config::default()
    };
    App::new(config, Some(42), TerminalAudio::silent())
}
