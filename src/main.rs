use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ponchie::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    prompt::{RandomSource, RngSource, Vocabulary},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    surface::ResizePolicy,
    App,
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
    time::{Duration, Instant},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TICK_RATE_MS: u64 = 100;
const LOG_ENV: &str = "PONCHIE_LOG";

/// timed sketching practice in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Sketching practice in the terminal: draw a randomly generated Japanese prompt with the mouse against the clock, then review your sketch next to the prompt."
)]
pub struct Cli {
    /// seconds per training round
    #[clap(short = 't', long)]
    training_secs: Option<u32>,

    /// seconds per free drawing round
    #[clap(short = 'f', long)]
    free_secs: Option<u32>,

    /// what happens to the sketch when the terminal is resized
    #[clap(short = 'r', long, value_enum)]
    resize_policy: Option<ResizeArg>,

    /// raster pixels per display pixel (1-8)
    #[clap(long)]
    raster_scale: Option<u32>,

    /// built-in vocabulary to draw prompts from
    #[clap(short = 'v', long, default_value = "dojo")]
    vocabulary: String,

    /// seed the prompt generator for a reproducible sequence
    #[clap(long)]
    seed: Option<u64>,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum ResizeArg {
    /// keep the drawing at the top left, crop or pad
    Anchor,
    /// stretch the drawing to the new size
    Scale,
}

impl From<ResizeArg> for ResizePolicy {
    fn from(arg: ResizeArg) -> Self {
        match arg {
            ResizeArg::Anchor => ResizePolicy::Anchor,
            ResizeArg::Scale => ResizePolicy::Scale,
        }
    }
}

impl Cli {
    /// Flags given on the command line win over stored settings
    fn apply(&self, config: &mut Config) {
        if let Some(secs) = self.training_secs {
            config.training_secs = secs;
        }
        if let Some(secs) = self.free_secs {
            config.free_secs = secs;
        }
        if let Some(policy) = self.resize_policy {
            config.resize_policy = policy.into();
        }
        if let Some(scale) = self.raster_scale {
            config.raster_scale = scale;
        }
    }

    fn random_source(&self) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => Box::new(RngSource::seeded(seed)),
            None => Box::new(RngSource::from_entropy()),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply(&mut config);
    if let Err(e) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }
    if cli.save_config {
        store.save(&config)?;
        tracing::info!(path = %store.path().display(), "settings saved");
    }

    let vocabulary = Vocabulary::load(&cli.vocabulary)?;
    let export_dir = AppDirs::export_dir().unwrap_or_else(|| PathBuf::from("."));
    let size = crossterm::terminal::size()?;
    let mut app = App::new(&config, vocabulary, cli.random_source(), size, export_dir)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Log to a file in the state dir; the terminal belongs to the UI.
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let mut last = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| ui(app, f))?;

        let event = runner.step();
        let now = Instant::now();
        app.handle(event, now.duration_since(last));
        last = now;
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
