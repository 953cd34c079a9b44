use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parley_core::config::ensure_cache_dir;
use parley_core::{build_backend, AgentRoster, ChatController, ChatSession, ParleyConfig};
use parley_tui::app::App;
use parley_tui::event::EventReader;
use parley_tui::theme::ThemeMode;

#[derive(Parser, Debug)]
#[command(name = "parley", version, about = "Chat with a team of agents from the terminal")]
struct Args {
    /// Chat backend base URL. Without one, replies are simulated locally.
    #[arg(long, env = "PARLEY_API_BASE_URL")]
    base_url: Option<String>,

    /// Ignore any configured backend and use the local simulator.
    #[arg(long)]
    offline: bool,

    /// Starting theme: dark or light.
    #[arg(long)]
    theme: Option<String>,

    /// Read configuration from this file instead of the default locations.
    #[arg(long, short)]
    config: Option<PathBuf>,
}

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    if let Some(path) = setup_logging(&config) {
        info!(log = %path.display(), "logging to file");
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config))
}

fn load_config(args: &Args) -> Result<ParleyConfig> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                bail!("config file not found: {}", path.display());
            }
            ParleyConfig::load_from_paths(vec![path.clone()])
        }
        None => ParleyConfig::load(),
    }
    .context("failed to load configuration")?;

    if let Some(url) = &args.base_url {
        config.backend.base_url = Some(url.clone());
    }
    if args.offline {
        config.backend.base_url = None;
    }
    if let Some(theme) = &args.theme {
        config.tui.theme = theme.to_lowercase();
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Logs go to a file so they never draw over the interface.
fn setup_logging(config: &ParleyConfig) -> Option<PathBuf> {
    let path = ensure_cache_dir().ok()?.join("parley.log");
    let file = File::create(&path).ok()?;

    let level = config.log_level();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("parley={level},parley_core={level},parley_tui={level}"))
    });

    let writer = Mutex::new(file);
    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .init();
    }

    Some(path)
}

async fn run(config: ParleyConfig) -> Result<()> {
    let backend = build_backend(&config).context("failed to build chat backend")?;
    let session = ChatSession::new(
        ChatController::new(AgentRoster::default()),
        Arc::clone(&backend),
        config.status_reset_delay(),
    );

    let poller = match (config.base_url(), config.status_poll_interval()) {
        (Some(_), Some(every)) => Some(session.spawn_status_polling(every)),
        _ => None,
    };

    let theme_mode = ThemeMode::from_name(&config.tui.theme).unwrap_or_default();
    let mut app = App::new(session, theme_mode);
    let mut events = EventReader::new(config.tick_rate());

    let (mut terminal, enhanced_keys) = setup_terminal()?;
    let result = app.run(&mut terminal, &mut events).await;
    restore_terminal(&mut terminal, enhanced_keys)?;

    if let Some(poller) = poller {
        poller.abort();
    }

    if let Err(e) = &result {
        warn!(error = %e, "chat loop ended with an error");
        eprintln!("Application error: {e}");
    }
    info!("shutdown complete");
    result
}

/// Returns the terminal and whether keyboard enhancement was pushed, which is
/// what lets Shift+Enter arrive as a distinct key.
fn setup_terminal() -> Result<(Tui, bool)> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced_keys {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok((terminal, enhanced_keys))
}

fn restore_terminal(terminal: &mut Tui, enhanced_keys: bool) -> Result<()> {
    if enhanced_keys {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}
