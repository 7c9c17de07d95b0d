//! rdview entry point.
//!
//! ```text
//! rdview                      Connect using rdview.toml and RDVIEW_* variables
//! rdview --config <path>      Use custom config TOML
//! rdview --host <host>        Override the remote host
//! rdview --gen-config         Dump default config and exit
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rdview_core::{DESKTOP_HEIGHT, DESKTOP_WIDTH, Dispatcher, SessionConnector, SessionLink};
use rdview_gui::config::ViewerConfig;
use rdview_gui::loopback::LoopbackConnector;
use rdview_gui::window::NativeWindow;

const WINDOW_TITLE: &str = "rdview";

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rdview", about = "Remote desktop viewer")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "rdview.toml")]
    config: PathBuf,

    /// Remote host (overrides config and RDVIEW_HOST).
    #[arg(long)]
    host: Option<String>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        println!("{}", ViewerConfig::default().to_toml()?);
        return Ok(());
    }

    // Logging depends on the config, so load first and report after.
    let loaded = ViewerConfig::load(&cli.config);
    let mut config = match &loaded {
        Ok(Some(cfg)) => cfg.clone(),
        Ok(None) | Err(_) => ViewerConfig::default(),
    };
    let from_env = config.apply_env();
    if let Some(host) = cli.host {
        config.session.host = host;
    }

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("rdview v{}", env!("CARGO_PKG_VERSION"));

    match loaded {
        Ok(Some(_)) => info!("loaded config from {}", cli.config.display()),
        Ok(None) => info!("no config at {}; using defaults", cli.config.display()),
        Err(e) => {
            error!("{e}");
            return Err(e.into());
        }
    }
    from_env.inspect_err(|e| error!("{e}"))?;

    if let Err(e) = config.validate() {
        error!("{e}");
        return Err(e.into());
    }

    // ── 1. Create the window ────────────────────────────────────

    let window = NativeWindow::create(WINDOW_TITLE, DESKTOP_WIDTH, DESKTOP_HEIGHT)
        .inspect_err(|e| error!("could not open window: {e}"))?;

    // ── 2. Log in ───────────────────────────────────────────────

    let (link, handlers) = SessionLink::new();
    let target = config.target(DESKTOP_WIDTH, DESKTOP_HEIGHT);
    info!(address = %target.address, "connecting");
    let session = LoopbackConnector::default()
        .login(&target, &config.credentials(), handlers)
        .inspect_err(|e| error!("login failed: {e}"))?;

    // ── 3. Display loop ─────────────────────────────────────────

    let mut dispatcher = Dispatcher::new(window, session, link, config.input_policy())?;
    dispatcher.run().await;

    // ── 4. Shutdown ─────────────────────────────────────────────

    dispatcher.shutdown()?;
    info!("bye");
    Ok(())
}
