/// Twisty Terminal - shared puzzle client
///
/// Mirrors the puzzle held by the engine and sends turns typed at the keyboard.
/// Controls:
///   - Letters: quarter turn, Shift for the inverse
///   - 1/2/3 then Alt+letter: turn by the selected modifier
///   - Arrow keys: orbit the camera
///   - Esc / Ctrl+C: quit

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use twisty_core::{puzzle::DEFAULT_SCRAMBLE, ClientConfig, PuzzleModel};
use twisty_sync::{HttpEngine, LocalEngine, PuzzleEngine, SyncClient};
use twisty_terminal::TerminalApp;

#[derive(Parser)]
#[command(name = "twisty-terminal")]
#[command(about = "Shared twisty-puzzle client for the terminal")]
#[command(version)]
struct Cli {
    /// TOML config file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Puzzle engine base URL
    #[arg(short, long)]
    server: Option<String>,

    /// User name sent with every request
    #[arg(short, long)]
    user: Option<String>,

    /// Play against an in-process engine instead of a server
    #[arg(long)]
    offline: bool,

    /// Log destination; the screen is taken by the puzzle
    #[arg(long, default_value = "twisty-terminal.log")]
    log_file: PathBuf,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ClientConfig::default(),
        };
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(user) = &self.user {
            config.user = user.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,twisty_core=debug")),
        )
        .init();
    Ok(())
}

async fn run_client<E: PuzzleEngine>(config: &ClientConfig, engine: E) -> Result<()> {
    let client = SyncClient::start(config, engine)?;

    let session = Arc::clone(&client.session);
    let submitter = client.submitter.clone();
    let runtime = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || {
        let mut app = TerminalApp::new(session, submitter, runtime)?;
        app.run()
    })
    .await??;

    client.handle.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;
    let config = cli.client_config()?;

    if cli.offline {
        info!(user = %config.user, "starting offline");
        let model = PuzzleModel::scrambled(config.puzzle_order, DEFAULT_SCRAMBLE)?;
        run_client(&config, LocalEngine::new(model)).await
    } else {
        info!(server = %config.server_url, user = %config.user, "connecting");
        let engine = HttpEngine::new(&config.server_url, config.request_timeout())?;
        run_client(&config, engine).await
    }
}
