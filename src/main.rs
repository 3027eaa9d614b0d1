use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use coderelay::config::ServiceConfig;
use coderelay::lint::Linter;
use coderelay::llm::LlmPool;
use coderelay::server::{self, AppState};

#[derive(Parser)]
#[command(name = "coderelay", about = "Editor backend: suggestions, bug detection, bug fixing.")]
struct Cli {
    /// Config file (defaults to .coderelay/config.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind host (overrides config and CODERELAY_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config and CODERELAY_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coderelay=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServiceConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    let llm = LlmPool::from_config(&config.llm)?;
    info!("model: {:?} / {}", llm.provider(), llm.model());

    let linter = Linter::from_config(&config.lint);
    info!("lint backends: {:?}", linter.languages());

    let state = AppState::new(Arc::new(llm), linter);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("CodeRelay listening on http://{addr}");

    server::serve(listener, state).await?;
    Ok(())
}
