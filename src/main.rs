use clap::Parser;
use hometown::{
    Registry,
    config::Config,
    db::{
        Db,
        repo::{AccountRepo, AccountRepository, MemoryAccountRepository},
    },
    net::http,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "hometown", about = "Hometown game server")]
struct Args {
    /// Read configuration from this TOML file instead of the environment
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep accounts in memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let _ = dotenvy::from_filename(".env");
    let cfg = Arc::new(match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    });
    tracing::debug!(config = ?cfg, "configuration loaded");

    let accounts: Arc<dyn AccountRepo> = if args.memory {
        tracing::warn!("using in-memory account store; accounts are lost on exit");
        Arc::new(MemoryAccountRepository::new())
    } else {
        let db = Arc::new(Db::new(&cfg.database_url, cfg.db_pool_size, cfg.db_timeout())?);
        db.init().await?;
        Arc::new(AccountRepository::new(db))
    };

    let registry = Arc::new(Registry::new(accounts, cfg.clone())?);

    let addr: SocketAddr = cfg.http_addr.parse()?;
    tracing::info!(%addr, static_dir = %cfg.static_dir.display(), "Hometown server listening");
    if let Err(e) = http::serve(addr, registry).await {
        tracing::error!(error = %e, "HTTP server error");
        return Err(e.into());
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, prelude::*};

    if let Err(e) = color_eyre::install() {
        eprintln!("cannot install error report hooks: {e}");
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hometown=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::uptime()),
        )
        .with(tracing_error::ErrorLayer::default())
        .init();
}
