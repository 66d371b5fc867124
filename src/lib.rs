//! Shelfie application library
//!
//! Project modules plus the bootstrap sequence shared by the server binary.

pub mod modules;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use shelfie_db::{CosmosClient, Db};
use shelfie_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use shelfie_telemetry::LoggerOptions;

/// Command-line flags of the server binary.
#[derive(Debug, Clone, Default, clap::Parser)]
#[command(name = "shelfie", about = "Shelfie API server")]
pub struct ServerArgs {
    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Also append logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Bring up logging, configuration, the database client, and modules, then
/// serve HTTP until the server stops.
pub async fn run(args: ServerArgs) -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load Shelfie settings")?;

    shelfie_telemetry::init(&LoggerOptions::from_flags(
        args.debug,
        args.log_file,
        &settings.telemetry,
    ))?;

    tracing::info!(env = settings.environment.as_str(), "shelfie bootstrap starting");

    let client = CosmosClient::new(settings.current_database())
        .context("failed to create database client")?;
    tracing::info!(endpoint = client.endpoint(), "database client ready");
    let db: Arc<dyn Db> = Arc::new(client);

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = shelfie_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    served
}
