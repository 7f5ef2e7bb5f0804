//! svcdbg - terminal client for inspecting and invoking RPC methods through a gateway
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use svcdbg_app::config::{default_config_dir, init_config_dir, load_settings, save_settings};
use svcdbg_app::history::QueryStore;
use svcdbg_app::{AppState, Engine, Message};
use svcdbg_core::logging;
use svcdbg_gateway::GatewayClient;

/// svcdbg - inspect and invoke RPC methods through a gateway
#[derive(Parser, Debug)]
#[command(name = "svcdbg")]
#[command(about = "Inspect and invoke RPC methods through a gateway", long_about = None)]
struct Args {
    /// Module to open in a tab at startup
    #[arg(value_name = "MODULE")]
    module: Option<String>,

    /// Gateway base URL (overrides config.toml)
    #[arg(long, value_name = "URL")]
    gateway: Option<String>,

    /// Directory holding config.toml
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Write the --gateway URL back to config.toml
    #[arg(long, requires = "gateway")]
    save: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    logging::init()?;

    let config_dir = args.config_dir.unwrap_or_else(default_config_dir);
    if let Err(e) = init_config_dir(&config_dir) {
        warn!("Could not create default config: {}", e);
    }

    let mut settings = load_settings(&config_dir);
    if let Some(url) = args.gateway {
        settings.gateway.base_url = url;
        if args.save {
            save_settings(&config_dir, &settings)?;
            info!("Saved gateway {} to {:?}", settings.gateway.base_url, config_dir);
        }
    }
    info!("Using gateway {}", settings.gateway.base_url);

    let client = GatewayClient::new(settings.gateway.to_gateway_config())?;

    let data_dir = logging::data_directory();
    let history = QueryStore::history(&data_dir, settings.history.limit);
    let saved = QueryStore::saved(&data_dir);
    let state = AppState::with_settings(settings, history, saved);

    let mut engine = Engine::new(state, Arc::new(client));
    if let Some(module) = args.module {
        engine.process_message(Message::OpenModule { module });
    }

    svcdbg_tui::run(engine).await?;
    Ok(())
}
