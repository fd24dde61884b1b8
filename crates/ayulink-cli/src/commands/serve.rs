//! Serve command - run the HTTP upload service.

use clap::Args;
use tracing::info;

use ayulink_core::{DocumentProcessor, ResultStore};
use ayulink_server::AppState;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (default from config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (default from config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Use the mock OCR engine instead of tesseract
    #[arg(long)]
    mock: bool,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    super::process::apply_mock(&mut config, args.mock);

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let processor = DocumentProcessor::from_config(&config);
    info!("OCR engine: {}", processor.engine().name());

    let store = ResultStore::open(&config.storage)?;
    let state = AppState::new(processor, store);

    ayulink_server::serve(state, &config.server).await?;

    Ok(())
}
