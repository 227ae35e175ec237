//! Pariksha daemon
//!
//! Loads the configuration, starts the surface detection service with
//! simulated stages and serves until Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};

use pariksha::{
    Action, ParikshaConfig, ParikshaError, Result, SurfaceDetectionRequest, SurfaceService,
};

#[derive(Parser, Debug)]
#[command(name = "pariksha")]
#[command(about = "Inspection pipeline controller")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "pariksha.toml")]
    config: PathBuf,

    /// Republish the region cloud periodically
    #[arg(long)]
    publish_cloud: bool,

    /// Run one scan with default parameters after startup
    #[arg(long)]
    scan_on_start: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pariksha=info")),
        )
        .init();

    let args = Args::parse();

    info!("Pariksha v{}", env!("CARGO_PKG_VERSION"));
    info!("Loading configuration from {:?}", args.config);
    let mut config = ParikshaConfig::load(&args.config)?;
    if args.publish_cloud {
        config.service.publish_region_point_cloud = true;
    }

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            info!("Received shutdown signal");
            running.store(false, Ordering::SeqCst);
        })
        .map_err(|e| ParikshaError::Config(format!("Failed to set signal handler: {}", e)))?;
    }

    let service = SurfaceService::simulated(&config)?;
    info!("Serving with {} dispatch workers", service.worker_count());

    if args.scan_on_start {
        let request = SurfaceDetectionRequest::with_defaults(Action::ScanFindAndReturn);
        match service.client().detect(request) {
            Ok(resp) if resp.surfaces_found => {
                info!("Initial scan found {} surfaces", resp.surfaces.len())
            }
            Ok(_) => warn!("Initial scan found no surfaces"),
            Err(e) => error!("Initial scan failed: {}", e),
        }
    }

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(200));
    }

    service.shutdown();
    info!("Pariksha finished");
    Ok(())
}
