//! Demo engine for the RimIO exporter.
//!
//! Stands in for the host game: runs a paced tick loop over a seed
//! colony and hands every tick to the cadence dispatcher, exactly the way
//! the real host integration would from its tick callback. Useful for
//! watching the exporter talk to a companion app without a game attached.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `rimio.yaml` (defaults if absent)
//! 3. Seed the demo colony and its region registry
//! 4. Construct the HTTP delivery and the dispatcher
//! 5. Acquire the render capability on this thread
//! 6. Run the tick loop

mod colony;
mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rimio_export::{Dispatcher, ExporterConfig, HttpDelivery};
use rimio_host::{RenderHandle, WorldSource};
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Milliseconds of wall time per simulated tick, approximating the
/// host's normal speed.
const TICK_MS: u64 = 16;

/// How many ticks the demo runs before stopping.
const DEMO_TICKS: u64 = 3600;

/// Application entry point for the demo engine.
///
/// # Errors
///
/// Returns an error if configuration loading or exporter setup fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("rimio-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        destination = %config.data_url(),
        cadence_ticks = config.cadence_ticks,
        enabled = config.enabled,
        "Configuration loaded"
    );

    // 3. Seed the demo colony.
    let (world, registry) = colony::seed_colony();
    info!(
        regions = registry.len(),
        colonists = world.colonists_in_order().len(),
        "Seed colony created"
    );

    // 4. Construct delivery and dispatcher.
    let delivery = HttpDelivery::new(&config)?;
    let dispatcher = Dispatcher::new(
        config,
        Arc::clone(&world) as Arc<dyn WorldSource>,
        registry,
        delivery,
        Handle::current(),
    );

    // 5. The main thread plays the render-capable simulation thread.
    let render = RenderHandle::acquire();

    // 6. Tick loop. The dispatcher decides which ticks are cadence
    // boundaries; this loop just keeps time.
    info!(ticks = DEMO_TICKS, tick_ms = TICK_MS, "Tick loop starting");
    for tick in 1..=DEMO_TICKS {
        world.set_tick(tick);
        dispatcher.on_tick(tick, &render);
        tokio::time::sleep(Duration::from_millis(TICK_MS)).await;
    }

    info!(
        cycles = dispatcher.cycles_started(),
        skipped = dispatcher.cycles_skipped(),
        "Demo run complete"
    );
    Ok(())
}

fn load_config() -> Result<ExporterConfig, EngineError> {
    let path = Path::new("rimio.yaml");
    if path.exists() {
        Ok(ExporterConfig::from_file(path)?)
    } else {
        info!("rimio.yaml not found, using defaults");
        let mut config = ExporterConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}
