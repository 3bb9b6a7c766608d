//! Cadence dispatcher: fires the export pipeline off the simulation tick.
//!
//! The dispatcher is a two-state machine. It sits **Idle** until the tick
//! counter crosses a cadence boundary, then enters **Dispatching**: the
//! portrait capture pass runs synchronously on the calling (simulation)
//! thread, the build-serialize-send cycle is spawned onto the runtime,
//! and the dispatcher is immediately Idle again -- the simulation thread
//! never waits on network I/O, so the time [`Dispatcher::on_tick`] takes
//! is bounded by capture cost alone.
//!
//! Cadence is counted in game ticks, independent of wall-clock time and
//! of the simulation speed multiplier. An in-flight latch bounds
//! concurrency to one cycle: if a send is still running when the next
//! boundary arrives, that boundary is skipped (with a debug event) rather
//! than stacking a second concurrent read of live state. A skipped
//! boundary loses that boundary's data, the same as a failed send would.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use rimio_host::{RegionRegistry, RenderHandle, WorldSource};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::builder::build_snapshot;
use crate::config::ExporterConfig;
use crate::portrait::{self, PortraitCache};
use crate::transport::Delivery;
use crate::wire::to_xml;

/// User-facing remediation hint emitted after every delivery failure.
const REMEDIATION_HINT: &str =
    "fix or disable the exporter in settings, or start the RimIO companion app";

/// Drives one export cycle per cadence boundary without blocking the
/// simulation thread.
pub struct Dispatcher<D: Delivery> {
    config: ExporterConfig,
    world: Arc<dyn WorldSource>,
    regions: Arc<RegionRegistry>,
    cache: Arc<PortraitCache>,
    delivery: Arc<D>,
    runtime: Handle,
    in_flight: Arc<AtomicBool>,
    cycles_started: AtomicU64,
    cycles_skipped: AtomicU64,
}

impl<D: Delivery> Dispatcher<D> {
    /// Create a dispatcher over the given world, region registry, and
    /// delivery. `runtime` is the handle background cycles are spawned
    /// onto.
    pub fn new(
        config: ExporterConfig,
        world: Arc<dyn WorldSource>,
        regions: Arc<RegionRegistry>,
        delivery: D,
        runtime: Handle,
    ) -> Self {
        Self {
            config,
            world,
            regions,
            cache: Arc::new(PortraitCache::new()),
            delivery: Arc::new(delivery),
            runtime,
            in_flight: Arc::new(AtomicBool::new(false)),
            cycles_started: AtomicU64::new(0),
            cycles_skipped: AtomicU64::new(0),
        }
    }

    /// The portrait cache this dispatcher captures into.
    pub fn portrait_cache(&self) -> Arc<PortraitCache> {
        Arc::clone(&self.cache)
    }

    /// Number of export cycles started so far.
    pub fn cycles_started(&self) -> u64 {
        self.cycles_started.load(Ordering::SeqCst)
    }

    /// Number of cadence boundaries skipped because a cycle was in flight.
    pub fn cycles_skipped(&self) -> u64 {
        self.cycles_skipped.load(Ordering::SeqCst)
    }

    /// Tick callback, invoked by the host once per simulation tick on the
    /// simulation thread.
    ///
    /// Returns quickly on non-boundary ticks. On a boundary tick it runs
    /// the synchronous capture pass (hence the [`RenderHandle`]: the
    /// simulation thread is the render-capable thread) and spawns the
    /// background half of the cycle.
    pub fn on_tick(&self, tick: u64, render: &RenderHandle) {
        if !self.config.enabled {
            return;
        }

        // cadence_ticks is clamped to 1, so the modulo cannot fault.
        // Boundaries land on tick % cadence == 1, matching one second of
        // game time after each whole cadence period at the default 60.
        let cadence = self.config.cadence_ticks.max(1);
        #[allow(clippy::arithmetic_side_effects)]
        let on_boundary = tick % cadence == 1 % cadence;
        if !on_boundary {
            return;
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.cycles_skipped.fetch_add(1, Ordering::SeqCst);
            debug!(tick, "previous export cycle still in flight, skipping boundary");
            return;
        }
        let guard = InFlightGuard {
            flag: Arc::clone(&self.in_flight),
        };

        let stats = portrait::capture_pass(self.world.as_ref(), &self.cache, render);
        if self.config.debug {
            debug!(
                tick,
                captured = stats.captured,
                elapsed_ms = stats.elapsed_ms,
                "portrait capture pass complete"
            );
        }

        self.cycles_started.fetch_add(1, Ordering::SeqCst);
        let world = Arc::clone(&self.world);
        let regions = Arc::clone(&self.regions);
        let cache = Arc::clone(&self.cache);
        let delivery = Arc::clone(&self.delivery);
        let config = self.config.clone();
        self.runtime.spawn(async move {
            run_cycle(tick, &*world, &regions, &cache, &*delivery, &config).await;
            drop(guard);
        });
    }
}

impl<D: Delivery> core::fmt::Debug for Dispatcher<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("enabled", &self.config.enabled)
            .field("cadence_ticks", &self.config.cadence_ticks)
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Clears the in-flight latch when the cycle ends, on every path.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// The background half of one export cycle: build, serialize, send.
///
/// Runs entirely off the simulation thread. Every failure terminates at
/// this function as log output; nothing propagates upward.
async fn run_cycle<D: Delivery>(
    tick: u64,
    world: &dyn WorldSource,
    regions: &RegionRegistry,
    cache: &PortraitCache,
    delivery: &D,
    config: &ExporterConfig,
) {
    let started = Instant::now();

    let snapshot = build_snapshot(world, &regions.loaded(), cache, config);
    let payload = match to_xml(&snapshot) {
        Ok(payload) => payload,
        Err(error) => {
            warn!(tick, %error, "snapshot serialization failed, dropping cycle");
            return;
        }
    };
    let bytes = payload.len();

    match delivery.send(payload).await {
        Ok(()) => {
            if config.debug {
                debug!(
                    tick,
                    bytes,
                    elapsed_ms = started.elapsed().as_millis(),
                    "snapshot built and sent"
                );
            }
        }
        Err(error) => {
            warn!(destination = %config.base_url(), %error, "snapshot delivery failed");
            warn!("{}", REMEDIATION_HINT);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicU64;
    use std::time::Duration;

    use rimio_host::stub::{StubActor, StubRegion, StubWorld};
    use rimio_types::RegionId;

    use super::*;
    use crate::error::ExportError;

    /// Delivery that counts sends and optionally dawdles.
    #[derive(Clone)]
    struct SpyDelivery {
        sent: Arc<AtomicU64>,
        delay: Duration,
    }

    impl SpyDelivery {
        fn instant() -> Self {
            Self {
                sent: Arc::new(AtomicU64::new(0)),
                delay: Duration::ZERO,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                sent: Arc::new(AtomicU64::new(0)),
                delay,
            }
        }

        fn sent(&self) -> u64 {
            self.sent.load(Ordering::SeqCst)
        }
    }

    impl Delivery for SpyDelivery {
        async fn send(&self, _payload: Vec<u8>) -> Result<(), ExportError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn small_world() -> (Arc<StubWorld>, Arc<RegionRegistry>) {
        let world = Arc::new(StubWorld::new("seed"));
        world.add_colonist(Arc::new(StubActor::new("Human1", "Tari")));
        let registry = Arc::new(RegionRegistry::new());
        registry.insert(Arc::new(StubRegion::new(RegionId::new(1), "Home")));
        (world, registry)
    }

    fn dispatcher_with(
        config: ExporterConfig,
        delivery: SpyDelivery,
    ) -> Dispatcher<SpyDelivery> {
        let (world, registry) = small_world();
        Dispatcher::new(config, world, registry, delivery, Handle::current())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fires_once_per_cadence_period() {
        let config = ExporterConfig {
            cadence_ticks: 60,
            ..ExporterConfig::default()
        };
        let dispatcher = dispatcher_with(config, SpyDelivery::instant());
        let render = RenderHandle::acquire();

        for tick in 1..=180 {
            dispatcher.on_tick(tick, &render);
            // Let each short cycle drain so the latch never bites here.
            tokio::task::yield_now().await;
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        // Boundaries at ticks 1, 61, 121.
        assert_eq!(dispatcher.cycles_started(), 3);
        assert_eq!(dispatcher.cycles_skipped(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn disabled_dispatcher_never_fires() {
        let config = ExporterConfig {
            enabled: false,
            ..ExporterConfig::default()
        };
        let dispatcher = dispatcher_with(config, SpyDelivery::instant());
        let render = RenderHandle::acquire();

        for tick in 1..=300 {
            dispatcher.on_tick(tick, &render);
        }
        assert_eq!(dispatcher.cycles_started(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn on_tick_latency_is_independent_of_network_latency() {
        let config = ExporterConfig::default();
        let dispatcher = dispatcher_with(config, SpyDelivery::slow(Duration::from_secs(10)));
        let render = RenderHandle::acquire();

        let started = Instant::now();
        dispatcher.on_tick(1, &render);
        // Bounded by capture cost, not by the 10s the send will take.
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(dispatcher.cycles_started(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn overlapping_boundary_is_skipped_not_stacked() {
        let config = ExporterConfig {
            cadence_ticks: 60,
            ..ExporterConfig::default()
        };
        let delivery = SpyDelivery::slow(Duration::from_millis(500));
        let dispatcher = dispatcher_with(config, delivery.clone());
        let render = RenderHandle::acquire();

        dispatcher.on_tick(1, &render);
        // Next boundary arrives while the first send still sleeps.
        dispatcher.on_tick(61, &render);

        assert_eq!(dispatcher.cycles_started(), 1);
        assert_eq!(dispatcher.cycles_skipped(), 1);

        // Once the cycle drains, the latch reopens.
        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(delivery.sent(), 1);
        dispatcher.on_tick(121, &render);
        assert_eq!(dispatcher.cycles_started(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn capture_pass_runs_on_the_calling_thread() {
        let config = ExporterConfig::default();
        let dispatcher = dispatcher_with(config, SpyDelivery::instant());
        let render = RenderHandle::acquire();

        dispatcher.on_tick(1, &render);
        // The cache was populated before on_tick returned, i.e. by the
        // synchronous phase, not by the spawned task.
        assert_eq!(dispatcher.portrait_cache().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cadence_of_one_fires_every_tick() {
        let config = ExporterConfig {
            cadence_ticks: 1,
            ..ExporterConfig::default()
        };
        let dispatcher = dispatcher_with(config, SpyDelivery::instant());
        let render = RenderHandle::acquire();

        for tick in 1..=5 {
            dispatcher.on_tick(tick, &render);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(dispatcher.cycles_started(), 5);
    }
}
