//! Portrait capture pass and the process-wide portrait cache.
//!
//! Capture is the one pipeline step that cannot leave the simulation
//! thread: rendering an actor's portrait needs the host's graphics
//! context, so [`capture_pass`] demands a
//! [`RenderHandle`](rimio_host::RenderHandle) and runs synchronously
//! inside the dispatcher's cadence callback. It is budgeted to stay cheap;
//! everything downstream of it is spawned off-thread.
//!
//! The cache is rebuilt wholesale on every pass: cleared first, then
//! repopulated from the current colonist list, so actors that left the
//! colony since the last pass drop out automatically.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use rimio_host::{PixelSurface, RenderHandle, WorldSource};
use rimio_types::ActorId;
use tracing::debug;

use crate::error::ExportError;

type PortraitMap = BTreeMap<ActorId, Vec<u8>>;

/// Cache of PNG-encoded portraits keyed by actor id.
///
/// Written only by [`capture_pass`] on the simulation thread; read by
/// background build tasks. A build that races a capture pass sees either
/// the previous generation or the new one per actor -- both are portraits
/// of the same colonist and equally acceptable.
#[derive(Default)]
pub struct PortraitCache {
    portraits: RwLock<PortraitMap>,
}

impl PortraitCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire cache contents with a fresh generation.
    pub fn replace_all(&self, portraits: PortraitMap) {
        *self.write() = portraits;
    }

    /// Look up the PNG bytes for one actor.
    pub fn get(&self, id: &ActorId) -> Option<Vec<u8>> {
        self.read().get(id).cloned()
    }

    /// Number of cached portraits.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, PortraitMap> {
        self.portraits.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, PortraitMap> {
        self.portraits.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl core::fmt::Debug for PortraitCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PortraitCache")
            .field("len", &self.len())
            .finish()
    }
}

/// Result of one capture pass, for the dispatcher's debug stats.
#[derive(Debug, Clone, Copy)]
pub struct CaptureStats {
    /// Portraits captured this pass.
    pub captured: usize,
    /// Wall time the pass took, in milliseconds.
    pub elapsed_ms: u128,
}

/// Run one synchronous capture pass over the current colonist list.
///
/// Renders and PNG-encodes each colonist's portrait, then swaps the whole
/// cache generation. An actor whose render or encode fails is simply
/// absent from the new generation (and logged at debug level); the pass
/// itself never fails.
pub fn capture_pass(
    world: &dyn WorldSource,
    cache: &PortraitCache,
    render: &RenderHandle,
) -> CaptureStats {
    let started = Instant::now();
    let mut fresh = PortraitMap::new();

    for actor in world.colonists_in_order() {
        let id = actor.id();
        match actor.render_portrait(render) {
            Ok(surface) => match encode_png(&surface) {
                Ok(bytes) => {
                    fresh.insert(id, bytes);
                }
                Err(error) => {
                    debug!(actor = %id, %error, "portrait encode failed, skipping");
                }
            },
            Err(error) => {
                debug!(actor = %id, %error, "portrait render failed, skipping");
            }
        }
    }

    let stats = CaptureStats {
        captured: fresh.len(),
        elapsed_ms: started.elapsed().as_millis(),
    };
    cache.replace_all(fresh);
    stats
}

/// Encode an RGBA8 surface as a PNG image.
///
/// # Errors
///
/// Returns [`ExportError::Png`] if the surface dimensions and buffer
/// length disagree or the encoder fails.
pub fn encode_png(surface: &PixelSurface) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, surface.width, surface.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&surface.rgba)?;
    }
    Ok(out)
}
