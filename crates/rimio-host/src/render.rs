//! Render-thread capability token and the raw portrait surface.
//!
//! Portrait capture needs the host's graphics context, which only exists
//! on one thread. Rather than relying on caller discipline, the capture
//! APIs demand a [`RenderHandle`], and the handle is `!Send` by
//! construction -- a spawned background task cannot be given one, so a
//! misplaced capture call fails to compile instead of failing at runtime.

use core::marker::PhantomData;

/// Capability token proving the caller is on the render-capable thread.
///
/// Acquire exactly one, on the thread that owns the host's rendering
/// context, and pass it by reference into the dispatcher's synchronous
/// phase. The raw-pointer `PhantomData` keeps the type `!Send`/`!Sync`.
#[derive(Debug)]
pub struct RenderHandle {
    _thread_bound: PhantomData<*const ()>,
}

impl RenderHandle {
    /// Acquire the capability on the current thread.
    ///
    /// The caller asserts that the current thread has rendering-context
    /// access; the type system then prevents the handle from migrating.
    pub const fn acquire() -> Self {
        Self {
            _thread_bound: PhantomData,
        }
    }
}

/// An RGBA8 pixel buffer produced by a portrait render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly-packed RGBA bytes, row-major, `width * height * 4` long.
    pub rgba: Vec<u8>,
}

impl PixelSurface {
    /// Number of bytes a well-formed surface of this size must hold.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn expected_len(&self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    /// Whether the buffer length matches the declared dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.rgba.len() == self.expected_len()
    }
}
