//! Host-simulation seam for the RimIO exporter.
//!
//! The exporter never owns the game world; it reads it. This crate defines
//! the narrow surface through which it does so:
//!
//! - [`source`] -- best-effort accessor traits over live, concurrently
//!   mutated simulation state
//! - [`registry`] -- the owned registry of currently-loaded regions
//! - [`render`] -- the render-thread capability token and portrait surface
//! - [`stub`] -- a scriptable in-memory world for tests and demos
//!
//! # The best-effort read contract
//!
//! Accessors in [`source`] are called from background export tasks while
//! the simulation thread keeps mutating the underlying state. There is no
//! locking and no snapshot isolation: a read may observe an entity mid-
//! mutation or find it gone between two calls. Every per-entity accessor
//! therefore returns a [`HostError`], and callers are required to treat
//! any error as "drop this one entity and move on". This is a deliberate
//! contract, not an accident -- see the exporter's builder for the
//! containment side.

pub mod error;
pub mod registry;
pub mod render;
pub mod source;
pub mod stub;

pub use error::HostError;
pub use registry::RegionRegistry;
pub use render::{PixelSurface, RenderHandle};
pub use source::{ActorFlags, ActorIdentity, ActorSource, ActorVitals, RawWealth, RegionSource, WorldSource};
