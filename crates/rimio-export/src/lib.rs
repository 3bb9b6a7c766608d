//! Snapshot capture, serialization, and delivery pipeline.
//!
//! Once per cadence boundary the [`dispatch::Dispatcher`] runs the
//! pipeline: a synchronous portrait capture pass on the simulation thread
//! ([`portrait`]), then a spawned background task that builds the wire
//! model from live state ([`builder`]), serializes it to XML ([`wire`]),
//! and POSTs it to the companion app ([`transport`]). The simulation
//! thread never waits on the background half.
//!
//! Failure philosophy: there is no fatal error anywhere in this crate.
//! A vanished entity costs one snapshot entry, a failed delivery costs
//! one cycle's data, and both are surfaced as log events rather than
//! propagated upward.

pub mod builder;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod portrait;
pub mod transport;
pub mod wire;

pub use builder::build_snapshot;
pub use config::ExporterConfig;
pub use dispatch::Dispatcher;
pub use error::ExportError;
pub use portrait::PortraitCache;
pub use transport::{Delivery, HttpDelivery};
pub use wire::to_xml;
