//! Wire model type definitions for the RimIO exporter.
//!
//! This crate is the single source of truth for the entities that make up
//! one exported snapshot of the game world. Every type here is value-shaped:
//! constructed fully from live simulation state at snapshot time, never
//! mutated afterward, and dropped once the snapshot has been serialized and
//! (attempted to be) delivered.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for host-assigned entity identifiers
//! - [`enums`] -- Enumeration types (skill passion)
//! - [`snapshot`] -- The snapshot root and geometry primitives
//! - [`region`] -- Per-region entries and the wealth breakdown
//! - [`actor`] -- Per-actor entries and their optional nested sections

pub mod actor;
pub mod enums;
pub mod ids;
pub mod region;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use actor::{
    ActorEntry, CapacitySheet, HealthSheet, HediffEntry, JobEntry, JobTarget, Measure, NeedSheet,
    SkillEntry, SkillSheet,
};
pub use enums::Passion;
pub use ids::{ActorId, RegionId};
pub use region::{RegionEntry, WealthBreakdown};
pub use snapshot::{Cell, Snapshot};
