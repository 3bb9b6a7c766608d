//! The snapshot root entity and geometry primitives.

use serde::{Deserialize, Serialize};

use crate::actor::ActorEntry;
use crate::region::RegionEntry;

/// A 2D integer cell coordinate on a region grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Cell {
    /// Create a cell from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl core::fmt::Display for Cell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One immutable, fully-populated capture of the game world at one instant.
///
/// The inclusion flags record which optional sections were requested for
/// this snapshot; a consumer can trust `includes_regions` /
/// `includes_actors` without inspecting whether the corresponding sequences
/// are empty. The `visitors` and `enemies` sequences are part of the wire
/// contract but not yet populated by the builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Logical timestamp: the host's monotonic game-tick counter.
    pub tick: u64,
    /// Identifier of the world this snapshot was taken from.
    pub world_seed: String,
    /// Whether the region section was requested and populated.
    pub includes_regions: bool,
    /// Whether the actor section was requested and populated.
    pub includes_actors: bool,
    /// Loaded regions, in registry order.
    pub regions: Vec<RegionEntry>,
    /// Player-faction actors, in the host's canonical display order.
    pub colonists: Vec<ActorEntry>,
    /// Visiting actors. Reserved; always empty for now.
    pub visitors: Vec<ActorEntry>,
    /// Hostile actors. Reserved; always empty for now.
    pub enemies: Vec<ActorEntry>,
}
