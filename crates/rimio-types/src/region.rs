//! Per-region wire entries.

use serde::{Deserialize, Serialize};

use crate::ids::RegionId;

/// The five wealth metrics reported per region.
///
/// `buildings` is already net of floor value; `total` is the host's own
/// aggregate and therefore equals the sum of the other four components
/// (floors + net buildings + items + actors).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WealthBreakdown {
    /// Value of built floors.
    pub floors: f32,
    /// Value of buildings, excluding floor value.
    pub buildings: f32,
    /// Value of loose items.
    pub items: f32,
    /// Value of the actors present.
    pub actors: f32,
    /// Aggregate wealth of the region.
    pub total: f32,
}

/// One loaded region of the simulated world.
///
/// Rebuilt fresh every snapshot from the currently-known set of loaded
/// regions; never carried over between snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionEntry {
    /// Host-assigned region identifier.
    pub id: RegionId,
    /// Display name of the region.
    pub name: String,
    /// Whether this region is the player's home base.
    pub home: bool,
    /// Grid width in cells.
    pub size_x: i32,
    /// Grid height in cells.
    pub size_y: i32,
    /// Wealth metrics for the region.
    pub wealth: WealthBreakdown,
}
