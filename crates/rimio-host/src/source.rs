//! Best-effort accessor traits over live simulation state.
//!
//! Each trait method is a narrow, idempotent read. Implementations are
//! provided by the host integration (and by [`crate::stub`] for tests);
//! they must tolerate being called from a background thread while the
//! simulation thread mutates the same state, returning [`HostError`] for
//! anything they cannot read coherently rather than blocking or panicking.

use std::collections::BTreeSet;
use std::sync::Arc;

use rimio_types::{ActorId, Cell, HediffEntry, JobEntry, Measure, RegionId, SkillEntry};

use crate::error::HostError;
use crate::render::{PixelSurface, RenderHandle};

/// Identity fields of an actor, read in one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorIdentity {
    /// Full display name.
    pub full_name: String,
    /// Short display name.
    pub nick_name: String,
    /// Generic label.
    pub label: String,
}

/// Role and state flags of an actor, read in one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ActorFlags {
    /// Belongs to the player faction.
    pub colonist: bool,
    /// Guest of the player faction.
    pub visitor: bool,
    /// Prisoner of the player faction.
    pub prisoner: bool,
    /// Hostile to the player faction.
    pub enemy: bool,
    /// Drafted for manual control.
    pub drafted: bool,
    /// Dead.
    pub dead: bool,
    /// Incapacitated.
    pub downed: bool,
    /// Asleep.
    pub sleeping: bool,
    /// Idle.
    pub idle: bool,
    /// Resting in a medical bed.
    pub medical_rest: bool,
    /// In any mental state.
    pub in_mental_state: bool,
    /// In an aggressive mental state.
    pub in_aggro_mental_state: bool,
}

/// Vital statistics of an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActorVitals {
    /// Biological age in years.
    pub age: f32,
    /// Aggregate health, 0.0 to 1.0.
    pub current_health: f32,
}

/// Raw wealth figures as the host reports them.
///
/// Unlike the wire model's breakdown, `buildings` here still includes
/// floor value; the exporter nets it out when building the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawWealth {
    /// Value of built floors.
    pub floors: f32,
    /// Value of buildings, including floors.
    pub buildings: f32,
    /// Value of loose items.
    pub items: f32,
    /// Value of actors present.
    pub actors: f32,
    /// The host's aggregate total.
    pub total: f32,
}

/// The world-level read surface.
///
/// The infallible methods read values the host keeps trivially available
/// (tick counter, seed, the colonist bar); everything per-entity goes
/// through [`ActorSource`] and [`RegionSource`] and can fail.
pub trait WorldSource: Send + Sync {
    /// Identifier of the loaded world.
    fn world_seed(&self) -> String;

    /// Current monotonic game tick.
    fn current_tick(&self) -> u64;

    /// Handles to the player-faction actors, in canonical display order.
    fn colonists_in_order(&self) -> Vec<Arc<dyn ActorSource>>;

    /// Identifiers of the actors currently selected in the host UI.
    fn selected_actor_ids(&self) -> BTreeSet<ActorId>;
}

/// The per-region read surface.
pub trait RegionSource: Send + Sync {
    /// Host-assigned region identifier. Stable for the region's lifetime.
    fn id(&self) -> RegionId;

    /// Display name of the region.
    fn name(&self) -> Result<String, HostError>;

    /// Whether the region is the player's home base.
    fn is_home(&self) -> Result<bool, HostError>;

    /// Grid size as `(width, height)`.
    fn size(&self) -> Result<(i32, i32), HostError>;

    /// Current wealth figures.
    fn wealth(&self) -> Result<RawWealth, HostError>;
}

/// The per-actor read surface.
///
/// One getter per field group of the wire model's actor entry. The split
/// keeps each read narrow so a mid-mutation failure loses one group's
/// coherence at most, and the whole actor at worst.
pub trait ActorSource: Send + Sync {
    /// Host-assigned stable identifier.
    fn id(&self) -> ActorId;

    /// Display names.
    fn identity(&self) -> Result<ActorIdentity, HostError>;

    /// Region the actor currently stands on, if any.
    fn region(&self) -> Result<Option<RegionId>, HostError>;

    /// Role and state flags.
    fn flags(&self) -> Result<ActorFlags, HostError>;

    /// Age and aggregate health.
    fn vitals(&self) -> Result<ActorVitals, HostError>;

    /// Position on the region grid.
    fn position(&self) -> Result<Cell, HostError>;

    /// Trait labels, in host order.
    fn traits(&self) -> Result<Vec<String>, HostError>;

    /// Skill records, in host order.
    fn skills(&self) -> Result<Vec<SkillEntry>, HostError>;

    /// Need levels, in host order.
    fn needs(&self) -> Result<Vec<Measure>, HostError>;

    /// Health conditions, in host order.
    fn hediffs(&self) -> Result<Vec<HediffEntry>, HostError>;

    /// Body capacities, in host order.
    fn capacities(&self) -> Result<Vec<Measure>, HostError>;

    /// Current activity, if the actor has one.
    fn current_job(&self) -> Result<Option<JobEntry>, HostError>;

    /// Render the actor's portrait into a pixel surface.
    ///
    /// Requires the [`RenderHandle`] capability and therefore can only be
    /// called from the render-capable thread; see [`crate::render`].
    fn render_portrait(&self, render: &RenderHandle) -> Result<PixelSurface, HostError>;
}
