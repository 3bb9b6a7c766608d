//! Per-actor wire entries and their optional nested sections.
//!
//! An [`ActorEntry`] carries a handful of per-section inclusion flags
//! mirroring the snapshot-level ones: each optional section is `Some` iff
//! its flag is true, so a consumer can branch on the flag alone.

use serde::{Deserialize, Serialize};

use crate::enums::Passion;
use crate::ids::{ActorId, RegionId};
use crate::snapshot::Cell;

/// One simulated inhabitant at snapshot time.
///
/// Role flags are informative rather than mutually exclusive: a prisoner
/// of the colony is not a colonist, but the host decides what combination
/// it reports. Owned exclusively by the containing snapshot and never
/// retained past one transmission cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ActorEntry {
    /// Host-assigned stable identifier.
    pub id: ActorId,
    /// Full display name.
    pub full_name: String,
    /// Short display name.
    pub nick_name: String,
    /// Generic label (e.g. species plus name).
    pub label: String,

    /// Whether the skills section was requested and populated.
    pub includes_skills: bool,
    /// Whether the needs section was requested and populated.
    pub includes_needs: bool,
    /// Whether the health section was requested and populated.
    pub includes_health: bool,
    /// Whether the job section was requested and populated.
    pub includes_job: bool,
    /// Whether a portrait was captured for this actor.
    pub includes_portrait: bool,

    /// The region the actor is currently on, if any.
    pub region: Option<RegionId>,

    /// The actor belongs to the player faction.
    pub colonist: bool,
    /// The actor is a guest of the player faction.
    pub visitor: bool,
    /// The actor is held prisoner by the player faction.
    pub prisoner: bool,
    /// The actor is hostile to the player faction.
    pub enemy: bool,

    /// Drafted for manual control.
    pub drafted: bool,
    /// Currently selected in the host UI.
    pub selected: bool,
    /// Dead.
    pub dead: bool,
    /// Incapacitated.
    pub downed: bool,
    /// Asleep.
    pub sleeping: bool,
    /// Idle (no queued work).
    pub idle: bool,
    /// Resting in a medical bed.
    pub medical_rest: bool,
    /// In any mental state.
    pub in_mental_state: bool,
    /// In an aggressive mental state.
    pub in_aggro_mental_state: bool,

    /// Biological age in years.
    pub age: f32,
    /// Aggregate health, 0.0 to 1.0.
    pub current_health: f32,
    /// Position on the region grid.
    pub position: Cell,
    /// Trait labels, in host order.
    pub traits: Vec<String>,

    /// Skill records, present iff `includes_skills`.
    pub skills: Option<SkillSheet>,
    /// Need levels, present iff `includes_needs`.
    pub needs: Option<NeedSheet>,
    /// Health conditions, present iff `includes_health`.
    pub health: Option<HealthSheet>,
    /// Body capacities, present iff `includes_health`.
    pub capacities: Option<CapacitySheet>,
    /// Current activity, present iff `includes_job` and the actor has one.
    pub job: Option<JobEntry>,
    /// PNG-encoded portrait, present iff `includes_portrait`.
    pub portrait: Option<Vec<u8>>,
}

/// The skills section of an actor entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSheet {
    /// One record per skill, in host order.
    pub skills: Vec<SkillEntry>,
}

/// One skill record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    /// Skill name.
    pub name: String,
    /// Passion level for the skill.
    pub passion: Passion,
    /// Current integer level.
    pub level: i32,
    /// False when the skill is totally disabled for this actor.
    pub enabled: bool,
    /// Progress toward the next level, 0.0 to 1.0.
    pub xp_progress: f32,
    /// Total XP earned over the actor's lifetime.
    pub total_xp: f32,
    /// XP earned since the last level-up.
    pub current_xp: f32,
    /// XP required for the next level-up.
    pub levelup_xp: f32,
}

/// A named, textually-serialized measurement.
///
/// Needs and capacities travel as `(key, value)` pairs where the value is
/// the decimal rendering of a float. A textual value sidesteps locale and
/// float-format ambiguity at the wire boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    /// Measurement name.
    pub key: String,
    /// Decimal rendering of the measured value.
    pub value: String,
}

impl Measure {
    /// Build a measure from a name and a float level.
    pub fn from_level(key: impl Into<String>, level: f32) -> Self {
        Self {
            key: key.into(),
            value: format!("{level}"),
        }
    }
}

/// The needs section of an actor entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedSheet {
    /// Current need levels, in host order.
    pub needs: Vec<Measure>,
}

/// The capacities section of an actor entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacitySheet {
    /// Capacity levels, in host order.
    pub capacities: Vec<Measure>,
}

/// The health section of an actor entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthSheet {
    /// Active health conditions, in host order.
    pub hediffs: Vec<HediffEntry>,
}

/// One health condition (hediff) affecting an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HediffEntry {
    /// Display label of the condition.
    pub label: String,
    /// Whether the condition can be tended right now.
    pub tendable: bool,
    /// Whether the condition has been tended.
    pub tended: bool,
    /// Bleeding rate contributed by the condition.
    pub bleed_rate: f32,
    /// Pain contributed by the condition.
    pub pain: f32,
    /// Affected body part, if the condition is localized.
    pub location: Option<String>,
    /// Impact on the aggregate health percentage.
    pub health_percent_impact: f32,
    /// Whether the condition is permanent.
    pub permanent: bool,
}

/// The current activity of an actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEntry {
    /// Activity label (the host's report string).
    pub name: String,
    /// Primary target, if any.
    pub target_a: Option<JobTarget>,
    /// Secondary target, if any.
    pub target_b: Option<JobTarget>,
    /// Tertiary target, if any.
    pub target_c: Option<JobTarget>,
}

/// One target of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTarget {
    /// Display name of the target, or a `?`-prefixed cell marker when the
    /// target has no backing physical object.
    pub name: String,
    /// Cell the target occupies.
    pub location: Cell,
}

impl JobTarget {
    /// Build a target that points at a physical thing.
    pub fn thing(name: impl Into<String>, location: Cell) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    /// Build a target for a bare cell with no backing thing.
    pub fn bare_cell(location: Cell) -> Self {
        Self {
            name: format!("?{location}"),
            location,
        }
    }
}
