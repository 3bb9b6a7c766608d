//! Enumeration types shared across the wire model.

use serde::{Deserialize, Serialize};

/// How invested an actor is in a skill.
///
/// Serialized textually on the wire so the consumer never has to map
/// ordinals. [`Passion::label`] gives the exact wire spelling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Passion {
    /// No particular interest; XP accrues at the base rate.
    #[default]
    None,
    /// Mild interest; XP accrues faster.
    Minor,
    /// Burning interest; XP accrues fastest.
    Major,
}

impl Passion {
    /// The textual form used on the wire.
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Minor => "Minor",
            Self::Major => "Major",
        }
    }
}

impl core::fmt::Display for Passion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}
