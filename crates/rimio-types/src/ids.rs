//! Type-safe wrappers for host-assigned entity identifiers.
//!
//! The host simulation assigns its own identifiers: actors carry a stable
//! string thing-id (e.g. `"Human42"`), regions carry a small integer unique
//! id. Neither is generated on our side -- these wrappers only prevent the
//! two from being mixed up at compile time and give them `BTreeMap`-friendly
//! ordering.

use serde::{Deserialize, Serialize};

/// Stable identifier of one simulated inhabitant, as assigned by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    /// Wrap a host-assigned thing-id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of a loaded region (map), as assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(pub i32);

impl RegionId {
    /// Wrap a host-assigned region id.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Return the inner integer value.
    pub const fn into_inner(self) -> i32 {
        self.0
    }
}

impl core::fmt::Display for RegionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for RegionId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<RegionId> for i32 {
    fn from(id: RegionId) -> Self {
        id.0
    }
}
