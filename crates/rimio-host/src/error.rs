//! Error types for the `rimio-host` crate.
//!
//! Every variant is per-entity and recoverable: a failed read means one
//! region or actor drops out of the current snapshot, never that the
//! snapshot (let alone the simulation) aborts.

/// Errors surfaced by best-effort reads of live simulation state.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The entity vanished between an existence check and a field read
    /// (e.g. a region unloaded or an actor despawned mid-snapshot).
    #[error("{what} is gone")]
    Gone {
        /// What vanished, for diagnostics.
        what: String,
    },

    /// The entity exists but a read transiently failed.
    #[error("{what} unavailable: {reason}")]
    Unavailable {
        /// What was being read.
        what: String,
        /// Why the read failed.
        reason: String,
    },

    /// A portrait render surface could not be produced.
    #[error("render failed: {reason}")]
    Render {
        /// Why the render failed.
        reason: String,
    },
}

impl HostError {
    /// Shorthand for a [`HostError::Gone`] on the named entity.
    pub fn gone(what: impl Into<String>) -> Self {
        Self::Gone { what: what.into() }
    }

    /// Shorthand for a [`HostError::Unavailable`] read.
    pub fn unavailable(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            what: what.into(),
            reason: reason.into(),
        }
    }
}
