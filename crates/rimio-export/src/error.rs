//! Error types for the `rimio-export` crate.
//!
//! Every variant here is cycle-scoped: the worst consequence of any of
//! them is that one export cycle's data is lost. Nothing escalates past
//! the background task that hit it.

/// Errors from the build, serialize, and send stages of an export cycle.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing the XML payload failed.
    #[error("payload serialization failed: {source}")]
    Serialize {
        /// The underlying writer error.
        #[from]
        source: std::io::Error,
    },

    /// Encoding a portrait surface to PNG failed.
    #[error("portrait encoding failed: {source}")]
    Png {
        /// The underlying encoder error.
        #[from]
        source: png::EncodingError,
    },

    /// The HTTP client itself could not be constructed.
    #[error("failed to construct HTTP client: {reason}")]
    ClientBuild {
        /// The underlying cause, as text.
        reason: String,
    },

    /// Delivering the payload to the companion app failed.
    ///
    /// Connection refused, DNS failure, timeout, and a non-success status
    /// all land here; the exporter treats them uniformly.
    #[error("failed to POST to {url}: {reason}")]
    Delivery {
        /// The destination that was attempted.
        url: String,
        /// The underlying cause, as text.
        reason: String,
    },
}
