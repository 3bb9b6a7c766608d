//! Error types for the engine binary.

/// Errors that can occur while wiring up and running the demo engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: rimio_export::config::ConfigError,
    },

    /// The export pipeline could not be constructed.
    #[error("exporter setup error: {source}")]
    Exporter {
        /// The underlying export error.
        #[from]
        source: rimio_export::ExportError,
    },
}
