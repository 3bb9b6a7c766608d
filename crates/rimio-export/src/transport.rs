//! Fire-and-forget HTTP delivery of serialized snapshots.
//!
//! One POST per cycle, with tight connect and overall timeouts so an
//! unreachable companion app costs a bounded amount of background time
//! and nothing else. There is no queue and no retry: a failed send means
//! this cycle's data is lost, and the next cadence boundary starts fresh.
//! Connection refused, DNS failure, timeout, and a non-success status are
//! all treated uniformly as one failed attempt.

use std::time::Duration;

use crate::config::ExporterConfig;
use crate::error::ExportError;

/// Version header sent with every snapshot POST.
pub const DATA_VERSION_HEADER: &str = "X-RimIODataVersion";

/// Current wire format version.
pub const DATA_VERSION: &str = "1";

/// A destination that can accept one serialized snapshot.
///
/// The dispatcher is generic over this seam so tests can substitute slow
/// or failing destinations without a network.
pub trait Delivery: Send + Sync + 'static {
    /// Attempt one delivery of the payload.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Delivery`] if the attempt fails for any
    /// reason. The implementation must give up within its configured
    /// timeout rather than hang.
    fn send(&self, payload: Vec<u8>) -> impl Future<Output = Result<(), ExportError>> + Send;
}

/// HTTP POST delivery to the companion app's `/GameData` endpoint.
#[derive(Debug, Clone)]
pub struct HttpDelivery {
    client: reqwest::Client,
    url: String,
}

impl HttpDelivery {
    /// Build a delivery bound to the configured destination.
    ///
    /// The connect timeout and the overall request timeout both come from
    /// `config.timeout_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &ExporterConfig) -> Result<Self, ExportError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ExportError::ClientBuild {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            url: config.data_url(),
        })
    }

    /// The destination URL this delivery posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Delivery for HttpDelivery {
    async fn send(&self, payload: Vec<u8>) -> Result<(), ExportError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/xml")
            .header("Accept", "application/xml")
            .header(DATA_VERSION_HEADER, DATA_VERSION)
            .body(payload)
            .send()
            .await
            .map_err(|e| ExportError::Delivery {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::Delivery {
                url: self.url.clone(),
                reason: format!("server returned {status}"),
            });
        }

        // The body is irrelevant, but the connection must be fully
        // consumed so it can be released.
        let _ = response.bytes().await;
        Ok(())
    }
}
