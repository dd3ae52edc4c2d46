use super::alphafold::ModelParseError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain structural confidence for an accession.
///
/// `Fetch` and `Timeout` are transport failures and may succeed on retry;
/// every other variant is final.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RetrievalError {
    #[error("No structural model is published for accession '{accession}'")]
    NotFound { accession: String },

    #[error("Failed to retrieve structural model for '{accession}': {reason}")]
    Fetch { accession: String, reason: String },

    #[error("Retrieval of structural model for '{accession}' timed out after {timeout:?}")]
    Timeout { accession: String, timeout: Duration },

    #[error("Malformed structural model for '{accession}': {source}")]
    Parse {
        accession: String,
        source: ModelParseError,
    },

    #[error("Retrieval of structural model for '{accession}' was cancelled")]
    Cancelled { accession: String },

    #[error("Structural model retrieval is disabled, cannot obtain a sequence for '{accession}'")]
    Disabled { accession: String },
}

impl RetrievalError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Timeout { .. })
    }

    pub fn accession(&self) -> &str {
        match self {
            Self::NotFound { accession }
            | Self::Fetch { accession, .. }
            | Self::Timeout { accession, .. }
            | Self::Parse { accession, .. }
            | Self::Cancelled { accession }
            | Self::Disabled { accession } => accession,
        }
    }
}

/// A provider of raw structural model files, addressed by accession.
///
/// Implementations only transport text; parsing happens in the engine so
/// that cancellation can be observed before any parsing begins.
pub trait ModelSource: Send + Sync {
    /// Returns the model file for `accession`.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::NotFound`] when the source has no model for the
    /// accession, and [`RetrievalError::Fetch`] or [`RetrievalError::Timeout`]
    /// for transport failures.
    fn fetch_model(
        &self,
        accession: &str,
    ) -> impl Future<Output = Result<String, RetrievalError>> + Send;
}

/// A source for runs without network access; every accession is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl ModelSource for OfflineSource {
    async fn fetch_model(&self, accession: &str) -> Result<String, RetrievalError> {
        Err(RetrievalError::Disabled {
            accession: accession.to_string(),
        })
    }
}
