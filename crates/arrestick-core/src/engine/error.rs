use crate::core::entries::index::EntryLoadError;
use crate::core::io::source::RetrievalError;
use crate::core::scoring::alphabet::ValidationError;
use crate::core::scoring::convolution::ScoringError;
use crate::core::scoring::params::ParamLoadError;
use thiserror::Error;

/// Startup failures. Without a valid configuration the engine cannot run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Failed to load model parameters: {0}")]
    Params(#[from] ParamLoadError),

    #[error("Failed to load entry table: {0}")]
    Entries(#[from] EntryLoadError),

    #[error("Failed to initialize HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Request failures, each distinguishable at the presentation boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error("Invalid sequence: {0}")]
    Validation(#[from] ValidationError),

    #[error("'{identifier}' is neither a known protein entry nor a valid amino acid sequence")]
    UnresolvedIdentifier { identifier: String },

    #[error(
        "Sequence of length {length} is shorter than the motif window of {kernel_length} residues"
    )]
    InsufficientLength { length: usize, kernel_length: usize },

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl PredictError {
    /// Whether the failure stems from what the user typed, as opposed to the remote data source.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnresolvedIdentifier { .. } | Self::InsufficientLength { .. }
        )
    }
}

impl From<ScoringError> for PredictError {
    fn from(error: ScoringError) -> Self {
        match error {
            ScoringError::InsufficientLength {
                length,
                kernel_length,
            } => Self::InsufficientLength {
                length,
                kernel_length,
            },
            ScoringError::Validation(e) => Self::Validation(e),
        }
    }
}
