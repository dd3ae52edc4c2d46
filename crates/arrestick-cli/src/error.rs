use arrestick::engine::error::{ConfigError, PredictError};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Prediction(#[from] PredictError),

    #[error(transparent)]
    Setup(#[from] ConfigError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    Output(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
