use super::cancel::CancelSignal;
use super::config::FetchConfig;
use super::progress::{Progress, ProgressReporter};
use crate::core::io::alphafold::StructureConfidence;
use crate::core::io::source::{ModelSource, RetrievalError};
use tracing::{debug, warn};

/// Retrieves structural confidence through a [`ModelSource`], bounding every
/// attempt with the configured timeout and honoring cancellation.
pub struct ConfidenceFetcher<'a, S: ModelSource> {
    source: &'a S,
    config: &'a FetchConfig,
}

impl<'a, S: ModelSource> ConfidenceFetcher<'a, S> {
    pub fn new(source: &'a S, config: &'a FetchConfig) -> Self {
        Self { source, config }
    }

    pub async fn fetch(
        &self,
        accession: &str,
        cancel: &CancelSignal,
        reporter: &ProgressReporter<'_>,
    ) -> Result<StructureConfidence, RetrievalError> {
        if !self.config.enabled {
            return Err(RetrievalError::Disabled {
                accession: accession.to_string(),
            });
        }

        let policy = self.config.retry;
        let mut retries = 0;
        loop {
            let error = match self.attempt(accession, cancel).await {
                Ok(confidence) => return Ok(confidence),
                Err(e) => e,
            };
            if !error.is_transient() || retries >= policy.max_retries {
                return Err(error);
            }

            retries += 1;
            let delay = policy.backoff_for(retries);
            warn!(
                "Retrying retrieval for {} in {:?} (retry {}/{}): {}",
                accession, delay, retries, policy.max_retries, error
            );
            reporter.report(Progress::Retry {
                attempt: retries,
                delay,
            });

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(accession)),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn attempt(
        &self,
        accession: &str,
        cancel: &CancelSignal,
    ) -> Result<StructureConfidence, RetrievalError> {
        if cancel.is_cancelled() {
            return Err(cancelled(accession));
        }

        let timeout = self.config.timeout;
        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(accession)),
            result = tokio::time::timeout(timeout, self.source.fetch_model(accession)) => {
                match result {
                    Ok(text) => text?,
                    Err(_) => {
                        return Err(RetrievalError::Timeout {
                            accession: accession.to_string(),
                            timeout,
                        });
                    }
                }
            }
        };

        if cancel.is_cancelled() {
            return Err(cancelled(accession));
        }

        debug!("Parsing {} bytes of model data for {}", text.len(), accession);
        StructureConfidence::from_cif(&text).map_err(|source| RetrievalError::Parse {
            accession: accession.to_string(),
            source,
        })
    }
}

fn cancelled(accession: &str) -> RetrievalError {
    RetrievalError::Cancelled {
        accession: accession.to_string(),
    }
}
