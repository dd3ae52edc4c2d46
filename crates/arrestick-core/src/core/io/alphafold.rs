use super::cif::{CifDocument, CifError};
use super::source::{ModelSource, RetrievalError};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://alphafold.ebi.ac.uk/files/AF-{accession}-F1-model_v4.cif";
pub const ACCESSION_PLACEHOLDER: &str = "{accession}";

const QA_METRIC_CATEGORY: &str = "ma_qa_metric_local";
const QA_METRIC_VALUE: &str = "metric_value";
const ENTITY_POLY_CATEGORY: &str = "entity_poly";
const ENTITY_POLY_SEQUENCE: &str = "pdbx_seq_one_letter_code";

/// Sequence and per-residue pLDDT extracted from an AlphaFold model.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureConfidence {
    pub sequence: String,
    pub confidence: Vec<f64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelParseError {
    #[error(transparent)]
    Cif(#[from] CifError),
    #[error("Non-numeric confidence value '{value}' on row {row}")]
    InvalidMetric { row: usize, value: String },
    #[error("Modelled sequence is empty")]
    EmptySequence,
    #[error("Sequence has {sequence} residues but {confidence} confidence values were found")]
    LengthMismatch { sequence: usize, confidence: usize },
}

impl StructureConfidence {
    /// Extracts the modelled sequence and local quality metric from mmCIF text.
    ///
    /// The number of metric rows must equal the number of residues; nothing is
    /// truncated or padded.
    pub fn from_cif(text: &str) -> Result<Self, ModelParseError> {
        let document = CifDocument::parse(text)?;

        let metrics = document.require(QA_METRIC_CATEGORY)?;
        let values = metrics
            .column(QA_METRIC_VALUE)
            .ok_or_else(|| CifError::MissingItem {
                category: QA_METRIC_CATEGORY.to_string(),
                item: QA_METRIC_VALUE.to_string(),
            })?;
        let confidence = values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ModelParseError::InvalidMetric {
                        row: i + 1,
                        value: value.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sequence: String = document
            .require(ENTITY_POLY_CATEGORY)?
            .value(ENTITY_POLY_SEQUENCE)
            .ok_or_else(|| CifError::MissingItem {
                category: ENTITY_POLY_CATEGORY.to_string(),
                item: ENTITY_POLY_SEQUENCE.to_string(),
            })?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if sequence.is_empty() {
            return Err(ModelParseError::EmptySequence);
        }

        let residues = sequence.chars().count();
        if residues != confidence.len() {
            return Err(ModelParseError::LengthMismatch {
                sequence: residues,
                confidence: confidence.len(),
            });
        }

        Ok(Self {
            sequence,
            confidence,
        })
    }
}

/// HTTP source for models published in the AlphaFold Protein Structure Database.
#[derive(Debug, Clone)]
pub struct AlphaFoldClient {
    client: reqwest::Client,
    url_template: String,
    timeout: Duration,
}

impl AlphaFoldClient {
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("arrestick/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url_template: url_template.into(),
            timeout,
        })
    }

    pub fn url_for(&self, accession: &str) -> String {
        self.url_template.replace(ACCESSION_PLACEHOLDER, accession)
    }

    fn transport_error(&self, accession: &str, error: reqwest::Error) -> RetrievalError {
        if error.is_timeout() {
            RetrievalError::Timeout {
                accession: accession.to_string(),
                timeout: self.timeout,
            }
        } else {
            RetrievalError::Fetch {
                accession: accession.to_string(),
                reason: error.to_string(),
            }
        }
    }
}

impl ModelSource for AlphaFoldClient {
    async fn fetch_model(&self, accession: &str) -> Result<String, RetrievalError> {
        let url = self.url_for(accession);
        debug!("Sending request to {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(accession, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RetrievalError::NotFound {
                accession: accession.to_string(),
            });
        }
        if !status.is_success() {
            return Err(RetrievalError::Fetch {
                accession: accession.to_string(),
                reason: format!("server responded with status {}", status),
            });
        }

        response
            .text()
            .await
            .map_err(|e| self.transport_error(accession, e))
    }
}
