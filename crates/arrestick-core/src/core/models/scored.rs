use serde::Serialize;
use thiserror::Error;

/// pLDDT above which AlphaFold considers a residue confidently modelled.
pub const HIGH_CONFIDENCE_PLDDT: f64 = 70.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Array '{name}' has length {actual}, expected {expected}")]
pub struct AlignmentError {
    pub name: &'static str,
    pub expected: usize,
    pub actual: usize,
}

/// A sequence with its probability and confidence signals, aligned residue for residue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSequence {
    sequence: String,
    probability: Vec<f64>,
    confidence: Vec<f64>,
    #[serde(skip)]
    window_length: usize,
}

/// One row of the per-residue view of a [`ScoredSequence`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidueRow {
    pub position: usize,
    pub residue: char,
    pub probability: f64,
    pub confidence: f64,
    pub high_confidence: bool,
    /// Motif window starting here, e.g. `3-17 SEQ...`, clipped at the sequence end.
    pub window: String,
}

impl ScoredSequence {
    /// Pairs a sequence with its signals, rejecting arrays of mismatched length.
    ///
    /// When `confidence` is `None` it is zero-filled to the sequence length.
    pub fn new(
        sequence: String,
        probability: Vec<f64>,
        confidence: Option<Vec<f64>>,
    ) -> Result<Self, AlignmentError> {
        let length = sequence.chars().count();
        let confidence = confidence.unwrap_or_else(|| vec![0.0; length]);

        for (name, actual) in [
            ("probability", probability.len()),
            ("confidence", confidence.len()),
        ] {
            if actual != length {
                return Err(AlignmentError {
                    name,
                    expected: length,
                    actual,
                });
            }
        }

        Ok(Self {
            sequence,
            probability,
            confidence,
            window_length: 1,
        })
    }

    /// Sets how many residues each per-residue window label spans.
    pub fn with_window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length.max(1);
        self
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn probability(&self) -> &[f64] {
        &self.probability
    }

    pub fn confidence(&self) -> &[f64] {
        &self.confidence
    }

    pub fn len(&self) -> usize {
        self.probability.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probability.is_empty()
    }

    pub fn residues(&self) -> impl Iterator<Item = ResidueRow> + '_ {
        let residues: Vec<char> = self.sequence.chars().collect();
        let length = residues.len();
        (0..length).map(move |i| {
            let end = (i + self.window_length).min(length);
            let confidence = self.confidence[i];
            ResidueRow {
                position: i + 1,
                residue: residues[i],
                probability: self.probability[i],
                confidence,
                high_confidence: confidence > HIGH_CONFIDENCE_PLDDT,
                window: format!(
                    "{}-{} {}",
                    i + 1,
                    end,
                    residues[i..end].iter().collect::<String>()
                ),
            }
        })
    }

    pub fn high_confidence_count(&self) -> usize {
        self.confidence
            .iter()
            .filter(|&&c| c > HIGH_CONFIDENCE_PLDDT)
            .count()
    }
}
