use super::params::ParamLoadError;
use std::collections::HashMap;
use thiserror::Error;

/// The residue symbols a model was trained on, each with its embedding value.
///
/// The alphabet is the only authority on which characters are legal input:
/// a sequence containing any symbol outside of it cannot be scored.
#[derive(Debug, Clone, PartialEq)]
pub struct AminoAcidAlphabet {
    embeddings: HashMap<char, f64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Sequence is empty")]
    Empty,
    #[error("Invalid residue '{symbol}' at position {position}")]
    InvalidResidue { symbol: char, position: usize },
}

impl AminoAcidAlphabet {
    pub(crate) fn new(embeddings: HashMap<char, f64>) -> Result<Self, ParamLoadError> {
        if embeddings.is_empty() {
            return Err(ParamLoadError::InvalidParameter {
                name: "aa_dict".to_string(),
                reason: "embedding map must define at least one residue".to_string(),
            });
        }
        if let Some((symbol, value)) = embeddings.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ParamLoadError::InvalidParameter {
                name: format!("aa_dict.{}", symbol),
                reason: format!("expected a finite number, got {}", value),
            });
        }
        Ok(Self { embeddings })
    }

    #[inline]
    pub fn embedding(&self, symbol: char) -> Option<f64> {
        self.embeddings.get(&symbol).copied()
    }

    #[inline]
    pub fn contains(&self, symbol: char) -> bool {
        self.embeddings.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Symbols of the alphabet in ascending order.
    pub fn symbols(&self) -> Vec<char> {
        let mut symbols: Vec<char> = self.embeddings.keys().copied().collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn is_valid(&self, sequence: &str) -> bool {
        self.check(sequence).is_ok()
    }

    /// Checks that `sequence` is non-empty and made only of alphabet symbols.
    ///
    /// Positions in the returned error are 1-based.
    pub fn check(&self, sequence: &str) -> Result<(), ValidationError> {
        if sequence.is_empty() {
            return Err(ValidationError::Empty);
        }
        match sequence
            .chars()
            .enumerate()
            .find(|(_, c)| !self.contains(*c))
        {
            Some((index, symbol)) => Err(ValidationError::InvalidResidue {
                symbol,
                position: index + 1,
            }),
            None => Ok(()),
        }
    }

    /// Maps every residue of an already validated sequence to its embedding.
    pub(crate) fn embed(&self, sequence: &str) -> Result<Vec<f64>, ValidationError> {
        sequence
            .chars()
            .enumerate()
            .map(|(index, symbol)| {
                self.embedding(symbol)
                    .ok_or(ValidationError::InvalidResidue {
                        symbol,
                        position: index + 1,
                    })
            })
            .collect()
    }
}
