use super::alphabet::AminoAcidAlphabet;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MODEL_NAME: &str = "model_1";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawModelSection {
    aa_dict: HashMap<String, f64>,
    kernel_weights: Vec<f64>,
    conv_bias: f64,
    sigmoid_weight: f64,
    sigmoid_bias: f64,
}

/// The immutable parameter bundle of one trained scoring model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    alphabet: AminoAcidAlphabet,
    kernel: Vec<f64>,
    bias: f64,
    sigmoid_scale: f64,
    sigmoid_offset: f64,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Model section '{model}' not found in '{path}'")]
    MissingModel { path: String, model: String },
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl ModelParameters {
    /// Builds a parameter bundle from already-parsed values.
    ///
    /// All values are validated the same way as a loaded artifact, so a
    /// bundle constructed here is always usable by the scorer.
    pub fn new(
        embeddings: HashMap<char, f64>,
        kernel: Vec<f64>,
        bias: f64,
        sigmoid_scale: f64,
        sigmoid_offset: f64,
    ) -> Result<Self, ParamLoadError> {
        let alphabet = AminoAcidAlphabet::new(embeddings)?;

        if kernel.is_empty() {
            return Err(ParamLoadError::InvalidParameter {
                name: "kernel_weights".to_string(),
                reason: "kernel must contain at least one weight".to_string(),
            });
        }
        if let Some(pos) = kernel.iter().position(|w| !w.is_finite()) {
            return Err(ParamLoadError::InvalidParameter {
                name: "kernel_weights".to_string(),
                reason: format!("weight at index {} is not a finite number", pos),
            });
        }
        for (name, value) in [
            ("conv_bias", bias),
            ("sigmoid_weight", sigmoid_scale),
            ("sigmoid_bias", sigmoid_offset),
        ] {
            ensure_finite(name, value)?;
        }

        Ok(Self {
            alphabet,
            kernel,
            bias,
            sigmoid_scale,
            sigmoid_offset,
        })
    }

    pub fn load(path: &Path, model_name: &str) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let toml_error = |e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        };
        let mut document: toml::Table = toml::from_str(&content).map_err(toml_error)?;
        let raw: RawModelSection = document
            .remove(model_name)
            .ok_or_else(|| ParamLoadError::MissingModel {
                path: path.to_string_lossy().to_string(),
                model: model_name.to_string(),
            })?
            .try_into()
            .map_err(toml_error)?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawModelSection) -> Result<Self, ParamLoadError> {
        let mut embeddings = HashMap::with_capacity(raw.aa_dict.len());
        for (key, value) in raw.aa_dict {
            let mut chars = key.chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(c), None) => c.to_ascii_uppercase(),
                _ => {
                    return Err(ParamLoadError::InvalidParameter {
                        name: format!("aa_dict.{}", key),
                        reason: "residue symbols must be exactly one character".to_string(),
                    });
                }
            };
            if embeddings.insert(symbol, value).is_some() {
                return Err(ParamLoadError::InvalidParameter {
                    name: format!("aa_dict.{}", key),
                    reason: format!("symbol '{}' is defined more than once", symbol),
                });
            }
        }

        Self::new(
            embeddings,
            raw.kernel_weights,
            raw.conv_bias,
            raw.sigmoid_weight,
            raw.sigmoid_bias,
        )
    }

    pub fn alphabet(&self) -> &AminoAcidAlphabet {
        &self.alphabet
    }

    pub fn kernel(&self) -> &[f64] {
        &self.kernel
    }

    pub fn kernel_len(&self) -> usize {
        self.kernel.len()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn sigmoid_scale(&self) -> f64 {
        self.sigmoid_scale
    }

    pub fn sigmoid_offset(&self) -> f64 {
        self.sigmoid_offset
    }
}

fn ensure_finite(name: &str, value: f64) -> Result<(), ParamLoadError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamLoadError::InvalidParameter {
            name: name.to_string(),
            reason: format!("expected a finite number, got {}", value),
        })
    }
}
