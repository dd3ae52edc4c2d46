//! # Scoring Module
//!
//! The fixed-parameter convolutional model that turns a residue sequence into a
//! per-residue arreSTick probability signal, and the extraction of reportable
//! regions from that signal.
//!
//! ## Key Components
//!
//! - [`params`] - Loading and validating the trained model parameters
//! - [`alphabet`] - Residue embeddings and sequence validation
//! - [`convolution`] - Window scoring and sigmoid probability computation
//! - [`regions`] - Threshold-based grouping of hot window starts into regions
//!
//! ## Usage
//!
//! ```ignore
//! use arrestick::core::scoring::{convolution::Scorer, params::ModelParameters, regions};
//!
//! let params = ModelParameters::load("model_params.toml".as_ref(), "model_1")?;
//! let probability = Scorer::new(&params).score("MSTKRS")?;
//! let hot = regions::extract("MSTKRS", &probability, params.kernel_len(), 0.5);
//! ```

pub mod alphabet;
pub mod convolution;
pub mod params;
pub mod regions;
