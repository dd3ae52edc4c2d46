//! # arreSTick
//!
//! Predicts arreSTick motif regions in protein sequences. A fixed-parameter
//! convolutional model scores every residue, maximal runs of high-probability
//! window starts become regions, and, for known UniProt entries, the per-residue
//! pLDDT confidence of the AlphaFold model is attached to the result.
//!
//! ## Layers
//!
//! - [`core`] - Pure scoring, parsing and data types
//! - [`engine`] - Configuration, shared context, fetching and cancellation
//! - [`workflows`] - The end-to-end prediction pipeline

pub mod core;
pub mod engine;
pub mod workflows;
