//! # Core Module
//!
//! Stateless building blocks of the arreSTick predictor: the scoring model, the
//! entry-name index, the structural-model readers, and the plain data types that
//! flow between them.
//!
//! ## Architecture
//!
//! - **Scoring** ([`scoring`]) - Model parameters, residue alphabet, convolution and regions
//! - **Entry Lookup** ([`entries`]) - Entry-name to accession resolution
//! - **File I/O** ([`io`]) - mmCIF reading and retrieval of AlphaFold models
//! - **Data Types** ([`models`]) - Queries, scored sequences and regions
//!
//! Everything here is a pure function of its inputs, or an immutable structure
//! loaded once. Orchestration lives in [`crate::engine`].

pub mod entries;
pub mod io;
pub mod models;
pub mod scoring;
