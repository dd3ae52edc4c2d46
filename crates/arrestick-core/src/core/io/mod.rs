//! Provides retrieval and parsing of externally published structural models.
//!
//! Structural confidence is read from PDBx/mmCIF files such as those served by
//! the AlphaFold Protein Structure Database. Transport sits behind the
//! [`source::ModelSource`] trait so the engine can be driven by any provider,
//! including in-memory test doubles.

pub mod alphafold;
pub mod cif;
pub mod source;
