//! # Entries Module
//!
//! Translation between human-readable UniProt entry names and the canonical
//! accessions used to address structural models.
//!
//! The index is loaded once from a tab-separated UniProt export and is
//! read-only afterwards, so it can be shared freely between requests.
//!
//! ```ignore
//! use arrestick::core::entries::index::EntryIndex;
//!
//! let index = EntryIndex::load("uniprot_entries.tsv".as_ref())?;
//! assert_eq!(index.resolve("ARRB1_HUMAN"), Some("P49407"));
//! ```

pub mod index;
