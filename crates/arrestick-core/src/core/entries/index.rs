use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct EntryRecord {
    #[serde(rename = "Entry Name")]
    name: String,
    #[serde(rename = "Entry")]
    accession: String,
}

/// Immutable lookup from UniProt entry names (e.g. `ARRB1_HUMAN`) to accessions.
#[derive(Debug, Clone, Default)]
pub struct EntryIndex {
    by_name: HashMap<String, String>,
    accessions: HashSet<String>,
}

#[derive(Debug, Error)]
pub enum EntryLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Empty {column} on record {record} of '{path}'")]
    EmptyField {
        path: String,
        record: usize,
        column: &'static str,
    },
}

impl EntryIndex {
    /// Loads a tab-separated entry table with `Entry Name` and `Entry` columns.
    ///
    /// Additional columns are ignored. A repeated entry name keeps the last accession seen.
    pub fn load(path: &Path) -> Result<Self, EntryLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let file = std::fs::File::open(path).map_err(|e| EntryLoadError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(file);

        let mut index = Self::default();
        for (i, result) in reader.deserialize::<EntryRecord>().enumerate() {
            let record = result.map_err(|e| EntryLoadError::Csv {
                path: path_str.clone(),
                source: e,
            })?;
            let name = record.name.trim();
            let accession = record.accession.trim();
            let column = match (name.is_empty(), accession.is_empty()) {
                (true, _) => Some("Entry Name"),
                (_, true) => Some("Entry"),
                _ => None,
            };
            if let Some(column) = column {
                return Err(EntryLoadError::EmptyField {
                    path: path_str,
                    record: i + 1,
                    column,
                });
            }
            index.insert(name, accession);
        }

        debug!(
            "Loaded {} entries ({} distinct accessions) from {}",
            index.len(),
            index.accessions.len(),
            path_str
        );
        Ok(index)
    }

    pub fn from_pairs<I, N, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, A)>,
        N: AsRef<str>,
        A: AsRef<str>,
    {
        let mut index = Self::default();
        for (name, accession) in pairs {
            index.insert(name.as_ref(), accession.as_ref());
        }
        index
    }

    fn insert(&mut self, name: &str, accession: &str) {
        if let Some(previous) = self
            .by_name
            .insert(name.to_string(), accession.to_string())
        {
            if previous != accession && !self.by_name.values().any(|a| a == &previous) {
                self.accessions.remove(&previous);
            }
        }
        self.accessions.insert(accession.to_string());
    }

    /// Resolves an accession or an entry name to an accession.
    ///
    /// Accessions are matched first; both comparisons are exact.
    pub fn resolve(&self, identifier: &str) -> Option<&str> {
        if let Some(accession) = self.accessions.get(identifier) {
            return Some(accession.as_str());
        }
        self.accession_for(identifier)
    }

    pub fn accession_for(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    pub fn contains_accession(&self, accession: &str) -> bool {
        self.accessions.contains(accession)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
