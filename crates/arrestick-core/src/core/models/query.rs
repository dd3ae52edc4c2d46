use std::fmt;

/// Normalized user input: uppercased with every whitespace character removed.
///
/// A query is interpreted later as an accession, an entry name, or a literal
/// residue sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProteinQuery(String);

impl ProteinQuery {
    pub fn new(raw: &str) -> Self {
        Self(
            raw.chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_uppercase)
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProteinQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProteinQuery {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
