use super::region::Region;
use super::scored::{ResidueRow, ScoredSequence};
use serde::Serialize;

/// The complete answer to one query.
///
/// `accession` is present only when the query resolved to a protein entry. The
/// sequence, probability and confidence arrays are serialized inline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub query: String,
    pub accession: Option<String>,
    #[serde(flatten)]
    pub scored: ScoredSequence,
    pub regions: Vec<Region>,
}

impl Prediction {
    pub fn assemble(
        query: impl Into<String>,
        accession: Option<String>,
        scored: ScoredSequence,
        regions: Vec<Region>,
    ) -> Self {
        Self {
            query: query.into(),
            accession,
            scored,
            regions,
        }
    }

    pub fn sequence(&self) -> &str {
        self.scored.sequence()
    }

    pub fn residues(&self) -> impl Iterator<Item = ResidueRow> + '_ {
        self.scored.residues()
    }

    pub fn high_confidence_count(&self) -> usize {
        self.scored.high_confidence_count()
    }
}
