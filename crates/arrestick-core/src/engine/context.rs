use super::config::{FetchConfig, PredictionConfig, RegionConfig};
use super::error::{ConfigError, PredictError};
use crate::core::entries::index::EntryIndex;
use crate::core::models::query::ProteinQuery;
use crate::core::scoring::params::ModelParameters;
use tracing::{debug, info};

/// How a query was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedQuery {
    /// A known accession or entry name; the sequence comes from the structural model.
    Accession(String),
    /// A literal residue sequence.
    Sequence(String),
}

/// Everything a prediction needs that outlives a single request.
///
/// Built once at startup and only read afterwards, so one context can serve
/// any number of concurrent requests by shared reference.
#[derive(Debug, Clone)]
pub struct EngineContext {
    params: ModelParameters,
    entries: EntryIndex,
    regions: RegionConfig,
    fetch: FetchConfig,
}

impl EngineContext {
    pub fn new(params: ModelParameters, entries: EntryIndex) -> Self {
        Self {
            params,
            entries,
            regions: RegionConfig::default(),
            fetch: FetchConfig::default(),
        }
    }

    pub fn with_regions(mut self, regions: RegionConfig) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn load(config: &PredictionConfig) -> Result<Self, ConfigError> {
        let resources = &config.resources;
        info!(
            "Loading model '{}' from {:?}",
            resources.model_name, resources.params_path
        );
        let params = ModelParameters::load(&resources.params_path, &resources.model_name)?;
        info!(
            "Model loaded: kernel length {}, {} residue symbols.",
            params.kernel_len(),
            params.alphabet().len()
        );

        info!("Loading entry table from {:?}", resources.entries_path);
        let entries = EntryIndex::load(&resources.entries_path)?;
        info!("Entry table loaded with {} entries.", entries.len());

        Ok(Self::new(params, entries)
            .with_regions(config.regions)
            .with_fetch(config.fetch.clone()))
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    pub fn entries(&self) -> &EntryIndex {
        &self.entries
    }

    pub fn regions(&self) -> &RegionConfig {
        &self.regions
    }

    pub fn fetch(&self) -> &FetchConfig {
        &self.fetch
    }

    /// Interprets a query as an accession, an entry name, or a literal sequence, in that order.
    pub fn resolve(&self, query: &ProteinQuery) -> Result<ResolvedQuery, PredictError> {
        let identifier = query.as_str();
        if let Some(accession) = self.entries.resolve(identifier) {
            debug!("Resolved '{}' to accession {}", identifier, accession);
            return Ok(ResolvedQuery::Accession(accession.to_string()));
        }
        if self.params.alphabet().is_valid(identifier) {
            debug!("Treating '{}' as a literal sequence", identifier);
            return Ok(ResolvedQuery::Sequence(identifier.to_string()));
        }
        Err(PredictError::UnresolvedIdentifier {
            identifier: identifier.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::PredictionConfigBuilder;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn context() -> EngineContext {
        let params = ModelParameters::new(
            HashMap::from([('A', 1.0), ('B', -1.0), ('S', 0.5)]),
            vec![1.0, 1.0],
            0.0,
            1.0,
            0.0,
        )
        .unwrap();
        EngineContext::new(
            params,
            EntryIndex::from_pairs([("ARRB1_HUMAN", "P49407"), ("BAS_HUMAN", "Q00001")]),
        )
    }

    #[test]
    fn context_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineContext>();
    }

    #[test]
    fn names_and_accessions_resolve_to_accessions() {
        let context = context();
        assert_eq!(
            context.resolve(&ProteinQuery::new("arrb1_human")),
            Ok(ResolvedQuery::Accession("P49407".into()))
        );
        assert_eq!(
            context.resolve(&ProteinQuery::new("P49407")),
            Ok(ResolvedQuery::Accession("P49407".into()))
        );
    }

    #[test]
    fn valid_residue_string_is_a_literal_sequence() {
        assert_eq!(
            context().resolve(&ProteinQuery::new("aab sab")),
            Ok(ResolvedQuery::Sequence("AABSAB".into()))
        );
    }

    #[test]
    fn unknown_identifier_is_unresolved() {
        assert_eq!(
            context().resolve(&ProteinQuery::new("ZZZZ99")),
            Err(PredictError::UnresolvedIdentifier {
                identifier: "ZZZZ99".into()
            })
        );
    }

    #[test]
    fn load_reads_both_artifacts() {
        let dir = tempdir().unwrap();
        let params_path = dir.path().join("model_params.toml");
        let entries_path = dir.path().join("uniprot_entries.tsv");
        fs::write(
            &params_path,
            "[model_1]\nkernel_weights = [1.0, 1.0]\nconv_bias = 0.0\n\
             sigmoid_weight = 1.0\nsigmoid_bias = 0.0\n[model_1.aa_dict]\nA = 1.0\nB = -1.0\n",
        )
        .unwrap();
        fs::write(&entries_path, "Entry\tEntry Name\nP49407\tARRB1_HUMAN\n").unwrap();

        let config = PredictionConfigBuilder::new()
            .params_path(params_path)
            .entries_path(entries_path)
            .threshold(0.7)
            .build()
            .unwrap();
        let context = EngineContext::load(&config).unwrap();

        assert_eq!(context.params().kernel_len(), 2);
        assert_eq!(context.entries().len(), 1);
        assert_eq!(context.regions().threshold, 0.7);
    }

    #[test]
    fn load_fails_for_missing_entry_table() {
        let dir = tempdir().unwrap();
        let params_path = dir.path().join("model_params.toml");
        fs::write(
            &params_path,
            "[model_1]\nkernel_weights = [1.0]\nconv_bias = 0.0\n\
             sigmoid_weight = 1.0\nsigmoid_bias = 0.0\n[model_1.aa_dict]\nA = 1.0\n",
        )
        .unwrap();

        let config = PredictionConfigBuilder::new()
            .params_path(params_path)
            .entries_path(dir.path().join("absent.tsv"))
            .build()
            .unwrap();
        assert!(matches!(
            EngineContext::load(&config),
            Err(ConfigError::Entries(_))
        ));
    }
}
