use crate::cli::{ConfigArgs, TuningArgs};
use crate::error::{CliError, Result};
use arrestick::engine::config as core_config;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PARAMS_FILE: &str = "model_params.toml";
const DEFAULT_ENTRIES_FILE: &str = "uniprot_entries.tsv";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialModelConfig {
    #[serde(rename = "params-path")]
    params_path: Option<PathBuf>,
    name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialEntriesConfig {
    #[serde(rename = "table-path")]
    table_path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialRegionConfig {
    threshold: Option<f64>,
    #[serde(rename = "trailing-fill")]
    trailing_fill: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialAlphaFoldConfig {
    enabled: Option<bool>,
    #[serde(rename = "url-template")]
    url_template: Option<String>,
    #[serde(rename = "timeout-secs")]
    timeout_secs: Option<u64>,
    #[serde(rename = "max-retries")]
    max_retries: Option<u32>,
    #[serde(rename = "backoff-ms")]
    backoff_ms: Option<u64>,
}

/// The configuration file as written by the user; every value is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialArrestickConfig {
    model: Option<PartialModelConfig>,
    entries: Option<PartialEntriesConfig>,
    regions: Option<PartialRegionConfig>,
    alphafold: Option<PartialAlphaFoldConfig>,
}

impl PartialArrestickConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        if let Some(base_dir) = path.parent() {
            config.anchor_paths(base_dir);
        }
        Ok(config)
    }

    /// Makes relative paths written in the file relative to the file's directory.
    fn anchor_paths(&mut self, base_dir: &Path) {
        let anchor = |path: &mut Option<PathBuf>| {
            if let Some(p) = path.as_mut().filter(|p| p.is_relative()) {
                *p = base_dir.join(&*p);
            }
        };
        if let Some(model) = self.model.as_mut() {
            anchor(&mut model.params_path);
        }
        if let Some(entries) = self.entries.as_mut() {
            anchor(&mut entries.table_path);
        }
    }

    /// Reads the explicitly given file, else the per-user `config.toml` if it exists,
    /// else starts from an empty configuration.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME)) {
            Some(path) if path.is_file() => {
                info!("Using configuration file {:?}", path);
                Self::from_file(&path)
            }
            _ => {
                debug!("No configuration file found; using defaults.");
                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli(
        mut self,
        args: &ConfigArgs,
        tuning: Option<&TuningArgs>,
    ) -> Result<core_config::PredictionConfig> {
        self.apply_set_values(&args.set_values)?;

        let model = self.model.take().unwrap_or_default();
        let entries = self.entries.take().unwrap_or_default();
        let regions = self.regions.take().unwrap_or_default();
        let alphafold = self.alphafold.take().unwrap_or_default();
        let tuning = tuning.cloned().unwrap_or_default();

        let params_path = Self::resolve_path(
            args.params.as_ref().or(model.params_path.as_ref()),
            DEFAULT_PARAMS_FILE,
            "model.params-path",
        )?;
        let entries_path = Self::resolve_path(
            args.entries.as_ref().or(entries.table_path.as_ref()),
            DEFAULT_ENTRIES_FILE,
            "entries.table-path",
        )?;

        let mut builder = core_config::PredictionConfigBuilder::new()
            .params_path(params_path)
            .entries_path(entries_path);

        if let Some(name) = args.model.clone().or(model.name) {
            builder = builder.model_name(name);
        }
        if let Some(threshold) = tuning.threshold.or(regions.threshold) {
            builder = builder.threshold(threshold);
        }
        if let Some(fill) = tuning.trailing_fill.or(regions.trailing_fill) {
            builder = builder.trailing_fill(fill);
        }

        let enabled = !tuning.no_confidence && alphafold.enabled.unwrap_or(true);
        builder = builder.fetch_confidence(enabled);
        if let Some(template) = alphafold.url_template {
            builder = builder.url_template(template);
        }
        if let Some(secs) = tuning.timeout.or(alphafold.timeout_secs) {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = tuning.retries.or(alphafold.max_retries) {
            builder = builder.max_retries(retries);
        }
        if let Some(ms) = alphafold.backoff_ms {
            builder = builder.initial_backoff(Duration::from_millis(ms));
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn resolve_path(
        configured: Option<&PathBuf>,
        default_file: &str,
        key: &str,
    ) -> Result<PathBuf> {
        if let Some(path) = configured {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(default_file))
            .ok_or_else(|| {
                CliError::Config(format!(
                    "A value for '{}' is required either in the config file or via CLI argument.",
                    key
                ))
            })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "model.params-path" => {
                    self.model.get_or_insert_with(Default::default).params_path =
                        Some(PathBuf::from(value));
                }
                "model.name" => {
                    self.model.get_or_insert_with(Default::default).name = Some(value.to_string());
                }
                "entries.table-path" => {
                    self.entries.get_or_insert_with(Default::default).table_path =
                        Some(PathBuf::from(value));
                }
                "regions.threshold" => {
                    self.regions.get_or_insert_with(Default::default).threshold =
                        Some(parse_value(key, value)?);
                }
                "regions.trailing-fill" => {
                    self.regions.get_or_insert_with(Default::default).trailing_fill =
                        Some(parse_value(key, value)?);
                }
                "alphafold.enabled" => {
                    self.alphafold.get_or_insert_with(Default::default).enabled =
                        Some(parse_value(key, value)?);
                }
                "alphafold.url-template" => {
                    self.alphafold.get_or_insert_with(Default::default).url_template =
                        Some(value.to_string());
                }
                "alphafold.timeout-secs" => {
                    self.alphafold.get_or_insert_with(Default::default).timeout_secs =
                        Some(parse_value(key, value)?);
                }
                "alphafold.max-retries" => {
                    self.alphafold.get_or_insert_with(Default::default).max_retries =
                        Some(parse_value(key, value)?);
                }
                "alphafold.backoff-ms" => {
                    self.alphafold.get_or_insert_with(Default::default).backoff_ms =
                        Some(parse_value(key, value)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "arrestick", "arrestick")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands, PredictArgs};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn predict_args(extra: &[&str]) -> PredictArgs {
        let mut args = vec!["arrestick", "predict", "P49407"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Predict(args) => args,
            _ => panic!("Expected 'predict' subcommand"),
        }
    }

    fn merge(config: PartialArrestickConfig, args: &PredictArgs) -> Result<core_config::PredictionConfig> {
        config.merge_with_cli(&args.config, Some(&args.tuning))
    }

    const FULL_CONFIG: &str = r#"
        [model]
        params-path = "data/model_params.toml"
        name = "model_2"

        [entries]
        table-path = "/srv/uniprot/entries.tsv"

        [regions]
        threshold = 0.6
        trailing-fill = 0.1

        [alphafold]
        url-template = "https://mirror.example.org/AF-{accession}.cif"
        timeout-secs = 10
        max-retries = 2
        backoff-ms = 250
    "#;

    #[test]
    fn file_values_are_applied_with_relative_paths_resolved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("arrestick.toml");
        fs::write(&path, FULL_CONFIG).unwrap();

        let config = merge(
            PartialArrestickConfig::from_file(&path).unwrap(),
            &predict_args(&[]),
        )
        .unwrap();

        assert_eq!(
            config.resources.params_path,
            dir.path().join("data/model_params.toml")
        );
        assert_eq!(config.resources.model_name, "model_2");
        assert_eq!(
            config.resources.entries_path,
            PathBuf::from("/srv/uniprot/entries.tsv")
        );
        assert_eq!(config.regions.threshold, 0.6);
        assert_eq!(config.regions.trailing_fill, 0.1);
        assert!(config.fetch.enabled);
        assert_eq!(config.fetch.timeout, Duration::from_secs(10));
        assert_eq!(config.fetch.retry.max_retries, 2);
        assert_eq!(config.fetch.retry.initial_backoff, Duration::from_millis(250));
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("arrestick.toml");
        fs::write(&path, FULL_CONFIG).unwrap();

        let args = predict_args(&[
            "--threshold",
            "0.9",
            "--timeout",
            "3",
            "--retries",
            "0",
            "--no-confidence",
            "--model",
            "model_1",
        ]);
        let config = merge(PartialArrestickConfig::from_file(&path).unwrap(), &args).unwrap();

        assert_eq!(config.regions.threshold, 0.9);
        assert_eq!(config.fetch.timeout, Duration::from_secs(3));
        assert_eq!(config.fetch.retry.max_retries, 0);
        assert!(!config.fetch.enabled);
        assert_eq!(config.resources.model_name, "model_1");
    }

    #[test]
    fn relative_cli_paths_are_kept_as_given() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("arrestick.toml");
        fs::write(&path, FULL_CONFIG).unwrap();

        let args = predict_args(&[
            "--params",
            "local.toml",
            "-S",
            "entries.table-path=tables/entries.tsv",
        ]);
        let config = merge(PartialArrestickConfig::from_file(&path).unwrap(), &args).unwrap();

        assert_eq!(config.resources.params_path, PathBuf::from("local.toml"));
        assert_eq!(
            config.resources.entries_path,
            PathBuf::from("tables/entries.tsv")
        );
    }

    #[test]
    fn set_values_override_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("arrestick.toml");
        fs::write(&path, FULL_CONFIG).unwrap();

        let args = predict_args(&[
            "-S",
            "regions.threshold=0.75",
            "-S",
            "alphafold.enabled=false",
        ]);
        let config = merge(PartialArrestickConfig::from_file(&path).unwrap(), &args).unwrap();

        assert_eq!(config.regions.threshold, 0.75);
        assert_eq!(config.regions.trailing_fill, 0.1);
        assert!(!config.fetch.enabled);
    }

    #[test]
    fn defaults_apply_without_a_file() {
        let args = predict_args(&["--params", "/opt/params.toml", "--entries", "/opt/entries.tsv"]);
        let config = merge(PartialArrestickConfig::default(), &args).unwrap();

        assert_eq!(config.resources.params_path, PathBuf::from("/opt/params.toml"));
        assert_eq!(config.resources.model_name, "model_1");
        assert_eq!(config.regions.threshold, 0.5);
        assert_eq!(config.fetch.timeout, Duration::from_secs(30));
    }

    #[test]
    fn unknown_keys_in_file_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("arrestick.toml");
        fs::write(&path, "[regions]\ngap-tolerance = 2\n").unwrap();

        let result = PartialArrestickConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn unsupported_set_key_is_rejected() {
        let args = predict_args(&["-S", "regions.gap=1"]);
        let result = merge(PartialArrestickConfig::default(), &args);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("regions.gap")));
    }

    #[test]
    fn malformed_set_value_is_rejected() {
        let args = predict_args(&["-S", "regions.threshold"]);
        assert!(matches!(
            merge(PartialArrestickConfig::default(), &args),
            Err(CliError::Config(_))
        ));

        let args = predict_args(&["-S", "alphafold.max-retries=many"]);
        assert!(matches!(
            merge(PartialArrestickConfig::default(), &args),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn out_of_range_threshold_is_a_config_error() {
        let args = predict_args(&[
            "--params",
            "/opt/params.toml",
            "--entries",
            "/opt/entries.tsv",
            "--threshold",
            "2.0",
        ]);
        let result = merge(PartialArrestickConfig::default(), &args);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("threshold")));
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = PartialArrestickConfig::locate(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
