use super::error::ConfigError;
use crate::core::io::alphafold::{ACCESSION_PLACEHOLDER, AlphaFoldClient, DEFAULT_URL_TEMPLATE};
use crate::core::scoring::convolution::DEFAULT_TRAILING_FILL;
use crate::core::scoring::params::DEFAULT_MODEL_NAME;
use crate::core::scoring::regions::DEFAULT_THRESHOLD;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceConfig {
    pub params_path: PathBuf,
    pub model_name: String,
    pub entries_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionConfig {
    pub threshold: f64,
    pub trailing_fill: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            trailing_fill: DEFAULT_TRAILING_FILL,
        }
    }
}

/// Bounded exponential backoff for transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        }
    }

    /// Delay before retry number `retry` (1-based): the initial backoff doubled each time.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub enabled: bool,
    pub url_template: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::none(),
        }
    }
}

impl FetchConfig {
    pub fn client(&self) -> Result<AlphaFoldClient, ConfigError> {
        Ok(AlphaFoldClient::new(self.url_template.clone(), self.timeout)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionConfig {
    pub resources: ResourceConfig,
    pub regions: RegionConfig,
    pub fetch: FetchConfig,
}

#[derive(Default)]
pub struct PredictionConfigBuilder {
    params_path: Option<PathBuf>,
    model_name: Option<String>,
    entries_path: Option<PathBuf>,
    threshold: Option<f64>,
    trailing_fill: Option<f64>,
    fetch_confidence: Option<bool>,
    url_template: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    initial_backoff: Option<Duration>,
}

impl PredictionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params_path(mut self, path: PathBuf) -> Self {
        self.params_path = Some(path);
        self
    }
    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }
    pub fn entries_path(mut self, path: PathBuf) -> Self {
        self.entries_path = Some(path);
        self
    }
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
    pub fn trailing_fill(mut self, fill: f64) -> Self {
        self.trailing_fill = Some(fill);
        self
    }
    pub fn fetch_confidence(mut self, enabled: bool) -> Self {
        self.fetch_confidence = Some(enabled);
        self
    }
    pub fn url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = Some(template.into());
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
    pub fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = Some(backoff);
        self
    }

    pub fn build(self) -> Result<PredictionConfig, ConfigError> {
        let resources = ResourceConfig {
            params_path: self
                .params_path
                .ok_or(ConfigError::MissingParameter("params_path"))?,
            model_name: self
                .model_name
                .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            entries_path: self
                .entries_path
                .ok_or(ConfigError::MissingParameter("entries_path"))?,
        };

        let regions = RegionConfig {
            threshold: unit_interval("threshold", self.threshold.unwrap_or(DEFAULT_THRESHOLD))?,
            trailing_fill: unit_interval(
                "trailing_fill",
                self.trailing_fill.unwrap_or(DEFAULT_TRAILING_FILL),
            )?,
        };

        let url_template = self
            .url_template
            .unwrap_or_else(|| DEFAULT_URL_TEMPLATE.to_string());
        if !url_template.contains(ACCESSION_PLACEHOLDER) {
            return Err(ConfigError::InvalidParameter {
                name: "url_template",
                reason: format!("must contain the '{}' placeholder", ACCESSION_PLACEHOLDER),
            });
        }
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::InvalidParameter {
                name: "timeout",
                reason: "must be greater than zero".to_string(),
            });
        }

        let fetch = FetchConfig {
            enabled: self.fetch_confidence.unwrap_or(true),
            url_template,
            timeout,
            retry: RetryPolicy {
                max_retries: self.max_retries.unwrap_or(0),
                initial_backoff: self.initial_backoff.unwrap_or(DEFAULT_INITIAL_BACKOFF),
            },
        };

        Ok(PredictionConfig {
            resources,
            regions,
            fetch,
        })
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must lie in [0, 1], got {}", value),
        })
    }
}
