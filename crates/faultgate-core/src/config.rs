//! Configuration module for faultgate.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//! Also defines [`ReportingInit`], the bundle handed to the gateway at startup.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{ContextSnapshot, FormFactor, ThrottlingMethod, ThrottlingSettings};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for faultgate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

/// Error-reporting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// User opt-in. Nothing is ever sent while this is `false`.
    pub enable_error_reporting: bool,
    /// Distribution channel reported with every event, e.g. `cli` or `node`.
    pub channel: String,
    /// Error-message patterns that are only reported a fraction of the time.
    pub sampled_errors: Vec<SampledErrorConfig>,
    /// Options forwarded verbatim to the reporting backend.
    pub backend: BackendOptions,
}

/// One entry of the sampled-error table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledErrorConfig {
    /// Regular expression matched against the error message.
    pub pattern: String,
    /// Fraction of matching errors to report, in `[0, 1]`.
    pub rate: f64,
}

/// Backend client options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendOptions {
    /// Deployment environment, e.g. `production`.
    pub environment: Option<String>,
    /// Release identifier; defaults to the package version when unset.
    pub release: Option<String>,
    /// Host name reported with events.
    pub server_name: Option<String>,
    /// Maximum number of breadcrumbs kept per scope.
    pub max_breadcrumbs: usize,
    /// Enables the backend SDK's own debug output.
    pub debug: bool,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/faultgate/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("faultgate")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable_error_reporting: false,
            channel: "cli".to_string(),
            sampled_errors: Vec::new(),
            backend: BackendOptions::default(),
        }
    }
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            environment: Some("production".to_string()),
            release: None,
            server_name: None,
            max_breadcrumbs: 100,
            debug: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"telemetry.sampled_errors[0].rate"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- telemetry ---
        if self.telemetry.channel.trim().is_empty() {
            errors.push(ValidationError {
                field: "telemetry.channel".into(),
                message: "must not be empty".into(),
            });
        }
        for (i, sampled) in self.telemetry.sampled_errors.iter().enumerate() {
            if !(0.0..=1.0).contains(&sampled.rate) {
                errors.push(ValidationError {
                    field: format!("telemetry.sampled_errors[{i}].rate"),
                    message: format!("must be in range 0..=1, got {}", sampled.rate),
                });
            }
            if let Err(e) = Regex::new(&sampled.pattern) {
                errors.push(ValidationError {
                    field: format!("telemetry.sampled_errors[{i}].pattern"),
                    message: format!("invalid regular expression: {e}"),
                });
            }
        }
        if self.telemetry.backend.max_breadcrumbs == 0 {
            errors.push(ValidationError {
                field: "telemetry.backend.max_breadcrumbs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use faultgate_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .enable_error_reporting(true)
///     .channel("node")
///     .sampled_error("Navigation timed out", 0.01)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- telemetry ---

    pub fn enable_error_reporting(mut self, enabled: bool) -> Self {
        self.config.telemetry.enable_error_reporting = enabled;
        self
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.config.telemetry.channel = channel.into();
        self
    }

    pub fn sampled_error(mut self, pattern: impl Into<String>, rate: f64) -> Self {
        self.config.telemetry.sampled_errors.push(SampledErrorConfig {
            pattern: pattern.into(),
            rate,
        });
        self
    }

    pub fn backend_environment(mut self, environment: impl Into<String>) -> Self {
        self.config.telemetry.backend.environment = Some(environment.into());
        self
    }

    pub fn backend_release(mut self, release: impl Into<String>) -> Self {
        self.config.telemetry.backend.release = Some(release.into());
        self
    }

    pub fn backend_max_breadcrumbs(mut self, n: usize) -> Self {
        self.config.telemetry.backend.max_breadcrumbs = n;
        self
    }

    pub fn backend_debug(mut self, debug: bool) -> Self {
        self.config.telemetry.backend.debug = debug;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_json(mut self, json: bool) -> Self {
        self.config.logging.json = json;
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// ReportingInit
// ---------------------------------------------------------------------------

/// Everything the gateway needs at initialization time.
///
/// Combines the persistent [`TelemetryConfig`] with per-run settings
/// (target URL, emulation, throttling) supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportingInit {
    pub enable_error_reporting: bool,
    pub url: String,
    pub channel: String,
    pub form_factor: FormFactor,
    pub throttling_method: ThrottlingMethod,
    pub throttling: ThrottlingSettings,
    pub sampled_errors: Vec<SampledErrorConfig>,
    pub backend: BackendOptions,
}

impl ReportingInit {
    /// Starts from the persistent settings for a run against `url`.
    pub fn from_config(config: &TelemetryConfig, url: impl Into<String>) -> Self {
        Self {
            enable_error_reporting: config.enable_error_reporting,
            url: url.into(),
            channel: config.channel.clone(),
            form_factor: FormFactor::default(),
            throttling_method: ThrottlingMethod::default(),
            throttling: ThrottlingSettings::default(),
            sampled_errors: config.sampled_errors.clone(),
            backend: config.backend.clone(),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enable_error_reporting = enabled;
        self
    }

    pub fn with_form_factor(mut self, form_factor: FormFactor) -> Self {
        self.form_factor = form_factor;
        self
    }

    pub fn with_throttling_method(mut self, method: ThrottlingMethod) -> Self {
        self.throttling_method = method;
        self
    }

    pub fn with_throttling(mut self, throttling: ThrottlingSettings) -> Self {
        self.throttling = throttling;
        self
    }

    /// The context snapshot described by this bundle.
    pub fn context(&self) -> ContextSnapshot {
        ContextSnapshot {
            channel: self.channel.clone(),
            url: self.url.clone(),
            form_factor: self.form_factor,
            throttling_method: self.throttling_method,
            throttling: self.throttling,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
