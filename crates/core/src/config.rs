use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
    pub policy: PolicyConfig,
    pub advisor: AdvisorConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolicyConfig {
    /// Multiplier on the competitor price that caps the recommendation.
    pub competitor_undercut_factor: f64,
    pub expected_markup_pct: ExpectedRange,
    pub expected_min_margin_pct: ExpectedRange,
}

/// Inclusive band a request percentage is expected to fall in. Values
/// outside it are still priced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRange {
    pub min: f64,
    pub max: f64,
}

impl ExpectedRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdvisorConfig {
    /// Margins strictly below this are "low".
    pub low_margin_below: f64,
    /// Margins at or above this are "strong"; everything between is "moderate".
    pub strong_margin_from: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub competitor_undercut_factor: Option<f64>,
    pub low_margin_below: Option<f64>,
    pub strong_margin_from: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            competitor_undercut_factor: 0.95,
            expected_markup_pct: ExpectedRange { min: 10.0, max: 50.0 },
            expected_min_margin_pct: ExpectedRange { min: 5.0, max: 30.0 },
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self { low_margin_below: 10.0, strong_margin_from: 20.0 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("pricepilot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(policy) = patch.policy {
            if let Some(factor) = policy.competitor_undercut_factor {
                self.policy.competitor_undercut_factor = factor;
            }
            if let Some(range) = policy.expected_markup_pct {
                self.policy.expected_markup_pct = range;
            }
            if let Some(range) = policy.expected_min_margin_pct {
                self.policy.expected_min_margin_pct = range;
            }
        }

        if let Some(advisor) = patch.advisor {
            if let Some(low_margin_below) = advisor.low_margin_below {
                self.advisor.low_margin_below = low_margin_below;
            }
            if let Some(strong_margin_from) = advisor.strong_margin_from {
                self.advisor.strong_margin_from = strong_margin_from;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PRICEPILOT_POLICY_COMPETITOR_UNDERCUT_FACTOR") {
            self.policy.competitor_undercut_factor =
                parse_f64("PRICEPILOT_POLICY_COMPETITOR_UNDERCUT_FACTOR", &value)?;
        }
        if let Some(value) = read_env("PRICEPILOT_ADVISOR_LOW_MARGIN_BELOW") {
            self.advisor.low_margin_below =
                parse_f64("PRICEPILOT_ADVISOR_LOW_MARGIN_BELOW", &value)?;
        }
        if let Some(value) = read_env("PRICEPILOT_ADVISOR_STRONG_MARGIN_FROM") {
            self.advisor.strong_margin_from =
                parse_f64("PRICEPILOT_ADVISOR_STRONG_MARGIN_FROM", &value)?;
        }

        let log_level =
            read_env("PRICEPILOT_LOGGING_LEVEL").or_else(|| read_env("PRICEPILOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PRICEPILOT_LOGGING_FORMAT").or_else(|| read_env("PRICEPILOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(factor) = overrides.competitor_undercut_factor {
            self.policy.competitor_undercut_factor = factor;
        }
        if let Some(low_margin_below) = overrides.low_margin_below {
            self.advisor.low_margin_below = low_margin_below;
        }
        if let Some(strong_margin_from) = overrides.strong_margin_from {
            self.advisor.strong_margin_from = strong_margin_from;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_policy(&self.policy)?;
        validate_advisor(&self.advisor)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("pricepilot.toml"), PathBuf::from("config/pricepilot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_policy(policy: &PolicyConfig) -> Result<(), ConfigError> {
    let factor = policy.competitor_undercut_factor;
    if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
        return Err(ConfigError::Validation(
            "policy.competitor_undercut_factor must be in range (0, 1]".to_string(),
        ));
    }

    validate_range("policy.expected_markup_pct", &policy.expected_markup_pct)?;
    validate_range("policy.expected_min_margin_pct", &policy.expected_min_margin_pct)?;
    Ok(())
}

fn validate_range(key: &str, range: &ExpectedRange) -> Result<(), ConfigError> {
    if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
        return Err(ConfigError::Validation(format!(
            "{key} must have finite bounds with min <= max"
        )));
    }
    Ok(())
}

fn validate_advisor(advisor: &AdvisorConfig) -> Result<(), ConfigError> {
    if !advisor.low_margin_below.is_finite() || !advisor.strong_margin_from.is_finite() {
        return Err(ConfigError::Validation(
            "advisor margin thresholds must be finite numbers".to_string(),
        ));
    }

    if advisor.low_margin_below >= advisor.strong_margin_from {
        return Err(ConfigError::Validation(
            "advisor.low_margin_below must be less than advisor.strong_margin_from".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    policy: Option<PolicyPatch>,
    advisor: Option<AdvisorPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PolicyPatch {
    competitor_undercut_factor: Option<f64>,
    expected_markup_pct: Option<ExpectedRange>,
    expected_min_margin_pct: Option<ExpectedRange>,
}

#[derive(Debug, Default, Deserialize)]
struct AdvisorPatch {
    low_margin_below: Option<f64>,
    strong_margin_from: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
