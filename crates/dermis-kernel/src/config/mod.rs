//! Security Toolkit Configuration
//!
//! Loads [`SecurityConfig`] (rate-limit defaults, CSRF slot naming, sanitizer
//! allow-list and declarative form schemas) from any format the `config`
//! crate understands: YAML, TOML, JSON, INI, RON, JSON5.
//!
//! ## Features
//!
//! - Auto-detection of format from file extension
//! - Environment variable substitution (`${VAR}` and `$VAR` syntax)
//! - Configuration merging from multiple sources
//! - Environment overrides with a prefix (`DERMIS_RATE_LIMIT__MAX_ATTEMPTS=3`)

use config::{Config as Cfg, Environment, File, FileFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::security::NamedPattern;

pub use config::FileFormat as Format;

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Settings
// =============================================================================

/// Top-level toolkit configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Login throttling
    pub rate_limit: RateLimitSettings,
    /// CSRF token slot and header naming
    pub csrf: CsrfSettings,
    /// Default allow-list for `sanitize_html`
    pub sanitizer: SanitizerSettings,
    /// Named form schemas, form name -> field name -> spec
    pub forms: HashMap<String, FormSchemaSpec>,
}

impl SecurityConfig {
    /// Load from a file, detecting the format from its extension.
    pub fn from_file(path: &str) -> ConfigResult<Self> {
        load_config(path)
    }
}

/// Sliding-window limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub max_attempts: u32,
    pub window_ms: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_ms: 60_000,
        }
    }
}

/// Where the CSRF token lives and how it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsrfSettings {
    pub storage_key: String,
    pub header_name: String,
}

impl Default for CsrfSettings {
    fn default() -> Self {
        Self {
            storage_key: "csrf_token".to_string(),
            header_name: "X-CSRF-Token".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerSettings {
    /// Tags `sanitize_html` keeps (attributes are always stripped)
    pub allowed_tags: Vec<String>,
}

/// Declarative form schema: field name -> spec.
pub type FormSchemaSpec = HashMap<String, FieldSpecConfig>;

/// One schema entry as written in a config file: either a pattern name
/// (`email = "email"`) or a rule table (`name = { min_length = 2 }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpecConfig {
    Pattern(NamedPattern),
    Rules(RuleSpec),
}

/// Serializable rule set. Custom predicates can only be attached in code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSpec {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Regex source, compiled when the schema is built
    pub pattern: Option<String>,
}

// =============================================================================
// Loading
// =============================================================================

static ENV_BRACED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

static ENV_SIMPLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)\b").unwrap());

/// Detect configuration format from file extension
///
/// # Supported Extensions
///
/// - YAML: `.yaml`, `.yml`
/// - TOML: `.toml`
/// - JSON: `.json`
/// - INI: `.ini`
/// - RON: `.ron`
/// - JSON5: `.json5`
pub fn detect_format(path: &str) -> ConfigResult<FileFormat> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ConfigError::UnsupportedFormat("No file extension found".to_string()))?;

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        "ini" => Ok(FileFormat::Ini),
        "ron" => Ok(FileFormat::Ron),
        "json5" => Ok(FileFormat::Json5),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Substitute environment variables in a string
///
/// `${VAR_NAME}` is replaced first, then bare `$VAR_NAME`. Unset variables
/// are left as written.
pub fn substitute_env_vars(content: &str) -> String {
    let braced = ENV_BRACED.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });

    ENV_SIMPLE
        .replace_all(&braced, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

fn build<T>(builder: config::ConfigBuilder<config::builder::DefaultState>) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let config = builder
        .build()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::Serialization(e.to_string()))
}

/// Load configuration from a file
///
/// Detects the format from the file extension and performs environment
/// variable substitution on the loaded content.
pub fn load_config<T>(path: &str) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let substituted = substitute_env_vars(&content);

    build(Cfg::builder().add_source(File::from_str(&substituted, format)))
}

/// Load configuration from a string with explicit format
///
/// # Example
///
/// ```rust,ignore
/// use dermis_kernel::config::{from_str, Format, SecurityConfig};
///
/// let toml = r#"
/// [rate_limit]
/// max_attempts = 3
/// "#;
///
/// let config: SecurityConfig = from_str(toml, Format::Toml)?;
/// assert_eq!(config.rate_limit.max_attempts, 3);
/// ```
pub fn from_str<T>(content: &str, format: FileFormat) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let substituted = substitute_env_vars(content);
    build(Cfg::builder().add_source(File::from_str(&substituted, format)))
}

/// Merge multiple configuration sources
///
/// Later sources override earlier ones (defaults -> deployment -> local).
pub fn merge_configs<T>(sources: &[(&str, FileFormat)]) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let mut builder = Cfg::builder();

    for (content, format) in sources {
        let substituted = substitute_env_vars(content);
        builder = builder.add_source(File::from_str(&substituted, *format));
    }

    build(builder)
}

/// Load configuration with environment variable overrides
///
/// Environment variables use the given prefix and double underscores for
/// nesting: with prefix `DERMIS`, `rate_limit.max_attempts` is
/// `DERMIS_RATE_LIMIT__MAX_ATTEMPTS`.
pub fn load_with_env<T>(path: &str, env_prefix: &str) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let substituted = substitute_env_vars(&content);

    build(
        Cfg::builder()
            .add_source(File::from_str(&substituted, format))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
    )
}
