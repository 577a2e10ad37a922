//! Configuration for Markflow

use crate::types::{BrandColors, ClientId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Local template cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Text generation API configuration
    pub generation: GenerationConfig,

    /// Optional image generation API configuration
    pub images: Option<ImageApiConfig>,

    /// Page analyzer configuration
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-client brand profiles, keyed by client id.
    ///
    /// Replaces hard-coded per-tenant branding text in prompts; clients
    /// without an entry use `BrandProfile::default()`.
    #[serde(default)]
    pub brands: HashMap<ClientId, BrandProfile>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL (PostgreSQL)
    pub url: String,

    /// Maximum connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

/// Local template cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the per-client template cache files
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("/var/lib/markflow/cache")
}

/// Text generation API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of the text generation API
    pub api_url: String,

    /// API key, sent as a bearer token
    pub api_key: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_generation_timeout() -> u64 {
    60
}

/// Image generation API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageApiConfig {
    /// Base URL of the image generation API
    pub api_url: String,

    /// API key, sent as a bearer token
    pub api_key: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

/// Page analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// User-Agent sent with analyzer requests; sites that block empty or
    /// default agents would otherwise return 403
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_analyzer_timeout")]
    pub timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_analyzer_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_analyzer_timeout() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Per-client brand profile injected into prompts and layouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandProfile {
    /// Brand colors applied by the styling post-processor
    #[serde(default)]
    pub colors: BrandColors,

    /// Logo URL placed in the email header slot
    #[serde(default)]
    pub logo_url: String,

    /// Postal address rendered in the footer contact block
    #[serde(default)]
    pub address: String,

    /// Contact phone rendered in the footer contact block
    #[serde(default)]
    pub phone: String,

    /// Public website URL
    #[serde(default)]
    pub website: String,

    /// Name used for the signature placement
    #[serde(default = "default_signature")]
    pub signature: String,
}

impl Default for BrandProfile {
    fn default() -> Self {
        Self {
            colors: BrandColors::default(),
            logo_url: String::new(),
            address: String::new(),
            phone: String::new(),
            website: String::new(),
            signature: default_signature(),
        }
    }
}

fn default_signature() -> String {
    "The Team".to_string()
}

impl Config {
    /// Look up the brand profile for a client, falling back to the
    /// `default` entry and then to built-in defaults
    pub fn brand_for(&self, client_id: &str) -> BrandProfile {
        self.brands
            .get(client_id)
            .or_else(|| self.brands.get("default"))
            .cloned()
            .unwrap_or_default()
    }

    /// Load configuration from file
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> crate::Result<Self> {
        let paths = [
            PathBuf::from("./config.toml"),
            PathBuf::from("/etc/markflow/config.toml"),
        ];

        for path in paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(crate::Error::Config(
            "No configuration file found".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_sections() {
        let server = ServerConfig::default();
        assert_eq!(server.bind_address, "0.0.0.0");
        assert_eq!(server.port, 8080);

        let analyzer = AnalyzerConfig::default();
        assert!(analyzer.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(analyzer.timeout_secs, 30);
    }

    #[test]
    fn test_parse_config() {
        let toml = r##"
[server]
port = 9090

[database]
url = "postgres://localhost/markflow"

[generation]
api_url = "https://llm.example.com"
api_key = "test-key"

[brands.acme]
logo_url = "https://acme.example.com/logo.png"
signature = "The Acme Team"

[brands.acme.colors]
primary = "#112233"
secondary = "#445566"
"##;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.generation.model, "gemini-2.0-flash");

        let acme = config.brand_for("acme");
        assert_eq!(acme.colors.primary, "#112233");
        assert_eq!(acme.signature, "The Acme Team");

        // Unknown clients fall back to the default profile
        let other = config.brand_for("unknown");
        assert_eq!(other.colors, BrandColors::default());
    }
}
