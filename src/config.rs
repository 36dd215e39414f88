use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_site_origin")]
    pub site_origin: String,
    #[serde(default = "default_member_directory_url")]
    pub member_directory_url: String,
    #[serde(default = "default_fips_directory_url")]
    pub fips_directory_url: String,
    #[serde(default = "default_geojson_url")]
    pub geojson_url: String,
    #[serde(default = "default_fips_cell_bgcolor")]
    pub fips_cell_bgcolor: String,
    #[serde(default = "default_state_prefix")]
    pub state_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Zero leaves reqwest's own default in place.
    #[serde(default)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScrapeConfig {
    #[serde(default)]
    pub on_error: FailurePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    Abort,
    #[default]
    Skip,
}

impl Display for FailurePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown failure policy: {0} (expected abort or skip)")]
pub struct FailurePolicyParseError(pub String);

impl FromStr for FailurePolicy {
    type Err = FailurePolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            _ => Err(FailurePolicyParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub on_error: Option<FailurePolicy>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/prism-map/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(policy) = overrides.on_error {
            self.scrape.on_error = policy;
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r##"[sources]
site_origin = "https://www.prismrisk.gov"
member_directory_url = "https://www.prismrisk.gov/members/county/"
fips_directory_url = "https://www.weather.gov/hnx/cafips"
geojson_url = "https://raw.githubusercontent.com/plotly/datasets/master/geojson-counties-fips.json"
# Background colour marking the county/code cells on the FIPS page
fips_cell_bgcolor = "#9DACD7"
state_prefix = "06"

[http]
user_agent = "prism-map/0.1"
# 0 keeps the HTTP client's default
timeout_secs = 0

[scrape]
# "abort" stops on the first county that fails, "skip" reports it and moves on
on_error = "skip"

[server]
host = "127.0.0.1"
port = 8050
"##;
        template.to_string()
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            site_origin: default_site_origin(),
            member_directory_url: default_member_directory_url(),
            fips_directory_url: default_fips_directory_url(),
            geojson_url: default_geojson_url(),
            fips_cell_bgcolor: default_fips_cell_bgcolor(),
            state_prefix: default_state_prefix(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: 0,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_site_origin() -> String {
    "https://www.prismrisk.gov".to_string()
}

fn default_member_directory_url() -> String {
    "https://www.prismrisk.gov/members/county/".to_string()
}

fn default_fips_directory_url() -> String {
    "https://www.weather.gov/hnx/cafips".to_string()
}

fn default_geojson_url() -> String {
    "https://raw.githubusercontent.com/plotly/datasets/master/geojson-counties-fips.json"
        .to_string()
}

fn default_fips_cell_bgcolor() -> String {
    "#9DACD7".to_string()
}

fn default_state_prefix() -> String {
    "06".to_string()
}

fn default_user_agent() -> String {
    "prism-map/0.1".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8050
}
