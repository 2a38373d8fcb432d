use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

pub const BRASILAPI_BASE: &str = "https://brasilapi.com.br";
pub const VIACEP_BASE: &str = "http://viacep.com.br";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Providers {
    #[serde(default = "default_brasilapi")]
    pub brasilapi: ProviderCfg,
    #[serde(default = "default_viacep")]
    pub viacep: ProviderCfg,
}

impl Default for Providers {
    fn default() -> Self {
        Self {
            brasilapi: default_brasilapi(),
            viacep: default_viacep(),
        }
    }
}

fn default_brasilapi() -> ProviderCfg {
    ProviderCfg::with_base(BRASILAPI_BASE)
}
fn default_viacep() -> ProviderCfg {
    ProviderCfg::with_base(VIACEP_BASE)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProviderCfg {
    /// Scheme + host (and optional path prefix) the endpoint template is appended to.
    pub base_url: String,
    /// Hard limit on one attempt, in milliseconds (default 1000ms)
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ProviderCfg {
    pub fn with_base(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: default_provider_timeout_ms(),
            enabled: true,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_provider_timeout_ms() -> u64 {
    1_000
}
fn default_enabled() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HttpCfg {
    /// TCP connect timeout in milliseconds (default 1000ms)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Optional per-host idle connection pool cap (None = reqwest default)
    #[serde(default)]
    pub pool_max_idle_per_host: Option<usize>,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            pool_max_idle_per_host: None,
        }
    }
}

fn default_connect_timeout_ms() -> u64 {
    1_000
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RaceCfg {
    /// Overall wait for a winner, in milliseconds (default 2000ms)
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

impl Default for RaceCfg {
    fn default() -> Self {
        Self {
            deadline_ms: default_deadline_ms(),
        }
    }
}

impl RaceCfg {
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

fn default_deadline_ms() -> u64 {
    2_000
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerCfg {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerCfg {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub providers: Providers,
    #[serde(default)]
    pub http: HttpCfg,
    #[serde(default)]
    pub race: RaceCfg,
    #[serde(default)]
    pub server: ServerCfg,
}

impl Config {
    /// Load a Config from a file path (JSON or TOML by extension). If the
    /// extension is missing or unrecognized, try JSON first, then TOML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> crate::error::CoreResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(crate::error::CepError::from)?;
        let s =
            std::str::from_utf8(&bytes).map_err(|e| crate::error::CepError::Other(e.into()))?;
        let cfg: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str::<Self>(s)
                .map_err(|e| crate::error::CepError::Other(e.into()))?,
            Some("toml") => toml::from_str::<Self>(s)
                .map_err(|e| crate::error::CepError::Other(e.into()))?,
            _ => serde_json::from_str::<Self>(s)
                .map_err(|e| crate::error::CepError::Other(e.into()))
                .or_else(|_| {
                    toml::from_str::<Self>(s).map_err(|e| crate::error::CepError::Other(e.into()))
                })?,
        };
        Ok(cfg)
    }
}
