use std::sync::Arc;

use crate::config::Config;
use crate::error::CoreResult;
use crate::http_client::HttpClient;
use crate::provider::AddressProvider;
use crate::providers::brasilapi::{BRASILAPI, BrasilApi};
use crate::providers::viacep::{VIACEP, ViaCep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    BrasilApi,
    ViaCep,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::BrasilApi, ProviderKind::ViaCep];

    pub fn name(self) -> &'static str {
        match self {
            Self::BrasilApi => BRASILAPI,
            Self::ViaCep => VIACEP,
        }
    }
}

/// The set of providers every race fans out to, in registration order.
/// All concrete providers share one HTTP connection pool.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn AddressProvider>>,
}

impl ProviderRegistry {
    /// Build a registry from configuration, skipping disabled providers.
    pub fn from_config(cfg: &Config) -> CoreResult<Self> {
        let http = HttpClient::new(&cfg.http)?;
        let mut providers: Vec<Arc<dyn AddressProvider>> = Vec::new();
        for kind in ProviderKind::ALL {
            match kind {
                ProviderKind::BrasilApi if cfg.providers.brasilapi.enabled => {
                    providers.push(Arc::new(BrasilApi::from_config(
                        http.clone(),
                        &cfg.providers.brasilapi,
                    )));
                }
                ProviderKind::ViaCep if cfg.providers.viacep.enabled => {
                    providers.push(Arc::new(ViaCep::from_config(
                        http.clone(),
                        &cfg.providers.viacep,
                    )));
                }
                _ => tracing::info!(provider = kind.name(), "provider disabled by config"),
            }
        }
        let reg = Self { providers };
        tracing::debug!(providers = ?reg.names(), "provider registry built");
        Ok(reg)
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn all(&self) -> &[Arc<dyn AddressProvider>] {
        &self.providers
    }
}
