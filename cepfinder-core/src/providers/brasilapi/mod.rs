use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ProviderCfg;
use crate::error::CoreResult;
use crate::http_client::{HttpClient, endpoint_url};
use crate::model::{NormalizedAddress, PostalCode};
use crate::normalizer::ProviderPayload;
use crate::provider::AddressProvider;
use crate::providers::null_as_empty;

pub const BRASILAPI: &str = "BrasilAPI";

#[derive(Debug, Clone)]
pub struct BrasilApi {
    http: HttpClient,
    base: String,
    name: String, // "BrasilAPI"
    timeout: Duration,
}

impl BrasilApi {
    pub fn new(http: HttpClient, base: String, timeout: Duration) -> Self {
        Self {
            http,
            base,
            name: BRASILAPI.into(),
            timeout,
        }
    }

    pub fn from_config(http: HttpClient, cfg: &ProviderCfg) -> Self {
        Self::new(http, cfg.base_url.clone(), cfg.timeout())
    }

    #[cfg(test)]
    pub fn new_for_tests(server_base: &str) -> Self {
        BrasilApi::new(
            HttpClient::new_default().unwrap(),
            server_base.to_string(),
            crate::provider::DEFAULT_PROVIDER_TIMEOUT,
        )
    }
}

// ---- Wire struct: GET /api/cep/v1/{cep} ----
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrasilApiResponse {
    pub cep: String,
    pub state: String,
    pub city: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub neighborhood: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub street: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub service: String,
}

#[async_trait]
impl AddressProvider for BrasilApi {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn lookup(&self, cep: &PostalCode) -> CoreResult<NormalizedAddress> {
        let url = endpoint_url(&self.base, &["api", "cep", "v1", cep.as_str()])?;
        let (resp, latency_ms) = self
            .http
            .get_json::<BrasilApiResponse>(&self.name, url, self.timeout)
            .await?;
        debug!(provider = %self.name, upstream = %resp.service, latency_ms, "brasilapi answered");
        Ok(ProviderPayload::from(resp).normalize())
    }
}
