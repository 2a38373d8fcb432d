use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ProviderCfg;
use crate::error::{CepError, CoreResult};
use crate::http_client::{HttpClient, endpoint_url};
use crate::model::{NormalizedAddress, PostalCode};
use crate::normalizer::ProviderPayload;
use crate::provider::AddressProvider;
use crate::providers::null_as_empty;

pub const VIACEP: &str = "ViaCEP";

#[derive(Debug, Clone)]
pub struct ViaCep {
    http: HttpClient,
    base: String,
    name: String, // "ViaCEP"
    timeout: Duration,
}

impl ViaCep {
    pub fn new(http: HttpClient, base: String, timeout: Duration) -> Self {
        Self {
            http,
            base,
            name: VIACEP.into(),
            timeout,
        }
    }

    pub fn from_config(http: HttpClient, cfg: &ProviderCfg) -> Self {
        Self::new(http, cfg.base_url.clone(), cfg.timeout())
    }

    #[cfg(test)]
    pub fn new_for_tests(server_base: &str) -> Self {
        ViaCep::new(
            HttpClient::new_default().unwrap(),
            server_base.to_string(),
            crate::provider::DEFAULT_PROVIDER_TIMEOUT,
        )
    }
}

// ---- Wire struct: GET /ws/{cep}/json/ ----
// Unknown CEPs come back as HTTP 200 with only `{"erro": true}`, so every
// address field has to tolerate being absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ViaCepResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cep: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub logradouro: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub complemento: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bairro: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub localidade: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub uf: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ddd: String,
    /// `true` (older API versions send the string `"true"`) when the CEP is unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    pub fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

#[async_trait]
impl AddressProvider for ViaCep {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn lookup(&self, cep: &PostalCode) -> CoreResult<NormalizedAddress> {
        let url = endpoint_url(&self.base, &["ws", cep.as_str(), "json", ""])?;
        let (resp, latency_ms) = self
            .http
            .get_json::<ViaCepResponse>(&self.name, url, self.timeout)
            .await?;
        if resp.is_error() {
            return Err(CepError::NotFound {
                provider: self.name.clone(),
            });
        }
        debug!(provider = %self.name, ddd = %resp.ddd, latency_ms, "viacep answered");
        Ok(ProviderPayload::from(resp).normalize())
    }
}
