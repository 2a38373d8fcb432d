use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::HttpCfg;
use crate::error::{CepError, CoreResult};

/// Thin wrapper around reqwest::Client with defaults and helpers.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    user_agent: String,
}

impl HttpClient {
    pub fn new(cfg: &HttpCfg) -> CoreResult<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms));
        if let Some(n) = cfg.pool_max_idle_per_host {
            builder = builder.pool_max_idle_per_host(n);
        }
        let inner = builder
            .build()
            .map_err(|e| CepError::Other(anyhow::anyhow!("http client build failed: {e}")))?;
        Ok(Self {
            inner,
            user_agent: "cepfinder/0.1".to_string(),
        })
    }

    pub fn new_default() -> CoreResult<Self> {
        Self::new(&HttpCfg::default())
    }

    /// GET `url` and decode the JSON body. `timeout` covers the whole exchange,
    /// body included. Returns the decoded body and the latency in milliseconds.
    pub async fn get_json<R: DeserializeOwned>(
        &self,
        provider: &str,
        url: Url,
        timeout: Duration,
    ) -> CoreResult<(R, u32)> {
        let start = Instant::now();
        let resp = self
            .inner
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(provider, timeout, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(map_http_error(provider, status, &text));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| map_transport_error(provider, timeout, e))?;
        let latency = start.elapsed().as_millis() as u32;

        let parsed = serde_json::from_slice::<R>(&bytes).map_err(|e| CepError::ProviderError {
            provider: provider.to_string(),
            code: status.as_u16().to_string(),
            message: format!("json decode error: {e}"),
        })?;
        Ok((parsed, latency))
    }
}

/// Append path segments to `base`, percent-encoding each one.
/// A trailing empty segment yields a trailing slash.
pub fn endpoint_url(base: &str, segments: &[&str]) -> CoreResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| CepError::Validation(format!("invalid base url '{base}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| CepError::Validation(format!("base url '{base}' cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn map_transport_error(provider: &str, timeout: Duration, e: reqwest::Error) -> CepError {
    if e.is_timeout() {
        CepError::Timeout {
            provider: provider.to_string(),
            after_ms: timeout.as_millis() as u64,
        }
    } else {
        CepError::ProviderUnavailable {
            provider: provider.to_string(),
        }
    }
}

fn map_http_error(provider: &str, status: StatusCode, body: &str) -> CepError {
    match status {
        StatusCode::NOT_FOUND => CepError::NotFound {
            provider: provider.to_string(),
        },
        s if s.is_server_error() => CepError::ProviderUnavailable {
            provider: provider.to_string(),
        },
        s => CepError::ProviderError {
            provider: provider.to_string(),
            code: s.as_u16().to_string(),
            message: truncate(body, 300),
        },
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        let mut t = s[..end].to_string();
        t.push_str("...");
        t
    } else {
        s.to_string()
    }
}
