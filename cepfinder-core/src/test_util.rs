use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CepError, CoreResult};
use crate::model::{NormalizedAddress, PostalCode};
use crate::provider::{AddressProvider, DEFAULT_PROVIDER_TIMEOUT};

/// Provider double that answers after a fixed (virtual) delay.
pub struct StubProvider {
    name: String,
    delay: Duration,
    timeout: Duration,
    fail: bool,
    pub calls: Arc<AtomicUsize>,
    pub finished: Arc<AtomicBool>,
}

impl StubProvider {
    pub fn ok(name: &str, delay_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            delay: Duration::from_millis(delay_ms),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn failing(name: &str, delay_ms: u64) -> Self {
        Self { fail: true, ..Self::ok(name, delay_ms) }
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Duration::from_millis(timeout_ms);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

pub fn address_for(cep: &str, source: &str) -> NormalizedAddress {
    NormalizedAddress {
        postal_code: cep.to_string(),
        city: "São Paulo".into(),
        state: "SP".into(),
        street: "Av. Paulista".into(),
        neighborhood: "Bela Vista".into(),
        source: source.to_string(),
    }
}

#[async_trait]
impl AddressProvider for StubProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn lookup(&self, cep: &PostalCode) -> CoreResult<NormalizedAddress> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        if self.fail {
            return Err(CepError::ProviderUnavailable { provider: self.name.clone() });
        }
        Ok(address_for(cep.as_str(), &self.name))
    }
}
