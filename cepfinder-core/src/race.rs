//! First-responder race across all registered providers.
//!
//! Contract:
//! - Every provider is started concurrently for the same postal code, each bounded
//!   by its own `timeout()`.
//! - The first successful address wins; the remaining attempts are aborted on the spot.
//! - The whole wait is bounded by the race deadline. If no provider succeeds, the
//!   caller gets `AllProvidersFailed` (every attempt ended) or `DeadlineExceeded`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, field, info, info_span, warn};
use tracing_futures::Instrument;

use crate::config::{Config, RaceCfg};
use crate::error::{CepError, CoreResult, ProviderFailure};
use crate::model::{NormalizedAddress, PostalCode, RaceOutcome};
use crate::provider::AddressProvider;
use crate::provider_factory::ProviderRegistry;
use crate::telemetry::{self, AttemptOutcome, AttemptTrace, RaceSummary};

pub struct RaceCoordinator {
    providers: Vec<Arc<dyn AddressProvider>>,
    deadline: Duration,
}

impl RaceCoordinator {
    pub fn new(providers: Vec<Arc<dyn AddressProvider>>, deadline: Duration) -> Self {
        Self { providers, deadline }
    }

    pub fn from_registry(reg: &ProviderRegistry, cfg: &RaceCfg) -> Self {
        Self::new(reg.all().to_vec(), cfg.deadline())
    }

    pub fn from_config(cfg: &Config) -> CoreResult<Self> {
        let reg = ProviderRegistry::from_config(cfg)?;
        Ok(Self::from_registry(&reg, &cfg.race))
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Validate `raw` and race it. A blank postal code never reaches a provider.
    pub async fn resolve(&self, raw: &str) -> CoreResult<RaceOutcome> {
        let cep = PostalCode::parse(raw)?;
        self.race(cep).await
    }

    pub async fn race(&self, cep: PostalCode) -> CoreResult<RaceOutcome> {
        let span = info_span!("cep.race", cep = %cep, winner = field::Empty);
        self.run(cep, span.clone()).instrument(span).await
    }

    async fn run(&self, cep: PostalCode, span: tracing::Span) -> CoreResult<RaceOutcome> {
        let started = Instant::now();
        let mut scope: JoinSet<CoreResult<NormalizedAddress>> = JoinSet::new();
        let mut slots: HashMap<tokio::task::Id, usize> = HashMap::new();

        for (idx, provider) in self.providers.iter().enumerate() {
            let provider = Arc::clone(provider);
            let cep = cep.clone();
            let attempt = info_span!("provider.lookup", provider = %provider.name(), cep = %cep);
            let handle = scope.spawn(
                async move {
                    let limit = provider.timeout();
                    match tokio::time::timeout(limit, provider.lookup(&cep)).await {
                        Ok(res) => res,
                        Err(_) => Err(CepError::Timeout {
                            provider: provider.name().to_string(),
                            after_ms: limit.as_millis() as u64,
                        }),
                    }
                }
                .instrument(attempt),
            );
            slots.insert(handle.id(), idx);
        }

        let mut pending = vec![true; self.providers.len()];
        let mut failures: Vec<ProviderFailure> = Vec::new();
        let mut failed = 0u32;
        let deadline = Instant::now() + self.deadline;

        let result = loop {
            let next = match tokio::time::timeout_at(deadline, scope.join_next_with_id()).await {
                Ok(next) => next,
                Err(_) => {
                    break Err(CepError::DeadlineExceeded {
                        after_ms: self.deadline.as_millis() as u64,
                        failures,
                    });
                }
            };
            let (id, res) = match next {
                None => break Err(CepError::AllProvidersFailed { failures }),
                Some(Ok((id, res))) => (id, res),
                Some(Err(join_err)) => (
                    join_err.id(),
                    Err(CepError::Other(anyhow::anyhow!("lookup task failed: {join_err}"))),
                ),
            };
            let Some(&idx) = slots.get(&id) else { continue };
            pending[idx] = false;
            let name = self.providers[idx].name();
            let elapsed_ms = started.elapsed().as_millis() as u64;
            match res {
                Ok(address) => {
                    telemetry::emit(
                        AttemptTrace::new(name, cep.as_str(), AttemptOutcome::Won).latency_ms(elapsed_ms),
                    );
                    break Ok(RaceOutcome { address, elapsed_ms });
                }
                Err(e) => {
                    failed += 1;
                    warn!(provider = name, error = %e, "provider dropped out of race");
                    telemetry::emit(
                        AttemptTrace::new(name, cep.as_str(), AttemptOutcome::Failed)
                            .latency_ms(elapsed_ms)
                            .error_kind(e.kind())
                            .error_message(&e.to_string()),
                    );
                    failures.push(ProviderFailure {
                        provider: name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        };

        // Losers must not outlive the request.
        scope.abort_all();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let mut cancelled = 0u32;
        for (idx, still_running) in pending.iter().enumerate() {
            if *still_running {
                cancelled += 1;
                let name = self.providers[idx].name();
                debug!(provider = name, "cancelled after race was decided");
                telemetry::emit(
                    AttemptTrace::new(name, cep.as_str(), AttemptOutcome::Cancelled).latency_ms(elapsed_ms),
                );
            }
        }

        let summary = RaceSummary::new(cep.as_str())
            .counts(self.providers.len() as u32, failed, cancelled)
            .elapsed_ms(elapsed_ms);
        match &result {
            Ok(outcome) => {
                span.record("winner", outcome.winner());
                info!(winner = outcome.winner(), elapsed_ms, "race resolved");
                telemetry::emit_race(summary.winner_opt(Some(outcome.winner())));
            }
            Err(e) => {
                warn!(error = %e, elapsed_ms, "race failed");
                telemetry::emit_race(summary.error_kind_opt(Some(e.kind())));
            }
        }
        result
    }
}
