use std::time::Duration;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::model::{NormalizedAddress, PostalCode};

/// Default hard limit on a single provider attempt (connect + read).
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(1);

/// One external address-lookup service.
///
/// Implementations perform exactly one attempt per call: no retries, no panics.
/// Every failure comes back as a `CepError` so the race coordinator can drop the
/// provider from the race.
#[async_trait]
pub trait AddressProvider: Send + Sync {
    /// Source tag carried by every address this provider produces.
    fn name(&self) -> &str;

    /// Upper bound the coordinator enforces on `lookup`.
    fn timeout(&self) -> Duration {
        DEFAULT_PROVIDER_TIMEOUT
    }

    async fn lookup(&self, cep: &PostalCode) -> CoreResult<NormalizedAddress>;
}
