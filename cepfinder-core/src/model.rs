use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CepError, CoreResult};

/// Caller-supplied lookup key. Only presence is checked, never the format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CepError::Validation("postal code is required".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-agnostic address, tagged with the provider it came from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NormalizedAddress {
    pub postal_code: String,
    pub city: String,
    pub state: String,
    pub street: String,
    pub neighborhood: String,
    pub source: String,
}

impl fmt::Display for NormalizedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fonte {} >>> CEP:{}, Cidade:{}-{}, Logradouro:{} - Bairro:{}",
            self.source, self.postal_code, self.city, self.state, self.street, self.neighborhood
        )
    }
}

/// The single result consumed for a request.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RaceOutcome {
    pub address: NormalizedAddress,
    /// Time from race start until the winner's answer was received.
    pub elapsed_ms: u64,
}

impl RaceOutcome {
    pub fn winner(&self) -> &str {
        &self.address.source
    }
}
