use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::NormalizedAddress;
use crate::providers::brasilapi::{BRASILAPI, BrasilApiResponse};
use crate::providers::viacep::{VIACEP, ViaCepResponse};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

fn clean_text(s: &str) -> String {
    // Unicode NFC normalization + BOM strip + whitespace collapse + trim
    let mut t = s.nfc().collect::<String>();
    if t.starts_with('\u{FEFF}') {
        t.remove(0);
    }
    WHITESPACE_RUN.replace_all(t.trim(), " ").into_owned()
}

/// A decoded provider body, one variant per supported service.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderPayload {
    BrasilApi(BrasilApiResponse),
    ViaCep(ViaCepResponse),
}

impl ProviderPayload {
    pub fn source(&self) -> &'static str {
        match self {
            Self::BrasilApi(_) => BRASILAPI,
            Self::ViaCep(_) => VIACEP,
        }
    }

    pub fn normalize(self) -> NormalizedAddress {
        let source = self.source().to_string();
        match self {
            Self::BrasilApi(r) => NormalizedAddress {
                postal_code: clean_text(&r.cep),
                city: clean_text(&r.city),
                state: clean_text(&r.state),
                street: clean_text(&r.street),
                neighborhood: clean_text(&r.neighborhood),
                source,
            },
            Self::ViaCep(r) => NormalizedAddress {
                postal_code: clean_text(&r.cep),
                city: clean_text(&r.localidade),
                state: clean_text(&r.uf),
                street: clean_text(&r.logradouro),
                neighborhood: clean_text(&r.bairro),
                source,
            },
        }
    }
}

impl From<BrasilApiResponse> for ProviderPayload {
    fn from(r: BrasilApiResponse) -> Self {
        Self::BrasilApi(r)
    }
}

impl From<ViaCepResponse> for ProviderPayload {
    fn from(r: ViaCepResponse) -> Self {
        Self::ViaCep(r)
    }
}
