use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::{CepError, CoreResult, ProviderFailure};
use crate::model::NormalizedAddress;
use crate::race::RaceCoordinator;

#[derive(Clone)]
struct AppState {
    race: Arc<RaceCoordinator>,
}

/// Body of a successful lookup.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    /// Descriptive one-line form, e.g. `Fonte ViaCEP >>> CEP:...`.
    pub result: String,
    pub address: NormalizedAddress,
    pub elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<ProviderFailure>,
}

pub fn router(race: Arc<RaceCoordinator>) -> Router {
    Router::new()
        .route("/ceps/:cep", get(lookup))
        .route("/ceps", get(missing_cep))
        .route("/ceps/", get(missing_cep))
        .with_state(AppState { race })
}

/// Bind `addr` and serve until the listener fails.
pub async fn serve(race: Arc<RaceCoordinator>, addr: &str) -> CoreResult<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(race)).await?;
    Ok(())
}

async fn lookup(State(state): State<AppState>, Path(cep): Path<String>) -> Response {
    info!(cep = %cep, "request received");
    match state.race.resolve(&cep).await {
        Ok(outcome) => {
            info!(winner = outcome.winner(), "request processed");
            let body = LookupResponse {
                result: outcome.address.to_string(),
                address: outcome.address,
                elapsed_ms: outcome.elapsed_ms,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn missing_cep() -> Response {
    error_response(CepError::Validation("postal code is required".into()))
}

fn error_response(err: CepError) -> Response {
    let status = match &err {
        CepError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::GATEWAY_TIMEOUT,
    };
    let kind = err.kind();
    let error = err.to_string();
    let failures = match err {
        CepError::AllProvidersFailed { failures } | CepError::DeadlineExceeded { failures, .. } => failures,
        _ => Vec::new(),
    };
    (status, Json(ErrorBody { error, kind, failures })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::AddressProvider;
    use crate::test_util::StubProvider;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(providers: Vec<Arc<dyn AddressProvider>>) -> Router {
        router(Arc::new(RaceCoordinator::new(providers, Duration::from_secs(2))))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_returns_winner() {
        let fast: Arc<dyn AddressProvider> = Arc::new(StubProvider::ok("BrasilAPI", 10));
        let slow: Arc<dyn AddressProvider> = Arc::new(StubProvider::ok("ViaCEP", 200));
        let (status, body) = get_json(app(vec![fast, slow]), "/ceps/01310-100").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"]["source"], "BrasilAPI");
        assert_eq!(
            body["result"],
            "Fonte BrasilAPI >>> CEP:01310-100, Cidade:São Paulo-SP, Logradouro:Av. Paulista - Bairro:Bela Vista"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn missing_or_blank_cep_is_bad_request() {
        let stub = Arc::new(StubProvider::ok("BrasilAPI", 10));
        let providers: Vec<Arc<dyn AddressProvider>> = vec![stub.clone() as Arc<dyn AddressProvider>];
        for uri in ["/ceps", "/ceps/", "/ceps/%20%20"] {
            let (status, body) = get_json(app(providers.clone()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
            assert_eq!(body["kind"], "validation");
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn total_failure_is_gateway_timeout() {
        let a: Arc<dyn AddressProvider> = Arc::new(StubProvider::failing("BrasilAPI", 10));
        let b: Arc<dyn AddressProvider> = Arc::new(StubProvider::ok("ViaCEP", 5_000));
        let (status, body) = get_json(app(vec![a, b]), "/ceps/01310-100").await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["kind"], "all_failed");
        assert_eq!(body["failures"].as_array().map(|f| f.len()), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_body_lists_earlier_failures() {
        let a: Arc<dyn AddressProvider> = Arc::new(StubProvider::failing("BrasilAPI", 10));
        let b: Arc<dyn AddressProvider> =
            Arc::new(StubProvider::ok("ViaCEP", 9_000).with_timeout(10_000));
        let (status, body) = get_json(app(vec![a, b]), "/ceps/01310-100").await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["kind"], "deadline");
        assert_eq!(body["failures"][0]["provider"], "BrasilAPI");
    }
}
