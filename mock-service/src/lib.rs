//! Mock scoring endpoint for exercising strain end to end.
//!
//! Every route accepts `POST` with a JSON `{"name": ...}` body and requires an
//! `Authorization: Bearer <key>` header; requests without one are rejected with 401.
use axum::{
    debug_handler,
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub result: String,
}

/// Request counters shared by every handler of one server.
#[derive(Debug, Clone, Default)]
pub struct MockState {
    requests: Arc<AtomicU64>,
    ok: Arc<AtomicU64>,
    unauthorized: Arc<AtomicU64>,
}

impl MockState {
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Requests answered with 200.
    pub fn ok(&self) -> u64 {
        self.ok.load(Ordering::SeqCst)
    }

    pub fn unauthorized(&self) -> u64 {
        self.unauthorized.load(Ordering::SeqCst)
    }

    /// Returns the request's sequence number on this server.
    fn authorize(&self, headers: &HeaderMap) -> Result<u64, StatusCode> {
        let seq = self.requests.fetch_add(1, Ordering::SeqCst);
        counter!("mock-service.requests").increment(1);

        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|key| !key.is_empty());

        match bearer {
            Some(_) => Ok(seq),
            None => {
                self.unauthorized.fetch_add(1, Ordering::SeqCst);
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }

    fn respond(&self, request: ScoreRequest) -> Json<ScoreResponse> {
        self.ok.fetch_add(1, Ordering::SeqCst);
        Json(ScoreResponse {
            result: format!("{}'s not here.", request.name),
        })
    }
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/score", post(score))
        .route("/delay/ms/:delay_ms/score", post(delay))
        .route("/status/:status/score", post(status))
        .route("/flaky/score", post(flaky))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> anyhow::Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Bind an ephemeral local port and serve on a background task.
pub async fn spawn() -> anyhow::Result<(SocketAddr, MockState)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MockState::default();

    let server_state = state.clone();
    tokio::spawn(async move {
        if let Err(err) = run(listener, server_state).await {
            tracing::error!("Mock service stopped: {err}");
        }
    });

    Ok((addr, state))
}

#[debug_handler]
pub async fn score(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, StatusCode> {
    state.authorize(&headers)?;
    Ok(state.respond(request))
}

#[debug_handler]
pub async fn delay(
    State(state): State<MockState>,
    Path(delay_ms): Path<u64>,
    headers: HeaderMap,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, StatusCode> {
    state.authorize(&headers)?;
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    Ok(state.respond(request))
}

#[debug_handler]
pub async fn status(
    State(state): State<MockState>,
    Path(status): Path<u16>,
    headers: HeaderMap,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, StatusCode> {
    state.authorize(&headers)?;
    match StatusCode::from_u16(status) {
        Ok(StatusCode::OK) => Ok(state.respond(request)),
        Ok(code) => Err(code),
        Err(_) => Err(StatusCode::BAD_REQUEST),
    }
}

/// Alternates 200 and 503, starting with 200.
#[debug_handler]
pub async fn flaky(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, StatusCode> {
    let seq = state.authorize(&headers)?;
    if seq % 2 == 0 {
        Ok(state.respond(request))
    } else {
        debug!("MOCK SERVER ___ ERR");
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/** RPS Printer **/

pub async fn rps_measure_task(state: MockState) {
    let mut last = state.requests();
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let now = state.requests();
        println!("{} RPS", now - last);
        last = now;
    }
}
