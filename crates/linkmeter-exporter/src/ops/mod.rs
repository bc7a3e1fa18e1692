//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness
//! - `/metrics` : exposition text format

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use linkmeter_core::expose;

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Response {
    // Snapshot first; rendering runs outside the registry lock.
    let snapshot = state.registry().read();
    let body = expose::render(&snapshot);

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
        .into_response()
}
