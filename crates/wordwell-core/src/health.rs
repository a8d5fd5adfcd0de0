use axum::http::StatusCode;

/// `GET /healthz` liveness probe.
pub async fn healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// `GET /readyz` readiness probe. Services with external dependencies
/// can mount their own handler instead.
pub async fn readyz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
