use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use wordwell_core::health::{healthz, readyz};
use wordwell_core::middleware::request_id_layer;

use crate::handlers::auth::{get_me, login, register};
use crate::handlers::verification::{
    forgotten_password, resend_validation, reset_password, validate_account,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Accounts
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/users/@me", get(get_me))
        // Verification codes
        .route("/auth/validate/{username}/{code}", post(validate_account))
        .route("/auth/validate/{username}/resend", post(resend_validation))
        .route(
            "/auth/forgotten-password/{username}",
            post(forgotten_password),
        )
        .route("/auth/reset-password/{username}/{code}", post(reset_password))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
