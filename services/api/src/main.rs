use sea_orm::Database;
use tracing::info;

use wordwell_api::config::ApiConfig;
use wordwell_api::infra::mail::SmtpNotifier;
use wordwell_api::router::build_router;
use wordwell_api::state::AppState;
use wordwell_core::config::Config;
use wordwell_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let notifier = SmtpNotifier::new(
        &config.smtp_host,
        &config.smtp_user,
        &config.smtp_pass,
        &config.mail_from,
    )
    .expect("invalid SMTP configuration");

    let state = AppState {
        db,
        notifier,
        jwt_secret: config.jwt_secret,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
