mod app;
mod clock;
mod config;
mod db;
mod error;
mod estimation;
mod ledger;
mod profiles;
mod session;
mod state;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "foodlog=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;
    db::migrate(&app_state.db).await?;

    if app_state.config.transport_token.is_none() {
        tracing::warn!("TRANSPORT_TOKEN is not set; the chat API accepts unauthenticated requests");
    }
    tracing::info!(
        model = %app_state.config.inference.model,
        offset = ?app_state.config.local_offset,
        "estimation gateway configured"
    );

    app::serve(app::build_app(app_state)).await
}
