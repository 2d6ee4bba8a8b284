use dotenvy::dotenv;
use std::env;

use quant_back_end::api::{config::ApiConfig, router::build_router};
use quant_back_end::utils::app_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv();
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG")
                .unwrap_or_else(|_| "info".to_string())
                .as_str(),
        )
        .init();

    // Load API configuration
    let api_config = ApiConfig::from_env()?;

    tracing::info!("API configuration loaded successfully");

    // Load AppConfig (database, auth, forex provider, settings file)
    let app_config = AppConfig::from_env(&api_config.settings_env_file)?;
    tracing::info!(
        "Application configuration loaded successfully ({:?} auth)",
        app_config.auth.mode()
    );

    let router = build_router(app_config);

    let addr = format!("0.0.0.0:{}", api_config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Starting quant API server on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
