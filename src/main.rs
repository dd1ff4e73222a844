use std::sync::Arc;

use anyhow::Context;

use bank_onboard::config::ServerConfig;
use bank_onboard::onboarding::{OnboardingManager, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;

    let manager = OnboardingManager::from_config(&config)
        .await
        .context("failed to initialise onboarding service")?;

    eprintln!("🏦 Bank Onboard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Catalog: {} programs ({})",
        manager.programs().len(),
        config
            .catalog_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    );
    eprintln!("   API: http://{}/onboarding", config.addr());
    if config.seed_demo {
        let employees = manager.list_employees().await?;
        eprintln!("   Demo data: {} employees", employees.len());
    }

    let router = app(Arc::new(manager), &config.cors_origins);
    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("failed to bind {}", config.addr()))?;

    tracing::info!(addr = %config.addr(), "Onboarding server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
