use anyhow::Context;

use daybook_infra::{AppConfig, workers::StreakSweeper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    daybook_observability::init(cfg.log_format);

    if cfg.uses_dev_secret() {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }

    let (app, services) = daybook_api::app::build_from_config(&cfg).await?;

    let sweeper = cfg.streak_sweep_interval.map(|interval| {
        tracing::info!(interval_secs = interval.as_secs(), "streak sweeper enabled");
        StreakSweeper::new(services.habit_store(), services.clock()).spawn(interval)
    });

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    if let Some(handle) = sweeper {
        handle.shutdown().await;
    }
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
