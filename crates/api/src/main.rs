use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use carestock_api::app::{build_app, services::AppServices};
use carestock_infra::{
    config::RefreshConfig, notify::TracingNotificationChannel, read_model::InMemoryInventoryStore,
    seed::seed_demo,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    carestock_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });
    let bind = std::env::var("CARESTOCK_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let seed = std::env::var("CARESTOCK_SEED_DEMO")
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);

    let refresh = RefreshConfig::from_env().context("invalid refresh configuration")?;
    let policy = refresh.load_policy().context("invalid forecast policy")?;
    tracing::info!(policy = %policy.version, interval_secs = refresh.interval.as_secs(), "configuration loaded");

    let store = Arc::new(InMemoryInventoryStore::new());
    if seed {
        let schools = seed_demo(&store, Utc::now()).context("failed to seed demo data")?;
        tracing::info!(schools = schools.len(), "demo data seeded");
    }

    let mut services = AppServices::new(
        store,
        policy,
        &refresh,
        Arc::new(TracingNotificationChannel::new()),
    )
    .context("failed to wire services")?;
    services
        .start_runner(&refresh)
        .context("failed to start refresh runner")?;
    let services = Arc::new(services);

    let app = build_app(jwt_secret, Arc::clone(&services));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    tokio::task::spawn_blocking(move || services.shutdown()).await?;
    Ok(())
}
