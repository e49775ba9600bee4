use anyhow::{Context, Result};
use crate::config::settings::MetricsConfig;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use tracing::info;

/// Serve `/metrics` until the process exits. Returns immediately when metrics are disabled.
pub async fn start(metrics_config: &MetricsConfig) -> Result<()> {
    let metrics = get_metrics();
    let state = MetricsState::new(metrics.registry.clone());
    let app = state.router(metrics_config);

    if app.has_routes() {
        let addr = format!("{}:{}", metrics_config.host, metrics_config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("unable to bind metrics endpoint on {}", addr))?;
        info!("metrics endpoint listening on {}{}", addr, metrics_config.path);
        metrics.up.set(1);
        axum::serve(listener, app).await.context("metrics endpoint failed")?;
    }

    Ok(())
}
