use anyhow::Context;

use meridian_api::app::{build_app, build_services};
use meridian_api::config::AppSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    meridian_observability::init();

    let settings = AppSettings::from_env()?;
    let services = build_services(&settings)?;
    let app = build_app(&settings.jwt_secret, services);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
