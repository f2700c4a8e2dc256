use anyhow::Context;

use farmstock_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_format = ApiConfig::log_format_from_env().context("invalid configuration")?;
    farmstock_observability::init_with(log_format);
    let config = ApiConfig::from_env().context("invalid configuration")?;

    let services = app::services::build_services(&config).await?;
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        locale = config.collation.locale_tag(),
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
