use anyhow::Context;

use orgauth_infra::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    orgauth_observability::init();

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    let app = orgauth_api::app::build_app_from_config(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
