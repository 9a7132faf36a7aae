use anyhow::Context;
use graphql_api::{app, build_schema};
use shared::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared::init_tracing().map_err(|e| anyhow::anyhow!("failed to init tracing: {e}"))?;

    let config = Config::from_env().context("invalid configuration")?;

    // One store handle for the whole process, opened before serving.
    let repository = infrastructure::connect_repository(&config).await;
    let schema = build_schema(repository);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, environment = %config.environment, "server starting");

    axum::serve(listener, app(schema))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            // Without a signal handler, keep serving until the process is killed.
            std::future::pending::<()>().await;
        }
    }
}
