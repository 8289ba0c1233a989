// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use relational_edge_authorizer::{
    api::router,
    appconfig::{AppConfigDataSource, ConfigCache},
    auth::{Authorizer, Decision},
    config::{LogFormat, Settings},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = Settings::from_env();
    init_tracing(settings.log_format);

    // Created once per execution environment; every cache below lives until
    // the environment is recycled.
    let source = Arc::new(AppConfigDataSource::from_env().await);
    let config = Arc::new(ConfigCache::new(source, settings.config_identifiers()));
    let authorizer = Arc::new(Authorizer::new(config, settings.authorizer_settings()));

    if let Some(addr) = &settings.local_http_addr {
        return serve_local(addr, authorizer).await;
    }

    info!(environment = %settings.environment, "Edge authorizer starting");
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let authorizer = Arc::clone(&authorizer);
        async move { Ok::<Decision, Error>(authorizer.handle_event(event.payload).await) }
    }))
    .await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        // CloudWatch adds the ingestion time and does not render ANSI colours.
        LogFormat::Json => builder.json().with_ansi(false).without_time().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn serve_local(addr: &str, authorizer: Arc<Authorizer>) -> Result<(), Error> {
    let app = router(AppState::new(authorizer));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "Edge authorizer listening (local harness)");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
