use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use microapp_gallery::{
    graceful_shutdown::shutdown_signal,
    routes::configure_routes,
    settings::AppConfig,
    shared_repos::SharedRepositories,
    constants::IDEMPOTENCY_KEY_HEADER,
    AppState,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("idempotency-key"),
        ])
        .expose_headers(vec![IDEMPOTENCY_KEY_HEADER])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new().context("Configuration error")?;
    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let repos = SharedRepositories::from_config(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialise storage: {e}"))?;

    let app_state = web::Data::from(Arc::new(
        AppState::new(&config, repos).map_err(|e| anyhow::anyhow!("Failed to build upstream clients: {e}"))?,
    ));

    let server_addr = format!("{}:{}", config.host, config.port);
    let origins = config.cors_origins();
    let max_json_payload_bytes = config.max_json_payload_bytes;

    tracing::info!(
        "Starting {} v{} on {} ({} storage)",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        app_state.storage.as_str()
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(build_cors(&origins))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(|cfg| configure_routes(cfg, max_json_payload_bytes))
    })
    .workers(config.worker_count)
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .shutdown_timeout(30)
    .run();

    let handle = server.handle();

    tokio::select! {
        res = server => res.context("Server error")?,
        _ = shutdown_signal() => {
            handle.stop(true).await;
            tracing::info!("Server stopped");
        }
    }

    Ok(())
}
