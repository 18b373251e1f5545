use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_fare_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fare_advisor::config::AppConfig;
use fare_advisor::error::AppError;
use fare_advisor::pricing::FareAdvisor;
use fare_advisor::sheet::{spawn_refresh_task, CsvFileSource, SharedSheet};
use fare_advisor::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(sheet) = args.sheet.take() {
        config.sheet.path = Some(sheet);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let advisor = Arc::new(FareAdvisor::new(&config.pricing));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        advisor: advisor.clone(),
    };

    let shared = SharedSheet::default();
    let refresh_task = match config.sheet.path.clone() {
        Some(path) => {
            let schedule = config.sheet.schedule();
            info!(
                sheet = %path.display(),
                interval_secs = schedule.interval().as_secs(),
                "fare sheet refresh scheduled"
            );
            Some(spawn_refresh_task(
                CsvFileSource::new(path),
                shared.clone(),
                schedule,
            ))
        }
        None => {
            info!("no fare sheet configured; sheet lookups will report unavailable");
            None
        }
    };

    let app = with_fare_routes(advisor, shared)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "fare advisor ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = refresh_task {
        task.abort();
    }
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
