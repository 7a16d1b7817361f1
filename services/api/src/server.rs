use crate::cli::ServeArgs;
use crate::infra::{build_platform_service, seed_demo_records, AppState};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use scheme_assist::config::AppConfig;
use scheme_assist::error::AppError;
use scheme_assist::telemetry;
use std::sync::atomic::Ordering;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = build_platform_service();
    if config.seed_demo_data {
        let seeded = seed_demo_records(&service)?;
        info!(
            applicants = 2,
            schemes = 2,
            first_scheme = %seeded.retrenchment_scheme.name,
            "seeded demonstration records"
        );
    }

    let app = with_platform_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "assistance scheme platform ready");

    axum::serve(listener, app).await?;
    Ok(())
}
