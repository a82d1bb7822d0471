use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryReferenceStore, InMemoryTransactionManager};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use research_match::config::AppConfig;
use research_match::error::AppError;
use research_match::forms::FormService;
use research_match::responder::scope_unit_of_work;
use research_match::telemetry;
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

    let store = InMemoryReferenceStore::load(config.forms.reference_seed.as_deref())?;
    let manager = Arc::new(InMemoryTransactionManager::new(store.clone()));
    let form_service = Arc::new(
        FormService::new(Arc::new(store)).with_position_rules(config.forms.position_rules),
    );

    let app = with_service_routes(form_service)
        .layer(axum::middleware::from_fn_with_state(
            manager,
            scope_unit_of_work::<InMemoryTransactionManager>,
        ))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        enforce_date_order = config.forms.position_rules.enforce_date_order,
        "research match service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
