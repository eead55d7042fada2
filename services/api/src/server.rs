use crate::cli::ServeArgs;
use crate::routes::with_operational_routes;
use crate::state::AppState;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_board::access::SessionVerifier;
use job_board::backend::{InMemoryBackend, RestBackend};
use job_board::config::{AppConfig, BackendConfig, ConfigError};
use job_board::error::AppError;
use job_board::portal::{portal_router, PortalState};
use job_board::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Signing secret used outside production when none is configured.
const DEVELOPMENT_JWT_SECRET: &str = "job-board-development-secret";

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let portal = portal_state(&config)?;
    let app = with_operational_routes(portal_router(portal))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        transitions = ?config.workflow.transitions,
        "job board ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn portal_state(config: &AppConfig) -> Result<PortalState, AppError> {
    let backend = &config.backend;
    let policy = config.workflow.transitions;

    let Some(url) = &backend.url else {
        warn!("BACKEND_URL not set; data lives in memory and is lost on restart");
        return Ok(PortalState::from_backend(
            Arc::new(InMemoryBackend::default()),
            in_memory_verifier(backend),
            policy,
        ));
    };

    let service_key = backend
        .service_key
        .as_ref()
        .ok_or(ConfigError::MissingServiceKey)?;
    let secret = backend
        .jwt_secret
        .as_ref()
        .ok_or(ConfigError::MissingJwtSecret)?;
    info!(backend = %url, "using hosted backend");
    Ok(PortalState::from_backend(
        Arc::new(RestBackend::new(url.clone(), service_key.clone())),
        SessionVerifier::new(secret.as_bytes()),
        policy,
    ))
}

/// The development secret is only ever paired with the in-memory backend.
fn in_memory_verifier(backend: &BackendConfig) -> SessionVerifier {
    match &backend.jwt_secret {
        Some(secret) => SessionVerifier::new(secret.as_bytes()),
        None => {
            warn!("BACKEND_JWT_SECRET not set; using the development signing secret");
            SessionVerifier::new(DEVELOPMENT_JWT_SECRET.as_bytes())
        }
    }
}
