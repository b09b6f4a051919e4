//! HTTP server setup and handlers.
//!
//! # Responsibilities
//! - Create Axum Router with the visit and count handlers
//! - Wire up middleware (request ID, tracing)
//! - Run visits on the blocking pool so a spinning visit never stalls the
//!   async workers serving other requests
//! - Serve a router on a listener until shutdown

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{InstanceConfig, WebappConfig};
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::http::response::{AppError, CountResponse};
use crate::load::{LoadError, LoadSimulator};
use crate::visitors::VisitorCounter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub instance: Arc<InstanceConfig>,
    pub visitors: Arc<VisitorCounter>,
    pub simulator: Arc<LoadSimulator>,
}

impl AppState {
    pub fn new(config: &WebappConfig, visitors: Arc<VisitorCounter>) -> Self {
        Self {
            instance: Arc::new(config.instance.clone()),
            visitors,
            simulator: Arc::new(LoadSimulator::new(config.load.clone())),
        }
    }
}

/// Application server for one instance.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(visit_handler))
            .route("/count", get(count_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        serve(listener, self.router, shutdown, "application").await
    }
}

/// Serve `router` on `listener` with graceful shutdown.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
    role: &'static str,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, role, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!(address = %addr, role, "HTTP server stopped");
    Ok(())
}

/// `GET /`: simulate load, then count the visit.
///
/// Both steps run on one blocking thread, detached from the request future,
/// so a visit that has started always completes and is always counted.
async fn visit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<String, AppError> {
    let simulator = state.simulator.clone();
    let visitors = state.visitors.clone();

    let report = tokio::task::spawn_blocking(move || {
        let report = simulator.run()?;
        visitors.increment();
        Ok::<_, LoadError>(report)
    })
    .await??;

    tracing::debug!(
        request_id = %request_id(&headers),
        instance = %state.instance.name,
        busy_ms = report.busy.as_millis() as u64,
        block_mib = report.profile.block_mib,
        "Visit recorded"
    );

    Ok(state.instance.greeting.clone())
}

/// `GET /count`: current visitor count, read-only.
async fn count_handler(State(state): State<AppState>) -> Json<CountResponse> {
    Json(CountResponse {
        visitor_count: state.visitors.current(),
    })
}
