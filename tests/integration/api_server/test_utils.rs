use std::sync::Arc;

use axum_test::TestServer;
use crossignal::core::http::{create_router, AppState, SharedHealth};
use crossignal::metrics::Metrics;

pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub health: SharedHealth,
}

impl TestApiServer {
    pub fn new() -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let state = AppState::new(metrics.clone());
        let health = state.health.clone();
        let server = TestServer::new(create_router(state)).expect("start test server");
        Self {
            server,
            metrics,
            health,
        }
    }
}
