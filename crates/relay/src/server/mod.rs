mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    config::{Config, DispatchConfig},
    dispatch::Dispatcher,
};

pub struct Server {
    dispatcher: Dispatcher,
    dispatch: DispatchConfig,
}

impl Server {
    pub fn new(config: &Config, dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            dispatch: config.dispatch.clone(),
        }
    }

    pub fn build_router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route("/health", get(routes::health))
            .route("/sms", post(routes::sms_webhook))
            .route("/metrics", get(routes::metrics))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    pub async fn start(self, addr: &str) -> crate::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.build_router()).await?;
        Ok(())
    }
}
