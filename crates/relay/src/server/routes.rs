use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{
    alert::{format_message, AlertNotification},
    metrics::{ALERTS_RECEIVED_TOTAL, SMS_FAILED_TOTAL, SMS_SENT_TOTAL},
    recipients::RecipientSet,
};

use super::Server;

pub async fn health() -> &'static str {
    "OK"
}

pub async fn metrics() -> String {
    crate::metrics::gather_metrics()
}

/// Alertmanager webhook endpoint. Maps the dispatch aggregate to a single
/// transport status: 200 when every delivery succeeded, 500 otherwise,
/// with a timeout-specific body when the dispatch deadline elapsed.
/// An empty recipient set counts as success with zero deliveries.
pub async fn sms_webhook(
    State(server): State<Arc<Server>>,
    Json(notification): Json<AlertNotification>,
) -> Response {
    info!(
        "alert received: {}. Status: {}",
        notification
            .group_labels
            .get("alertname")
            .map(String::as_str)
            .unwrap_or(""),
        notification.status
    );
    if let Ok(full) = serde_json::to_string(&notification) {
        debug!("full request: {}", full);
    }
    ALERTS_RECEIVED_TOTAL.inc();

    let message = format_message(&notification, &server.dispatch.labels);
    let recipients = RecipientSet::parse(&server.dispatch.recipients);

    let result = server.dispatcher.dispatch(&message, &recipients).await;
    for outcome in &result.outcomes {
        if outcome.success {
            SMS_SENT_TOTAL.inc();
        } else {
            SMS_FAILED_TOTAL.inc();
        }
    }

    if result.timed_out {
        error!("dispatch deadline elapsed before all deliveries reported");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Timeout sending sms\n").into_response();
    }
    if result.overall_success {
        StatusCode::OK.into_response()
    } else {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
