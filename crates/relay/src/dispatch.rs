use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};
use tracing::error;

use crate::gateway::{DeliveryOutcome, GatewayClient};
use crate::recipients::RecipientSet;

/// Aggregate of one webhook dispatch. `overall_success` holds iff the
/// recipient set had no bad tokens, no delivery failed, and every outcome
/// arrived before the deadline.
#[derive(Debug)]
pub struct DispatchResult {
    pub overall_success: bool,
    pub timed_out: bool,
    pub outcomes: Vec<DeliveryOutcome>,
}

pub struct Dispatcher {
    gateway: Arc<GatewayClient>,
    dispatch_timeout: Duration,
}

impl Dispatcher {
    pub fn new(gateway: Arc<GatewayClient>, dispatch_timeout: Duration) -> Self {
        Self {
            gateway,
            dispatch_timeout,
        }
    }

    /// Fans the message out to every valid recipient concurrently and
    /// collects outcomes until all have reported or the dispatch deadline
    /// elapses. On deadline the remaining deliveries are aborted, so the
    /// caller is never blocked past `dispatch_timeout`.
    pub async fn dispatch(&self, message: &str, recipients: &RecipientSet) -> DispatchResult {
        let deadline = Instant::now() + self.dispatch_timeout;
        let expected = recipients.recipients.len();

        let mut deliveries = JoinSet::new();
        for &recipient in &recipients.recipients {
            let gateway = Arc::clone(&self.gateway);
            let message = message.to_string();
            deliveries.spawn(async move { gateway.send(recipient, &message).await });
        }

        let mut outcomes = Vec::with_capacity(expected);
        let mut timed_out = false;
        while !deliveries.is_empty() {
            match timeout_at(deadline, deliveries.join_next()).await {
                Ok(Some(Ok(outcome))) => outcomes.push(outcome),
                Ok(Some(Err(e))) => {
                    // Panicked task: no outcome, counts against the aggregate below.
                    error!("delivery task failed: {}", e);
                }
                Ok(None) => break,
                Err(_) => {
                    error!("timeout sending gateway requests");
                    deliveries.abort_all();
                    timed_out = true;
                    break;
                }
            }
        }

        let overall_success = !recipients.has_invalid()
            && !timed_out
            && outcomes.len() == expected
            && outcomes.iter().all(|o| o.success);

        DispatchResult {
            overall_success,
            timed_out,
            outcomes,
        }
    }
}
