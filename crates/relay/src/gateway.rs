use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::GatewayConfig;

/// Body shape the gateway expects for one message.
#[derive(Debug, Serialize)]
pub struct DeliveryRequest<'a> {
    pub from: &'a str,
    pub to: u64,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<&'a str>,
}

// Gateway reply: {"result": {"status": {"code", "description", "payload"}, "msg_id"}}
#[derive(Debug, Default, Deserialize)]
pub struct GatewayReply {
    #[serde(default)]
    pub result: GatewayResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct GatewayResult {
    #[serde(default)]
    pub status: GatewayStatus,
    #[serde(default)]
    pub msg_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GatewayStatus {
    /// `None` when the reply carries no code field at all, which is a
    /// failure just like a non-zero code. Only `Some(0)` is a success.
    pub code: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub payload: Vec<StatusPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    RequestBuild(String),
    Transport(String),
    HttpStatus(u16),
    MalformedReply(String),
    GatewayRejected { code: Option<i64>, description: String },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::RequestBuild(e) => write!(f, "request build error: {e}"),
            FailureReason::Transport(e) => write!(f, "transport error: {e}"),
            FailureReason::HttpStatus(status) => write!(f, "gateway returned HTTP {status}"),
            FailureReason::MalformedReply(e) => write!(f, "malformed gateway reply: {e}"),
            FailureReason::GatewayRejected { code, description } => {
                write!(f, "gateway rejected with code {code:?}: {description}")
            }
        }
    }
}

/// Result of one delivery attempt. All failure modes are absorbed here;
/// `GatewayClient::send` never returns an error to the caller.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub recipient: u64,
    pub success: bool,
    pub gateway_code: Option<i64>,
    pub message_id: Option<String>,
    pub reason: Option<FailureReason>,
}

impl DeliveryOutcome {
    fn failure(recipient: u64, gateway_code: Option<i64>, reason: FailureReason) -> Self {
        Self {
            recipient,
            success: false,
            gateway_code,
            message_id: None,
            reason: Some(reason),
        }
    }
}

pub struct GatewayClient {
    config: GatewayConfig,
    client: Client,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(config.send_timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        Ok(Self { config, client })
    }

    /// Sends one message to one recipient and classifies the exchange.
    /// Success requires HTTP 200, a well-formed JSON body, and
    /// `result.status.code == 0`.
    pub async fn send(&self, recipient: u64, message: &str) -> DeliveryOutcome {
        let request = DeliveryRequest {
            from: &self.config.from,
            to: recipient,
            message,
            callback_url: None,
        };
        debug!("Sending request to sms gateway: {:?}", request);

        let response = self
            .client
            .post(&self.config.url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Content-type", "application/json")
            .json(&request)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                error!("sms to {}: {}", recipient, e);
                let reason = if e.is_builder() {
                    FailureReason::RequestBuild(e.to_string())
                } else {
                    FailureReason::Transport(e.to_string())
                };
                return DeliveryOutcome::failure(recipient, None, reason);
            }
        };

        let status = response.status();
        debug!("Server reply: {:?}", response);
        if status != StatusCode::OK {
            error!("sms to {}: gateway returned HTTP {}", recipient, status);
            return DeliveryOutcome::failure(
                recipient,
                None,
                FailureReason::HttpStatus(status.as_u16()),
            );
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!("sms to {}: error reading reply: {}", recipient, e);
                return DeliveryOutcome::failure(
                    recipient,
                    None,
                    FailureReason::Transport(e.to_string()),
                );
            }
        };

        let reply: GatewayReply = match serde_json::from_str(&body) {
            Ok(reply) => reply,
            Err(e) => {
                error!("sms to {}: error {} parsing reply {:?}", recipient, e, body);
                return DeliveryOutcome::failure(
                    recipient,
                    None,
                    FailureReason::MalformedReply(e.to_string()),
                );
            }
        };
        debug!("Server reply body: {:?}", reply);

        let gateway_status = &reply.result.status;
        if gateway_status.code != Some(0) {
            error!(
                "sms to {}: gateway fault with code {:?}, description {:?}, payload {:?}",
                recipient, gateway_status.code, gateway_status.description, gateway_status.payload
            );
            return DeliveryOutcome::failure(
                recipient,
                gateway_status.code,
                FailureReason::GatewayRejected {
                    code: gateway_status.code,
                    description: gateway_status.description.clone(),
                },
            );
        }

        info!("sms to {} sent. id {:?}", recipient, reply.result.msg_id);
        DeliveryOutcome {
            recipient,
            success: true,
            gateway_code: gateway_status.code,
            message_id: reply.result.msg_id,
            reason: None,
        }
    }
}
