use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
}

/// Connection settings for the SMS gateway. Passed by value into
/// `GatewayClient::new` so tests can run isolated instances with
/// different endpoints and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub url: String,
    pub from: String,
    pub username: String,
    pub password: String,
    /// Disable TLS certificate verification when talking to the gateway.
    pub insecure: bool,
    /// Per-call timeout for one gateway request.
    pub send_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Comma-separated recipient phone numbers, e.g. "79991112233,79183334455".
    pub recipients: String,
    /// CommonLabels names to include in the message text, in order.
    pub labels: Vec<String>,
    /// Global deadline for one webhook dispatch across all recipients.
    pub dispatch_timeout: Duration,
}

fn env_or(key: &str, def: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| def.to_string())
}

impl Config {
    pub fn load() -> crate::Result<Self> {
        // Load environment variables from .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Config {
            server: ServerConfig {
                addr: format!("0.0.0.0:{}", env_or("SMS_PORT", "9097")),
            },
            gateway: GatewayConfig {
                url: env_or("SMS_GW_URL", "https://localhost:7443"),
                from: env_or("SMS_FROM", "VGR ID"),
                username: env_or("SMS_USER", ""),
                password: env_or("SMS_PASSWORD", ""),
                insecure: env_or("SMS_INSECURE", "false").to_lowercase() == "true",
                send_timeout: Duration::from_secs(
                    env_or("SMS_SEND_TIMEOUT_SECS", "50")
                        .parse()
                        .map_err(|_| {
                            crate::Error::Config("SMS_SEND_TIMEOUT_SECS must be an integer".into())
                        })?,
                ),
            },
            dispatch: DispatchConfig {
                recipients: env_or("SMS_TO", ""),
                labels: env_or("SMS_LABELS", "alertname")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                dispatch_timeout: Duration::from_secs(
                    env_or("SMS_DISPATCH_TIMEOUT_SECS", "60")
                        .parse()
                        .map_err(|_| {
                            crate::Error::Config(
                                "SMS_DISPATCH_TIMEOUT_SECS must be an integer".into(),
                            )
                        })?,
                ),
            },
        };

        // Validate gateway URL up front so a typo fails at startup, not per alert
        Url::parse(&config.gateway.url)
            .map_err(|e| crate::Error::Config(format!("invalid SMS_GW_URL: {e}")))?;

        if config.gateway.username.is_empty() {
            tracing::warn!("SMS_USER is not set. Gateway authentication may fail.");
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: "0.0.0.0:9097".to_string(),
            },
            gateway: GatewayConfig {
                url: "https://localhost:7443".to_string(),
                from: "VGR ID".to_string(),
                username: "".to_string(),
                password: "".to_string(),
                insecure: false,
                send_timeout: Duration::from_secs(50),
            },
            dispatch: DispatchConfig {
                recipients: "".to_string(),
                labels: vec!["alertname".to_string()],
                dispatch_timeout: Duration::from_secs(60),
            },
        }
    }
}
