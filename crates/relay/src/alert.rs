use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alertmanager webhook payload (version 4).
#[derive(Debug, Deserialize, Serialize)]
pub struct AlertNotification {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub receiver: String,
    pub status: String,
    #[serde(rename = "groupLabels", default)]
    pub group_labels: HashMap<String, String>,
    #[serde(rename = "commonLabels", default)]
    pub common_labels: HashMap<String, String>,
    #[serde(rename = "commonAnnotations", default)]
    pub common_annotations: HashMap<String, String>,
    #[serde(rename = "externalURL", default)]
    pub external_url: String,
    #[serde(rename = "groupKey", default)]
    pub group_key: String,
    #[serde(default)]
    pub alerts: Vec<AlertDetail>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AlertDetail {
    pub status: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    #[serde(rename = "startsAt")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(rename = "endsAt")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(rename = "generatorURL", default)]
    pub generator_url: String,
}

/// Projects the notification status and the allow-listed common labels
/// into the SMS text. A label missing from the notification renders with
/// an empty value rather than being dropped, so the message shape stays
/// stable across alerts.
pub fn format_message(notification: &AlertNotification, labels: &[String]) -> String {
    let mut message = format!("{}.", notification.status);
    for label in labels {
        let value = notification
            .common_labels
            .get(label)
            .map(String::as_str)
            .unwrap_or("");
        message.push(' ');
        message.push_str(label);
        message.push(':');
        message.push_str(value);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALERTMANAGER_MESSAGE: &str = r#"{
        "version": "4",
        "groupKey": "",
        "status": "firing",
        "receiver": "megafon-sms",
        "groupLabels": {"alertname": "DenyOfService", "env": "prod"},
        "commonLabels": {"alertname": "DenyOfService", "env": "prod"},
        "commonAnnotations": {},
        "externalURL": "http://localhost:9093",
        "alerts": [
            {
                "status": "firing",
                "labels": {"alertname": "DenyOfService", "env": "prod"},
                "annotations": {},
                "startsAt": "2019-01-04T11:08:54.016165421+03:00",
                "endsAt": "0001-01-01T00:00:00Z",
                "generatorURL": ""
            }
        ]
    }"#;

    fn notification() -> AlertNotification {
        serde_json::from_str(ALERTMANAGER_MESSAGE).unwrap()
    }

    #[test]
    fn formats_status_and_allowed_labels() {
        let msg = format_message(&notification(), &["alertname".to_string()]);
        assert_eq!(msg, "firing. alertname:DenyOfService");
    }

    #[test]
    fn missing_label_renders_empty_value() {
        let labels = vec!["alertname".to_string(), "node".to_string()];
        let msg = format_message(&notification(), &labels);
        assert_eq!(msg, "firing. alertname:DenyOfService node:");
    }

    #[test]
    fn formatting_is_deterministic() {
        let labels = vec!["env".to_string(), "alertname".to_string()];
        let data = notification();
        let first = format_message(&data, &labels);
        let second = format_message(&data, &labels);
        assert_eq!(first, "firing. env:prod alertname:DenyOfService");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_allow_list_yields_status_only() {
        let msg = format_message(&notification(), &[]);
        assert_eq!(msg, "firing.");
    }
}
