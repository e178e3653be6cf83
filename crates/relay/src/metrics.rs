use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ALERTS_RECEIVED_TOTAL: IntCounter = IntCounter::with_opts(Opts::new(
        "smsrelay_alerts_received_total",
        "Total number of webhook alerts received."
    ))
    .unwrap();
    pub static ref SMS_SENT_TOTAL: IntCounter = IntCounter::with_opts(Opts::new(
        "smsrelay_sms_sent_total",
        "Total number of SMS messages accepted by the gateway."
    ))
    .unwrap();
    pub static ref SMS_FAILED_TOTAL: IntCounter = IntCounter::with_opts(Opts::new(
        "smsrelay_sms_failed_total",
        "Total number of SMS deliveries that failed."
    ))
    .unwrap();
}

pub fn register_metrics() {
    REGISTRY
        .register(Box::new(ALERTS_RECEIVED_TOTAL.clone()))
        .expect("Failed to register ALERTS_RECEIVED_TOTAL");
    REGISTRY
        .register(Box::new(SMS_SENT_TOTAL.clone()))
        .expect("Failed to register SMS_SENT_TOTAL");
    REGISTRY
        .register(Box::new(SMS_FAILED_TOTAL.clone()))
        .expect("Failed to register SMS_FAILED_TOTAL");
}

// Text exposition for the /metrics endpoint.
pub fn gather_metrics() -> String {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Failed to convert metrics to string")
}
