use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref INGEST_REQUESTS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "relay_ingest_requests_total",
        "Total ingest requests received"
    ))
    .unwrap();
    pub static ref READINGS_ACCEPTED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "relay_readings_accepted_total",
        "Total readings accepted and stored"
    ))
    .unwrap();
    pub static ref REJECTED_UNAUTHORIZED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "relay_rejected_unauthorized_total",
        "Total requests rejected for a bad credential or unparseable body"
    ))
    .unwrap();
    pub static ref REJECTED_INVALID_TOTAL: Counter = Counter::with_opts(Opts::new(
        "relay_rejected_invalid_total",
        "Total ingest requests rejected by payload validation"
    ))
    .unwrap();
    pub static ref RETRIEVALS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "relay_retrievals_total",
        "Total readings served to polling clients"
    ))
    .unwrap();
}

pub fn init_metrics() {
    REGISTRY
        .register(Box::new(INGEST_REQUESTS_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(READINGS_ACCEPTED_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(REJECTED_UNAUTHORIZED_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(REJECTED_INVALID_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(RETRIEVALS_TOTAL.clone()))
        .unwrap();
}

pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
