use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::{Arc, OnceLock};
use tracing::info;


// Declare the static OnceLock to hold the Metrics.
static METRICS_INSTANCE: OnceLock<Arc<Metrics>> = OnceLock::new();

/// Initializes on first use and returns the process-wide `Metrics`.
pub fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| {
        info!("Initializing Metrics ...");
        Metrics::new()
    })
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Renewal metrics
    pub renewals: IntCounter,
    pub renewal_failures: IntCounterVec,
    pub renewal_duration: HistogramVec,
    pub access_token_expiry_unix: IntGauge,
    pub refresh_token_expiry_unix: IntGauge,

    // Trust metrics
    pub trust_insecure: IntGauge,
    pub trust_anchors: IntGauge,
    pub transport_fallbacks: IntCounter,
    pub ca_downloads: IntCounterVec,

    // Sink metrics
    pub sink_writes: IntCounter,
    pub sink_failures: IntCounter,

    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("tokenrenewer".into()), None)
            .unwrap_or_else(|_| Registry::new());

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Renewal
            renewals: IntCounter::new("renewals_total", "Successful token renewals").expect("renewal metric"),
            renewal_failures: IntCounterVec::new(Opts::new("renewal_failures_total", "Renewal failures by reason"),&["reason"],).expect("renewal metric"),
            renewal_duration: HistogramVec::new(HistogramOpts::new("renewal_duration_seconds", "Renewal request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["outcome"],).expect("renewal metric"),
            access_token_expiry_unix: IntGauge::new("access_token_expiry_unix_seconds", "Access token expiry timestamp").expect("renewal metric"),
            refresh_token_expiry_unix: IntGauge::new("refresh_token_expiry_unix_seconds", "Refresh token expiry timestamp").expect("renewal metric"),

            // Trust
            trust_insecure: IntGauge::new("trust_insecure", "1 if TLS peer verification is disabled").expect("trust metric"),
            trust_anchors: IntGauge::new("trust_anchors_total", "Root certificates loaded from the CA directory").expect("trust metric"),
            transport_fallbacks: IntCounter::new("transport_fallbacks_total", "Custom transport build failures that fell back to the default client").expect("trust metric"),
            ca_downloads: IntCounterVec::new(Opts::new("ca_downloads_total", "CA bootstrap downloads by outcome"),&["outcome"],).expect("trust metric"),

            // Sink
            sink_writes: IntCounter::new("sink_writes_total", "Access token writes to the output file").expect("sink metric"),
            sink_failures: IntCounter::new("sink_failures_total", "Failed access token writes").expect("sink metric"),

            up: IntGauge::new("up", "1 if service is healthy").expect("up metric"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.renewals.clone())).expect("register metric");
        reg.register(Box::new(metrics.renewal_failures.clone())).expect("register metric");
        reg.register(Box::new(metrics.renewal_duration.clone())).expect("register metric");
        reg.register(Box::new(metrics.access_token_expiry_unix.clone())).expect("register metric");
        reg.register(Box::new(metrics.refresh_token_expiry_unix.clone())).expect("register metric");
        reg.register(Box::new(metrics.trust_insecure.clone())).expect("register metric");
        reg.register(Box::new(metrics.trust_anchors.clone())).expect("register metric");
        reg.register(Box::new(metrics.transport_fallbacks.clone())).expect("register metric");
        reg.register(Box::new(metrics.ca_downloads.clone())).expect("register metric");
        reg.register(Box::new(metrics.sink_writes.clone())).expect("register metric");
        reg.register(Box::new(metrics.sink_failures.clone())).expect("register metric");
        reg.register(Box::new(metrics.up.clone())).expect("register metric");

        metrics
    }
}
