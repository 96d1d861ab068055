//! C9: Prometheus metrics. Registered once at process start into a
//! dedicated registry so `naas-server`'s `/metrics` handler can render
//! it independent of the default global registry.

use prometheus::{Encoder, Gauge, HistogramVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    pub registry: Registry,
    pub queue_depth: Gauge,
    pub workers_active: Gauge,
    pub request_latency: HistogramVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let queue_depth = Gauge::with_opts(
            Opts::new("naas_queue_depth", "Number of jobs currently queued").const_label("app", "naas"),
        )?;
        let workers_active = Gauge::with_opts(
            Opts::new("naas_workers_active", "Number of workers currently running a job")
                .const_label("app", "naas"),
        )?;
        let request_latency = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "naas_request_duration_seconds",
                "HTTP request latency by endpoint",
            )
            .const_label("app", "naas"),
            &["endpoint", "method", "status"],
        )?;

        registry.register(Box::new(queue_depth.clone()))?;
        registry.register(Box::new(workers_active.clone()))?;
        registry.register(Box::new(request_latency.clone()))?;

        Ok(Self {
            registry,
            queue_depth,
            workers_active,
            request_latency,
        })
    }

    pub fn observe_request(&self, endpoint: &str, method: &str, status: u16, elapsed_seconds: f64) {
        self.request_latency
            .with_label_values(&[endpoint, method, &status.to_string()])
            .observe(elapsed_seconds);
    }

    /// Render the registry in Prometheus text exposition format for the
    /// `/metrics` endpoint.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer).expect("prometheus encoding is infallible for well-formed metrics");
        String::from_utf8(buffer).expect("prometheus text encoder always emits valid UTF-8")
    }
}
