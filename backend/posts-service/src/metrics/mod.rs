//! Prometheus metrics for posts-service.
//!
//! Collectors live in a registry owned by [`RequestMetrics`] rather than the
//! process-global default registry, so every `AppState` (and every test) gets
//! an isolated set of counters.

use crate::app::AppState;
use crate::error::Result;
use actix_web::{web, HttpResponse};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Name of the per-request counter.
pub const REQUESTS_TOTAL: &str = "simple_app_requests_total";

/// Request counter keyed by HTTP method and raw request path.
pub struct RequestMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
}

impl RequestMetrics {
    pub fn new() -> std::result::Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(REQUESTS_TOTAL, "Total HTTP requests"),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            requests_total,
        })
    }

    /// Registry that additional collectors (e.g. pool gauges) join.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Count one inbound request.
    pub fn observe_request(&self, method: &str, endpoint: &str) {
        self.requests_total
            .with_label_values(&[method, endpoint])
            .inc();
    }

    /// Current count for a (method, endpoint) pair.
    ///
    /// Reads the gathered families so an unseen pair is not created as a
    /// zero-valued series.
    pub fn request_count(&self, method: &str, endpoint: &str) -> u64 {
        let families = self.registry.gather();
        families
            .iter()
            .filter(|family| family.get_name() == REQUESTS_TOTAL)
            .flat_map(|family| family.get_metric())
            .find(|metric| {
                let label = |name: &str| {
                    metric
                        .get_label()
                        .iter()
                        .find(|pair| pair.get_name() == name)
                        .map(|pair| pair.get_value())
                };
                label("method") == Some(method) && label("endpoint") == Some(endpoint)
            })
            .map(|metric| metric.get_counter().get_value() as u64)
            .unwrap_or(0)
    }

    /// Encode every registered collector in the text exposition format.
    pub fn render(&self) -> std::result::Result<Vec<u8>, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.pool_metrics().update(state.db());
    let body = state.metrics().render()?;

    Ok(HttpResponse::Ok()
        .content_type(TextEncoder::new().format_type())
        .body(body))
}
