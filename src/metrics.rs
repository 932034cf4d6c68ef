//! Prometheus metrics for the trading loop and the HTTP surface

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::models::intent::OrderAction;

pub struct Metrics {
    registry: Registry,
    pub cycles_total: IntCounter,
    pub cycle_failures_total: IntCounterVec,
    pub decisions_total: IntCounterVec,
    pub orders_placed_total: IntCounter,
    pub notification_failures_total: IntCounter,
    pub cycle_duration_seconds: Histogram,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total = IntCounter::new("cycles_total", "Decision cycles started")?;
        let cycle_failures_total = IntCounterVec::new(
            Opts::new("cycle_failures_total", "Decision cycles aborted by a collaborator failure"),
            &["step"],
        )?;
        let decisions_total = IntCounterVec::new(
            Opts::new("decisions_total", "Order intents produced, by action"),
            &["action"],
        )?;
        let orders_placed_total =
            IntCounter::new("orders_placed_total", "Orders accepted by the exchange")?;
        let notification_failures_total = IntCounter::new(
            "notification_failures_total",
            "Trade notifications that could not be delivered",
        )?;
        let cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("cycle_duration_seconds", "Wall time of a decision cycle")
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;
        let http_requests_total = IntCounter::new("http_requests_total", "HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;

        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(cycle_failures_total.clone()))?;
        registry.register(Box::new(decisions_total.clone()))?;
        registry.register(Box::new(orders_placed_total.clone()))?;
        registry.register(Box::new(notification_failures_total.clone()))?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;

        // Pre-create label sets so every action shows up at zero
        for action in OrderAction::ALL {
            decisions_total.with_label_values(&[action.as_str()]);
        }

        Ok(Self {
            registry,
            cycles_total,
            cycle_failures_total,
            decisions_total,
            orders_placed_total,
            notification_failures_total,
            cycle_duration_seconds,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
        })
    }

    pub fn record_decision(&self, action: OrderAction) {
        self.decisions_total
            .with_label_values(&[action.as_str()])
            .inc();
    }

    pub fn record_failure(&self, step: &str) {
        self.cycle_failures_total.with_label_values(&[step]).inc();
    }

    /// Render all metrics in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
