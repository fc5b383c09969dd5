use metrics::{counter, histogram};
use std::time::Instant;

pub struct Telemetry;

impl Telemetry {
    /// `outcome` is `ok` or a relay error kind.
    pub fn record_summarize(outcome: &str) {
        counter!("notewise_summarize_requests_total", "outcome" => outcome.to_string()).increment(1);
    }

    pub fn record_guard_redirect(reason: &str) {
        counter!("notewise_guard_redirects_total", "reason" => reason.to_string()).increment(1);
    }

    pub fn record_signout(outcome: &str) {
        counter!("notewise_signouts_total", "outcome" => outcome.to_string()).increment(1);
    }

    pub fn record_upstream_latency(duration_ms: f64) {
        histogram!("notewise_upstream_duration_ms").record(duration_ms);
    }
}

pub struct UpstreamTimer {
    start: Instant
}

impl UpstreamTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now()
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed().as_millis() as f64;
        Telemetry::record_upstream_latency(duration);
    }
}
