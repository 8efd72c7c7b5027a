//! Broadcast metrics
//!
//! Records per-dispatch runtime metrics from a BroadcastOutcome.

use contracts::{BroadcastOutcome, DispatchStatus};
use metrics::{counter, gauge, histogram};

/// Record metrics from a BroadcastOutcome
///
/// Called once after each dispatch.
pub fn record_broadcast_metrics(outcome: &BroadcastOutcome) {
    counter!("syncpost_dispatch_total").increment(1);

    histogram!("syncpost_dispatch_wall_ms").record(outcome.total_time_ms);
    histogram!("syncpost_send_skew_ms").record(outcome.max_send_time_diff_ms);

    for result in &outcome.results {
        let status = match result.status {
            DispatchStatus::Http(_) => "http",
            DispatchStatus::Error => "error",
            DispatchStatus::NoResponse => "no_response",
        };
        counter!("syncpost_target_results_total", "status" => status).increment(1);

        // Only requests that actually went out count toward network time
        if result.sent_at.is_some() {
            histogram!(
                "syncpost_network_time_ms",
                "target" => result.target.clone()
            )
            .record(result.network_time_ms);
        }
    }
}

/// Record the current target count
pub fn record_target_count(count: usize) {
    gauge!("syncpost_targets").set(count as f64);
}

/// Network-time statistics for one dispatch (sent requests only)
pub fn network_time_stats(outcome: &BroadcastOutcome) -> StatsSummary {
    let mut stats = RunningStats::default();
    for result in outcome.results.iter().filter(|r| r.sent_at.is_some()) {
        stats.push(result.network_time_ms);
    }
    StatsSummary::from(&stats)
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
