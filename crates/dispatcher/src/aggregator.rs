//! ResultAggregator - summary metrics over per-target results

use std::time::Instant;

use chrono::{DateTime, Utc};
use contracts::{BroadcastOutcome, DispatchResult};

/// Derives timing summaries from per-target results
pub struct ResultAggregator;

impl ResultAggregator {
    /// `(max(sent_at) - min(sent_at))` in milliseconds over results that
    /// carry a send time; 0 with fewer than two
    pub fn max_send_time_diff_ms(results: &[DispatchResult]) -> f64 {
        let mut sent = results.iter().filter_map(|r| r.sent_at);
        let Some(first) = sent.next() else {
            return 0.0;
        };

        let (earliest, latest, count) = sent.fold(
            (first, first, 1usize),
            |(earliest, latest, count), t: Instant| (earliest.min(t), latest.max(t), count + 1),
        );

        if count < 2 {
            return 0.0;
        }
        latest.duration_since(earliest).as_secs_f64() * 1000.0
    }

    /// Assemble the outcome of one dispatch
    ///
    /// Send offsets are measured from `started`, the monotonic dispatch start.
    pub fn finalize(
        started: Instant,
        started_at: DateTime<Utc>,
        results: Vec<DispatchResult>,
        total_time_ms: f64,
    ) -> BroadcastOutcome {
        let results: Vec<_> = results
            .into_iter()
            .map(|r| r.with_sent_offset(started))
            .collect();
        let max_send_time_diff_ms = Self::max_send_time_diff_ms(&results);
        BroadcastOutcome {
            started_at,
            results,
            total_time_ms,
            max_send_time_diff_ms,
        }
    }
}
