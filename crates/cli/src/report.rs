//! Human-readable broadcast report

use std::fmt::Write as _;

use contracts::BroadcastOutcome;

/// Per-target lines shown in the report
pub const REPORT_RESULT_LINES: usize = 6;

/// Max chars of response text per line
pub const SNIPPET_CHARS: usize = 200;

/// First `SNIPPET_CHARS` chars with newlines flattened to spaces
pub fn snippet(response: &str) -> String {
    response
        .chars()
        .take(SNIPPET_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Render the outcome summary and the first per-target lines
pub fn format_report(outcome: &BroadcastOutcome) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "Completed. Success {}/{}",
        outcome.success_count(),
        outcome.results.len()
    );
    let _ = writeln!(text, "Total wall-time: {:.1} ms", outcome.total_time_ms);
    let _ = writeln!(
        text,
        "Max send-time diff: {:.3} ms",
        outcome.max_send_time_diff_ms
    );
    let _ = writeln!(
        text,
        "Network time: {}",
        observability::network_time_stats(outcome)
    );
    let _ = writeln!(text);
    let _ = writeln!(text, "Top responses:");

    for result in outcome.results.iter().take(REPORT_RESULT_LINES) {
        let status = if result.success { "OK" } else { "ERR" };
        let _ = writeln!(
            text,
            "- {}: {} | {:.1} ms | {}",
            result.target,
            status,
            result.network_time_ms,
            snippet(&result.response)
        );
    }

    let hidden = outcome.results.len().saturating_sub(REPORT_RESULT_LINES);
    if hidden > 0 {
        let _ = writeln!(text, "... and {hidden} more");
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contracts::DispatchResult;
    use std::time::Instant;

    fn outcome(results: Vec<DispatchResult>) -> BroadcastOutcome {
        BroadcastOutcome {
            started_at: Utc::now(),
            results,
            total_time_ms: 123.456,
            max_send_time_diff_ms: 0.1234,
        }
    }

    #[test]
    fn test_snippet_flattens_and_caps() {
        assert_eq!(snippet("a\nb\r\nc"), "a b  c");
        assert_eq!(snippet(&"é".repeat(300)).chars().count(), 200);
    }

    #[test]
    fn test_report_header() {
        let now = Instant::now();
        let report = format_report(&outcome(vec![
            DispatchResult::responded("alpha", 200, 12.34, "ok\nfine", now),
            DispatchResult::failed("bravo", "Connection refused", 1.0, Some(now)),
        ]));

        assert!(report.contains("Success 1/2"));
        assert!(report.contains("Total wall-time: 123.5 ms"));
        assert!(report.contains("Max send-time diff: 0.123 ms"));
        assert!(report.contains("- alpha: OK | 12.3 ms | ok fine"));
        assert!(report.contains("- bravo: ERR | 1.0 ms | Connection refused"));
    }

    #[test]
    fn test_report_limits_lines() {
        let results = (0..8)
            .map(|i| DispatchResult::no_response(format!("t{i}")))
            .collect();
        let report = format_report(&outcome(results));

        assert!(report.contains("- t5: ERR"));
        assert!(!report.contains("- t6:"));
        assert!(report.contains("... and 2 more"));
    }
}
