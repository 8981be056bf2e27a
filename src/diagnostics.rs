use chrono::{DateTime, Utc};

/// Logs how long `scope` took since `started_at`.
#[inline]
pub fn log_perf(scope: &str, started_at: DateTime<Utc>, details: &str) {
    let elapsed_ms = (Utc::now() - started_at).num_milliseconds();
    if details.trim().is_empty() {
        tracing::debug!("[perf] {scope} took {elapsed_ms}ms");
    } else {
        tracing::debug!("[perf] {scope} took {elapsed_ms}ms | {details}");
    }
}
