use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use tracing::{info, warn};

/// Runs `operation`, logging its duration and outcome and recording the
/// `search_duration_seconds` histogram whether it succeeds or not.
pub async fn timed<T, E, F>(operation: &'static str, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let start = Instant::now();
    let result = fut.await;
    let elapsed = start.elapsed();
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    let outcome = match &result {
        Ok(_) => {
            info!(operation, elapsed_ms, outcome = "success", "Search finished");
            "success"
        }
        Err(e) => {
            warn!(operation, elapsed_ms, outcome = "error", error = %e, "Search failed");
            "error"
        }
    };

    metrics::histogram!(
        "search_duration_seconds",
        "operation" => operation,
        "outcome" => outcome
    )
    .record(elapsed.as_secs_f64());

    result
}
