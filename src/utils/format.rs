//! Human-readable time formatting

use std::time::Duration;

/// Render a remaining time as `M:SS`, truncating fractional seconds.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
