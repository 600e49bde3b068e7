//! Query-parameter coercion.

use tracing::debug;

/// Parse a numeric query parameter the permissive way the clients expect:
/// an empty or unparsable value coerces to 0 and is never surfaced as an
/// error.
pub fn parse_number(raw: &str) -> i64 {
    match raw.parse::<i64>() {
        Ok(number) => number,
        Err(err) => {
            if !raw.is_empty() {
                debug!(raw, error = %err, "Coercing unparsable number to 0");
            }
            0
        }
    }
}
