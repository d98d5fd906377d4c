use std::env;
use tracing::warn;

/// True when the marker variable (e.g. `VIRTUAL_ENV`) is set and non-empty.
pub fn is_isolated(var: &str) -> bool {
    env::var_os(var).is_some_and(|v| !v.is_empty())
}

/// Warns, never fails, when running outside the site's isolated environment.
pub fn warn_if_not_isolated(var: &str) {
    if var.is_empty() {
        return;
    }
    if !is_isolated(var) {
        warn!(marker = var, "isolated environment not active");
    }
}
