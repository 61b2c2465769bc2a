//! Tracing subscriber initialization.
//!
//! JSON lines on stderr, so a binary's stdout stays free for its own output.

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` when set and valid, otherwise `default_directives`.
pub fn filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(default_directives: &str) -> bool {
    let filter = filter(default_directives);
    let directives = filter.to_string();
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    if installed {
        ::tracing::debug!(filter = %directives, "logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_falls_back_to_default_directives() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(filter("warn").to_string(), "warn");
        }
    }

    #[test]
    fn second_init_is_a_no_op() {
        init("warn");
        assert!(!init("debug"));
    }
}
