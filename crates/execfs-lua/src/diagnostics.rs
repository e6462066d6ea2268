//! The host diagnostic stream.
//!
//! Load-time failures are reported through `tracing`. A host that embeds the
//! extension without installing a subscriber still gets warnings and errors
//! on stderr.

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber at `warn` unless one is already set.
///
/// Returns `true` if this call installed the subscriber.
pub fn init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        assert!(!init());
    }
}
