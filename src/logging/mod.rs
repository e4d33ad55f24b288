// Logging setup
//
// Installs a tracing-subscriber fmt layer. RUST_LOG, when set, wins over the
// verbosity passed on the command line.

use tracing_subscriber::EnvFilter;

/// Map `-v` counts to a default filter.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "upvpn_core=warn,upvpn=warn",
        1 => "upvpn_core=info,upvpn=info",
        2 => "upvpn_core=debug,upvpn=debug",
        _ => "trace",
    }
}

/// Initialise global logging. Safe to call more than once; later calls are
/// ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert!(default_filter(0).contains("warn"));
        assert!(default_filter(1).contains("info"));
        assert!(default_filter(2).contains("debug"));
        assert_eq!(default_filter(9), "trace");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(0);
        init(2);
    }
}
