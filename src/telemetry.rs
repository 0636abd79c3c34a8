//! Logging setup shared by every command.
//!
//! `RUST_LOG` wins when set. Otherwise this crate logs at `info`, or `debug`
//! with `--verbose`. Output goes to stderr so `--json` command output stays
//! machine-readable.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "prime_numbers=debug,prime_common=debug,info"
    } else {
        "warn,prime_numbers=info"
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
