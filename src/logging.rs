use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Setup logging to stderr.
///
/// stdout is left to command output. `RUST_LOG` takes precedence over the
/// `verbose` flag when set.
///
/// # Arguments
/// * `verbose` - If true, use debug level; otherwise use info level
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // Fails only if a subscriber is already installed (e.g. in tests)
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();

    tracing::debug!("Logging initialized: verbose={}", verbose);
}
