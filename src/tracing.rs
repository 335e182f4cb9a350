use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber, logging to stderr so stdout stays free for
/// command output.
///
/// `default_filter` applies when `RUST_LOG` is unset. `compact` drops
/// timestamps and file locations for interactive use.
pub fn init_tracing(default_filter: &str, compact: bool) -> Result<(), anyhow::Error> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if compact {
        builder.without_time().compact().try_init()
    } else {
        builder
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to initialize tracing: {}", e))
}
