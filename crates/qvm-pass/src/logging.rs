use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// Verbosity comes from `RUST_LOG` only, defaulting to `warn` so the proxy
/// stays silent. Every flag on the command line belongs to the remote
/// command surface, so there is no local `--verbose`.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
