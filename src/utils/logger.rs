use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins when set; otherwise `verbose` turns on this crate's debug
/// lines.
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "priority_classifier=debug,info"
        } else {
            "priority_classifier=info"
        })
    })
}

/// Compact human-readable lines, or JSON lines on stderr when `json` is set
/// so stdout keeps only the results table.
pub fn init_logger(verbose: bool, json: bool) {
    let registry = tracing_subscriber::registry().with(log_filter(verbose));

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init();
    }
}
