use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Compact stderr logging. `RUST_LOG` wins over `verbose` when set.
pub fn init_logger(verbose: bool) {
    let default = if verbose {
        "tally_cli=debug,tally_ingest=debug,tally_finance=debug"
    } else {
        "tally_cli=info,tally_ingest=warn,tally_finance=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
