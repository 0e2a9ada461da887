use tracing_subscriber::{fmt, EnvFilter};

/// Install the console subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this crate and HTTP
/// internals stay at `warn`. Calling this twice is harmless.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,seo_rank_report={level},reqwest=warn,hyper=warn,hyper_util=warn"
        ))
    });
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
