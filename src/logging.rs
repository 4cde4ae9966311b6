use env_logger::Env;

/// Initialise logging for the binary.
///
/// The default is `env_logger` with an `info` filter. With `use_tracing` a
/// `tracing` fmt subscriber is installed instead and `log` records are bridged
/// into it. Both honour `RUST_LOG`.
pub fn init_logging(use_tracing: bool) {
    if use_tracing {
        init_tracing_from_env();
    } else {
        let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .format_timestamp_millis()
            .try_init();
    }
}

pub fn init_tracing_from_env() {
    // Bridge log:: macros into tracing so library logging keeps working
    let _ = tracing_log::LogTracer::init();
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
