use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber with env-based filtering.
pub fn init_telemetry() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap());

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
