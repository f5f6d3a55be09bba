/// Initializes the tracing/logging infrastructure for the application.
///
/// Structured logging via the `tracing` crate, filtered by the `RUST_LOG`
/// environment variable:
/// - `RUST_LOG=info` - checkout and transition outcomes
/// - `RUST_LOG=debug` - retries, cart diffs, actor message flow
/// - `RUST_LOG=storefront_core=debug` - debug only for this crate
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
