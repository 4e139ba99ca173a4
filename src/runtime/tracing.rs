/// Initializes the tracing subscriber for the whole process.
///
/// Log verbosity is controlled through `RUST_LOG`, e.g. `RUST_LOG=info` or
/// `RUST_LOG=comanda=debug`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
