pub mod stub_provider;

/// Route library logs to the test harness. `RUST_LOG=mocap_stream=debug`
/// shows the poll loops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
