#![allow(dead_code)]

use std::time::Duration;
use tower_fifo_limit::BoxError;

pub(crate) fn trace_init() -> tracing::subscriber::DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .with_thread_names(true)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Let spawned dispatch and work tasks run before the test continues.
pub(crate) async fn let_dispatch_run() {
    tokio::task::yield_now().await;
}

/// Work that completes after `millis` of (usually paused) time.
pub(crate) async fn delay(millis: u64) -> Result<(), BoxError> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Ok(())
}
