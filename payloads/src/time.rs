//! Timers that work both in the browser and on a tokio runtime.

use std::future::Future;
use std::time::Duration;

use futures::future::{Either, select};

/// Resolve after `duration`.
#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Resolve after `duration`.
#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

/// Race `future` against a timer. Returns `None` if the timer wins, in which
/// case `future` is dropped before it completes.
pub async fn timeout<F: Future>(duration: Duration, future: F) -> Option<F::Output> {
    let future = Box::pin(future);
    let timer = Box::pin(sleep(duration));
    match select(future, timer).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(((), _)) => None,
    }
}
