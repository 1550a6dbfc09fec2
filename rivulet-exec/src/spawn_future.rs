// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::trace;
use core::future::Future;
use rivulet_core::OneShot;
use rivulet_runtime::Runtime;

/// Runs `future` on `runtime` and publishes its result once.
///
/// The future is spawned immediately. Every subscriber, early or late, gets
/// the same value followed by `Finished`, or the same failure.
///
/// # Example
///
/// ```rust,no_run
/// use rivulet_core::SinkExt;
/// use rivulet_exec::spawn_future;
/// use rivulet_runtime::TokioRuntime;
///
/// # #[tokio::main]
/// # async fn main() {
/// let answer = spawn_future(&TokioRuntime, async { Ok::<_, String>(42) });
/// let _handle = answer.sink(|_| {}, |n| println!("{n}"));
/// # }
/// ```
pub fn spawn_future<R, Fut, T, E>(runtime: &R, future: Fut) -> OneShot<T, E>
where
    R: Runtime,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    OneShot::new(|promise| {
        runtime.spawn(async move {
            let result = future.await;
            trace!("spawn_future: resolved (ok = {})", result.is_ok());
            promise.fulfill(result);
        });
    })
}
