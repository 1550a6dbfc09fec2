// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::recording::RecordingSubscriber;
use rivulet_core::{Completion, Publisher};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Subscribes with unlimited demand and returns whatever arrived synchronously.
pub fn collect_sync<P>(publisher: &P) -> (Vec<P::Output>, Option<Completion<P::Failure>>)
where
    P: Publisher,
    P::Output: Clone,
    P::Failure: Clone,
{
    let recorder = RecordingSubscriber::<P::Output, P::Failure>::unlimited();
    publisher.subscribe(Arc::clone(&recorder));
    (recorder.values(), recorder.completion())
}

/// Waits until `recorder` holds at least `count` values.
///
/// # Panics
///
/// Panics if the values do not arrive within `timeout`.
pub async fn wait_for_values<T, E>(
    recorder: &RecordingSubscriber<T, E>,
    count: usize,
    timeout: Duration,
) where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let deadline = Instant::now() + timeout;
    while recorder.values().len() < count {
        assert!(
            Instant::now() < deadline,
            "expected {count} values, got {}",
            recorder.values().len()
        );
        sleep(Duration::from_millis(1)).await;
    }
}

/// Waits until `recorder` received its completion.
///
/// # Panics
///
/// Panics if the completion does not arrive within `timeout`.
pub async fn wait_for_completion<T, E>(recorder: &RecordingSubscriber<T, E>, timeout: Duration)
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let deadline = Instant::now() + timeout;
    while !recorder.is_completed() {
        assert!(Instant::now() < deadline, "expected a completion");
        sleep(Duration::from_millis(1)).await;
    }
}

/// Sleeps for `timeout_ms` and asserts `recorder` received nothing new.
///
/// # Panics
///
/// Panics if an event arrived meanwhile.
pub async fn assert_no_element_emitted<T, E>(recorder: &RecordingSubscriber<T, E>, timeout_ms: u64)
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let before = recorder.events().len();
    sleep(Duration::from_millis(timeout_ms)).await;
    assert_eq!(
        recorder.events().len(),
        before,
        "Unexpected element emitted, expected no output."
    );
}
