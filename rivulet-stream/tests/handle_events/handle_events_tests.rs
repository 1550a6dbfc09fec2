// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use rivulet_core::{Completion, Demand, IntoPublisher, PassthroughSubject, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::{ErrorInjectingPublisher, RecordingSubscriber};
use std::sync::Arc;

type Log = Arc<Mutex<Vec<String>>>;

fn logging_handlers<E: std::fmt::Debug>(log: &Log) -> EventHandlers<i32, E> {
    let (subscriptions, outputs, completions, cancels, requests) = (
        Arc::clone(log),
        Arc::clone(log),
        Arc::clone(log),
        Arc::clone(log),
        Arc::clone(log),
    );
    EventHandlers::new()
        .on_subscription(move || subscriptions.lock().push("subscription".to_string()))
        .on_output(move |n| outputs.lock().push(format!("output {n}")))
        .on_completion(move |c| completions.lock().push(format!("completion {c:?}")))
        .on_cancel(move || cancels.lock().push("cancel".to_string()))
        .on_request(move |d| requests.lock().push(format!("request {d:?}")))
}

#[test]
fn test_handle_events_observes_every_signal_in_order() -> anyhow::Result<()> {
    // Arrange
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(2));

    // Act
    vec![1, 2]
        .publisher()
        .handle_events(logging_handlers(&log))
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(
        *log.lock(),
        vec![
            "subscription".to_string(),
            format!("request {:?}", Demand::max(2)),
            "output 1".to_string(),
            "output 2".to_string(),
            format!("completion {:?}", Completion::<rivulet_core::Never>::Finished),
        ]
    );
    assert_eq!(recorder.values(), vec![1, 2]);
    Ok(())
}

#[test]
fn test_handle_events_observes_cancel() -> anyhow::Result<()> {
    // Arrange
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let subject = PassthroughSubject::<i32>::new();
    let recorder = RecordingSubscriber::<i32>::unlimited();
    subject
        .clone()
        .handle_events(logging_handlers(&log))
        .subscribe(Arc::clone(&recorder));
    subject.send(1)?;

    // Act
    recorder.cancel();
    subject.send(2)?;

    // Assert
    assert_eq!(log.lock().last().cloned(), Some("cancel".to_string()));
    assert_eq!(recorder.values(), vec![1]);
    assert_eq!(subject.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_handle_events_observes_failure() -> anyhow::Result<()> {
    // Arrange
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let recorder = RecordingSubscriber::<i32, &str>::unlimited();

    // Act
    ErrorInjectingPublisher::new(vec![5], "boom")
        .handle_events(logging_handlers(&log))
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(
        log.lock().last().cloned(),
        Some(format!("completion {:?}", Completion::Failure("boom")))
    );
    assert_eq!(recorder.completion(), Some(Completion::Failure("boom")));
    Ok(())
}

#[test]
fn test_handle_events_without_handlers_is_transparent() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    (1..=3)
        .publisher()
        .handle_events(EventHandlers::default())
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}
