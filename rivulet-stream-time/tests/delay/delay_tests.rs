// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, IntoPublisher, PassthroughSubject, Publisher};
use rivulet_runtime::TokioRuntime;
use rivulet_stream::prelude::*;
use rivulet_stream_time::prelude::*;
use rivulet_test_utils::test_data::{person_alice, person_bob, person_charlie, TestData};
use rivulet_test_utils::{
    assert_no_element_emitted, wait_for_completion, wait_for_values, RecordingSubscriber,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_delay_holds_values_back() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<TestData>::new();
    let recorder = RecordingSubscriber::<TestData>::unlimited();
    subject
        .clone()
        .delay(Duration::from_millis(200), TokioRuntime)
        .subscribe(Arc::clone(&recorder));

    // Act
    subject.send(person_alice())?;

    // Assert
    assert_no_element_emitted(&recorder, 50).await;
    wait_for_values(&recorder, 1, TIMEOUT).await;
    assert_eq!(recorder.values(), vec![person_alice()]);
    Ok(())
}

#[tokio::test]
async fn test_delay_waits_at_least_the_offset() -> anyhow::Result<()> {
    // Arrange
    let offset = Duration::from_millis(80);
    let recorder = RecordingSubscriber::<i32>::unlimited();
    let started = Instant::now();

    // Act
    vec![1].publisher().delay(offset, TokioRuntime).subscribe(Arc::clone(&recorder));
    wait_for_values(&recorder, 1, TIMEOUT).await;

    // Assert
    assert!(started.elapsed() >= offset);
    Ok(())
}

#[tokio::test]
async fn test_delay_preserves_order() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<usize>::new();
    let recorder = RecordingSubscriber::<usize>::unlimited();
    subject
        .clone()
        .delay(Duration::from_millis(10), TokioRuntime)
        .subscribe(Arc::clone(&recorder));

    // Act
    for n in 0..100 {
        subject.send(n)?;
    }

    // Assert
    wait_for_values(&recorder, 100, TIMEOUT).await;
    assert_eq!(recorder.values(), (0..100).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test]
async fn test_delay_shifts_completion_after_values() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<TestData>::unlimited();

    // Act
    vec![person_alice(), person_bob(), person_charlie()]
        .publisher()
        .delay(Duration::from_millis(30), TokioRuntime)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert!(!recorder.is_completed());
    wait_for_completion(&recorder, TIMEOUT).await;
    assert_eq!(
        recorder.values(),
        vec![person_alice(), person_bob(), person_charlie()]
    );
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}

#[tokio::test]
async fn test_delay_passes_demand_through() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(2));
    (1..=5)
        .publisher()
        .delay(Duration::from_millis(10), TokioRuntime)
        .subscribe(Arc::clone(&recorder));
    wait_for_values(&recorder, 2, TIMEOUT).await;
    assert_no_element_emitted(&recorder, 50).await;

    // Act
    recorder.request(Demand::max(1));

    // Assert
    wait_for_values(&recorder, 3, TIMEOUT).await;
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert!(!recorder.is_completed());
    Ok(())
}

#[tokio::test]
async fn test_cancel_drops_scheduled_values() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32>::new();
    let recorder = RecordingSubscriber::<i32>::unlimited();
    subject
        .clone()
        .delay(Duration::from_millis(50), TokioRuntime)
        .subscribe(Arc::clone(&recorder));
    subject.send(1)?;

    // Act
    recorder.cancel();
    subject.send(2)?;

    // Assert
    assert_no_element_emitted(&recorder, 150).await;
    assert!(recorder.values().is_empty());
    assert_eq!(subject.subscriber_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_delay_composes_with_operators() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<u32>::unlimited();

    // Act
    vec![person_alice(), person_bob()]
        .publisher()
        .delay(Duration::from_millis(10), TokioRuntime)
        .map(|person| person.measure())
        .scan(0, |total, age| total + age)
        .subscribe(Arc::clone(&recorder));

    // Assert
    wait_for_completion(&recorder, TIMEOUT).await;
    assert_eq!(recorder.values(), vec![25, 55]);
    Ok(())
}
