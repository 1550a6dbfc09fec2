// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, IntoPublisher, PassthroughSubject, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::test_data::{animal_dog, person_alice, person_bob, TestData};
use rivulet_test_utils::{ErrorInjectingPublisher, RecordingSubscriber};
use std::sync::Arc;

#[test]
fn test_prefix_takes_first_values_of_infinite_upstream() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<u64>::unlimited();

    // Act
    (1_u64..).publisher().prefix(3).subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}

#[test]
fn test_prefix_zero_finishes_without_subscribing_upstream() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32>::new();
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    subject.clone().prefix(0).subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(subject.subscriber_count(), 0);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_prefix_cancels_upstream_once_count_reached() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<TestData>::new();
    let recorder = RecordingSubscriber::<TestData>::unlimited();
    subject.clone().prefix(2).subscribe(Arc::clone(&recorder));

    // Act
    subject.send(person_alice())?;
    subject.send(person_bob())?;
    subject.send(animal_dog())?;

    // Assert
    assert_eq!(recorder.values(), vec![person_alice(), person_bob()]);
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    assert_eq!(subject.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_prefix_shorter_upstream_finishes_normally() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    vec![1, 2].publisher().prefix(5).subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}

#[test]
fn test_prefix_respects_demand() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(1));

    // Act
    (1..=10).publisher().prefix(3).subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert!(!recorder.is_completed());

    // Act
    recorder.request(Demand::max(5));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}

#[test]
fn test_prefix_while_stops_at_first_rejected_value() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    vec![1, 2, 5, 1, 6]
        .publisher()
        .prefix_while(|n| *n < 3)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}

#[test]
fn test_prefix_while_forwards_failure_before_rejection() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32, &str>::unlimited();

    // Act
    ErrorInjectingPublisher::new(vec![1, 2], "boom")
        .prefix_while(|n| *n < 3)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);
    assert_eq!(recorder.completion(), Some(Completion::Failure("boom")));
    Ok(())
}
