// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, IntoPublisher, PassthroughSubject, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::test_data::{animal_cat, animal_dog, person_alice, TestData};
use rivulet_test_utils::RecordingSubscriber;
use std::sync::Arc;

#[test]
fn test_remove_duplicates_collapses_consecutive_runs() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    vec![1, 2, 2, 2, 3, 4, 5, 5, 6]
        .publisher()
        .remove_duplicates()
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_remove_duplicates_keeps_non_adjacent_repeats() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    vec![1, 2, 1, 1, 2]
        .publisher()
        .remove_duplicates()
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 1, 2]);
    Ok(())
}

#[test]
fn test_remove_duplicates_by_custom_equality() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<TestData>::unlimited();

    // Act
    vec![animal_dog(), animal_cat(), person_alice()]
        .publisher()
        .remove_duplicates_by(|a: &TestData, b: &TestData| a.measure() == b.measure())
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![animal_dog(), person_alice()]);
    Ok(())
}

#[test]
fn test_remove_duplicates_requests_replacement_for_skipped_values() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(2));

    // Act
    vec![7, 7, 7, 8, 8, 9]
        .publisher()
        .remove_duplicates()
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![7, 8]);
    assert!(!recorder.is_completed());
    Ok(())
}

#[test]
fn test_remove_duplicates_state_is_per_subscription() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32>::new();
    let deduplicated = subject.clone().remove_duplicates();
    let first = RecordingSubscriber::<i32>::unlimited();
    deduplicated.subscribe(Arc::clone(&first));
    subject.send(1)?;

    // Act
    let second = RecordingSubscriber::<i32>::unlimited();
    deduplicated.subscribe(Arc::clone(&second));
    subject.send(1)?;

    // Assert
    assert_eq!(first.values(), vec![1]);
    assert_eq!(second.values(), vec![1]);
    Ok(())
}
