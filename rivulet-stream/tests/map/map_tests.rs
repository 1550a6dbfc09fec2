// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, IntoPublisher, PassthroughSubject, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::test_data::{animal_dog, person_alice, plant_rose, TestData};
use rivulet_test_utils::{ErrorInjectingPublisher, RecordingSubscriber};
use std::sync::Arc;

#[test]
fn test_map_transforms_each_value() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    (1..=3).publisher().map(|n| n * 2).subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![2, 4, 6]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_map_changes_output_type() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<u32>::unlimited();
    let fixtures = vec![person_alice(), animal_dog(), plant_rose()];

    // Act
    fixtures
        .publisher()
        .map(|data: TestData| data.measure())
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![25, 4, 15]);
    Ok(())
}

#[test]
fn test_map_respects_downstream_demand() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(2));

    // Act
    (1..=5).publisher().map(|n| n * 10).subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![10, 20]);
    assert!(!recorder.is_completed());

    // Act
    recorder.request(Demand::max(1));

    // Assert
    assert_eq!(recorder.values(), vec![10, 20, 30]);
    assert!(!recorder.is_completed());
    Ok(())
}

#[test]
fn test_map_forwards_failure_unchanged() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32, &str>::unlimited();

    // Act
    ErrorInjectingPublisher::new(vec![1, 2], "boom")
        .map(|n| n + 1)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![2, 3]);
    assert_eq!(recorder.completions(), vec![Completion::Failure("boom")]);
    Ok(())
}

#[test]
fn test_map_over_subject_sees_only_later_values() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32>::new();
    subject.send(1)?;
    let recorder = RecordingSubscriber::<String>::unlimited();
    subject
        .clone()
        .map(|n| format!("#{n}"))
        .subscribe(Arc::clone(&recorder));

    // Act
    subject.send(2)?;
    subject.send(3)?;

    // Assert
    assert_eq!(recorder.values(), vec!["#2".to_string(), "#3".to_string()]);
    assert!(!recorder.is_completed());
    Ok(())
}
