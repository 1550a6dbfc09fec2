// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, IntoPublisher, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::test_data::{
    animal_dog, person_alice, person_bob, plant_rose, TestData,
};
use rivulet_test_utils::{ErrorInjectingPublisher, RecordingSubscriber};
use std::sync::Arc;

#[test]
fn test_filter_keeps_matching_values() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<TestData>::unlimited();
    let fixtures = vec![person_alice(), animal_dog(), person_bob(), plant_rose()];

    // Act
    fixtures
        .publisher()
        .filter(TestData::is_person)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![person_alice(), person_bob()]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_filter_rejecting_everything_still_finishes() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    (1..=100).publisher().filter(|_| false).subscribe(Arc::clone(&recorder));

    // Assert
    assert!(recorder.values().is_empty());
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_filter_replaces_demand_for_dropped_values() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(3));

    // Act
    (1..=20)
        .publisher()
        .filter(|n| n % 5 == 0)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![5, 10, 15]);
    assert!(!recorder.is_completed());
    Ok(())
}

#[test]
fn test_filter_forwards_failure() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32, &str>::unlimited();

    // Act
    ErrorInjectingPublisher::new(vec![1, 2, 3, 4], "boom")
        .filter(|n| n % 2 == 0)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![2, 4]);
    assert_eq!(recorder.completion(), Some(Completion::Failure("boom")));
    Ok(())
}
