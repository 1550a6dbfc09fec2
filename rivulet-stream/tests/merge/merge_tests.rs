// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, IntoPublisher, PassthroughSubject, Publisher, Sequence};
use rivulet_stream::prelude::*;
use rivulet_test_utils::test_data::{animal_dog, person_alice, person_bob, TestData};
use rivulet_test_utils::RecordingSubscriber;
use std::sync::Arc;

#[test]
fn test_merge_interleaves_in_arrival_order() -> anyhow::Result<()> {
    // Arrange
    let people = PassthroughSubject::<TestData>::new();
    let animals = PassthroughSubject::<TestData>::new();
    let recorder = RecordingSubscriber::<TestData>::unlimited();
    people
        .clone()
        .merge(animals.clone())
        .subscribe(Arc::clone(&recorder));

    // Act
    people.send(person_alice())?;
    animals.send(animal_dog())?;
    people.send(person_bob())?;

    // Assert
    assert_eq!(
        recorder.values(),
        vec![person_alice(), animal_dog(), person_bob()]
    );
    Ok(())
}

#[test]
fn test_merge_finishes_after_every_upstream_finished() -> anyhow::Result<()> {
    // Arrange
    let left = PassthroughSubject::<i32>::new();
    let right = PassthroughSubject::<i32>::new();
    let recorder = RecordingSubscriber::<i32>::unlimited();
    left.clone().merge(right.clone()).subscribe(Arc::clone(&recorder));

    // Act
    left.send(1)?;
    left.finish()?;
    right.send(2)?;

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);
    assert!(!recorder.is_completed());

    // Act
    right.finish()?;

    // Assert
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}

#[test]
fn test_merge_never_exceeds_downstream_demand() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(2));

    // Act
    (1..=5)
        .publisher()
        .merge((11..=15).publisher())
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);

    // Act
    recorder.request(Demand::max(1));

    // Assert
    assert_eq!(recorder.values().len(), 3);
    assert!(!recorder.is_completed());

    // Act
    recorder.request(Demand::Unlimited);

    // Assert
    let mut values = recorder.values();
    values.sort_unstable();
    assert_eq!(values, vec![1, 2, 3, 4, 5, 11, 12, 13, 14, 15]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_merge_all_of_sequences() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    merge_all(vec![
        vec![1, 2].publisher(),
        vec![3].publisher(),
        vec![4, 5].publisher(),
    ])
    .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3, 4, 5]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_merge_all_of_nothing_finishes_immediately() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    merge_all(Vec::<Sequence<Vec<i32>>>::new()).subscribe(Arc::clone(&recorder));

    // Assert
    assert!(recorder.values().is_empty());
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}
