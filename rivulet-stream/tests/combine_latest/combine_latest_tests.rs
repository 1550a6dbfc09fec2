// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, IntoPublisher, PassthroughSubject, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::test_data::{
    animal_cat, animal_dog, person_alice, person_bob, plant_rose, TestData,
};
use rivulet_test_utils::RecordingSubscriber;
use std::sync::Arc;

#[test]
fn test_combine_latest_emits_after_every_upstream_emitted() -> anyhow::Result<()> {
    // Arrange
    let numbers = PassthroughSubject::<i32>::new();
    let letters = PassthroughSubject::<char>::new();
    let recorder = RecordingSubscriber::<(i32, char)>::unlimited();
    numbers
        .clone()
        .combine_latest(letters.clone())
        .subscribe(Arc::clone(&recorder));

    // Act
    numbers.send(1)?;
    numbers.send(2)?;

    // Assert
    assert!(recorder.values().is_empty());

    // Act
    letters.send('a')?;
    numbers.send(3)?;
    letters.send('b')?;

    // Assert
    assert_eq!(recorder.values(), vec![(2, 'a'), (3, 'a'), (3, 'b')]);
    assert!(!recorder.is_completed());
    Ok(())
}

#[test]
fn test_combine_latest_finishes_when_all_upstreams_finish() -> anyhow::Result<()> {
    // Arrange
    let numbers = PassthroughSubject::<i32>::new();
    let letters = PassthroughSubject::<char>::new();
    let recorder = RecordingSubscriber::<(i32, char)>::unlimited();
    numbers
        .clone()
        .combine_latest(letters.clone())
        .subscribe(Arc::clone(&recorder));
    numbers.send(1)?;
    letters.send('a')?;

    // Act
    numbers.finish()?;
    letters.send('b')?;

    // Assert
    assert_eq!(recorder.values(), vec![(1, 'a'), (1, 'b')]);
    assert!(!recorder.is_completed());

    // Act
    letters.finish()?;

    // Assert
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}

#[test]
fn test_combine_latest_of_sequences() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<(i32, char)>::unlimited();

    // Act
    vec![1, 2]
        .publisher()
        .combine_latest(vec!['a', 'b'].publisher())
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![(2, 'a'), (2, 'b')]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_combine_latest_finishes_early_when_upstream_never_emitted() -> anyhow::Result<()> {
    // Arrange
    let left = PassthroughSubject::<i32>::new();
    let right = PassthroughSubject::<i32>::new();
    let recorder = RecordingSubscriber::<(i32, i32)>::unlimited();
    left.clone()
        .combine_latest(right.clone())
        .subscribe(Arc::clone(&recorder));
    left.send(1)?;

    // Act
    right.finish()?;

    // Assert
    assert!(recorder.values().is_empty());
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    assert_eq!(left.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_combine_latest3_with_fixtures() -> anyhow::Result<()> {
    // Arrange
    let people = PassthroughSubject::<TestData>::new();
    let animals = PassthroughSubject::<TestData>::new();
    let plants = PassthroughSubject::<TestData>::new();
    let recorder = RecordingSubscriber::<(TestData, TestData, TestData)>::unlimited();
    people
        .clone()
        .combine_latest3(animals.clone(), plants.clone())
        .subscribe(Arc::clone(&recorder));

    // Act
    people.send(person_alice())?;
    animals.send(animal_dog())?;
    plants.send(plant_rose())?;
    animals.send(animal_cat())?;
    people.send(person_bob())?;

    // Assert
    assert_eq!(
        recorder.values(),
        vec![
            (person_alice(), animal_dog(), plant_rose()),
            (person_alice(), animal_cat(), plant_rose()),
            (person_bob(), animal_cat(), plant_rose()),
        ]
    );
    Ok(())
}

#[test]
fn test_combine_latest4_emits_tuple_of_four() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<(i32, i32, i32, i32)>::unlimited();

    // Act
    vec![1]
        .publisher()
        .combine_latest4(
            vec![2].publisher(),
            vec![3].publisher(),
            vec![4].publisher(),
        )
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![(1, 2, 3, 4)]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_combine_latest_holds_combinations_until_requested() -> anyhow::Result<()> {
    // Arrange
    let numbers = PassthroughSubject::<i32>::new();
    let letters = PassthroughSubject::<char>::new();
    let recorder = RecordingSubscriber::<(i32, char)>::with_demand(Demand::max(1));
    numbers
        .clone()
        .combine_latest(letters.clone())
        .subscribe(Arc::clone(&recorder));

    // Act
    numbers.send(1)?;
    letters.send('a')?;
    letters.send('b')?;
    numbers.send(2)?;

    // Assert
    assert_eq!(recorder.values(), vec![(1, 'a')]);

    // Act
    recorder.request(Demand::max(2));

    // Assert
    assert_eq!(recorder.values(), vec![(1, 'a'), (1, 'b'), (2, 'b')]);
    Ok(())
}
