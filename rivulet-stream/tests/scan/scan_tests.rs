// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, IntoPublisher, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::test_data::{person_alice, person_bob, person_charlie, TestData};
use rivulet_test_utils::{ErrorInjectingPublisher, RecordingSubscriber};
use std::sync::Arc;

#[test]
fn test_scan_emits_running_accumulation() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    (1..=4)
        .publisher()
        .scan(0, |total, n| total + n)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 3, 6, 10]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_scan_does_not_emit_the_seed() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    Vec::<i32>::new()
        .publisher()
        .scan(100, |total, n| total + n)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert!(recorder.values().is_empty());
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_scan_builds_collections() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<Vec<u32>>::unlimited();

    // Act
    vec![person_alice(), person_bob(), person_charlie()]
        .publisher()
        .scan(Vec::new(), |ages: &Vec<u32>, person: TestData| {
            let mut ages = ages.clone();
            ages.push(person.measure());
            ages
        })
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(
        recorder.values(),
        vec![vec![25], vec![25, 30], vec![25, 30, 35]]
    );
    Ok(())
}

#[test]
fn test_scan_restarts_from_seed_for_each_subscriber() -> anyhow::Result<()> {
    // Arrange
    let running = (1..=3).publisher().scan(0, |total, n| total + n);
    let first = RecordingSubscriber::<i32>::unlimited();
    let second = RecordingSubscriber::<i32>::unlimited();

    // Act
    running.subscribe(Arc::clone(&first));
    running.subscribe(Arc::clone(&second));

    // Assert
    assert_eq!(first.values(), vec![1, 3, 6]);
    assert_eq!(second.values(), vec![1, 3, 6]);
    Ok(())
}

#[test]
fn test_scan_forwards_failure() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32, &str>::unlimited();

    // Act
    ErrorInjectingPublisher::new(vec![1, 2], "boom")
        .scan(0, |total, n| total + n)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 3]);
    assert_eq!(recorder.completion(), Some(Completion::Failure("boom")));
    Ok(())
}
