// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, IntoPublisher, PassthroughSubject, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::RecordingSubscriber;
use std::sync::Arc;

#[test]
fn test_drop_first_skips_leading_values() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    (1..=5).publisher().drop_first(2).subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![3, 4, 5]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_drop_first_more_than_available() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    vec![1, 2].publisher().drop_first(10).subscribe(Arc::clone(&recorder));

    // Assert
    assert!(recorder.values().is_empty());
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_drop_first_skipped_values_do_not_count_against_demand() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(2));

    // Act
    (1..=10).publisher().drop_first(3).subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![4, 5]);
    assert!(!recorder.is_completed());
    Ok(())
}

#[test]
fn test_drop_first_counts_per_subscription() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32>::new();
    let skipping = subject.clone().drop_first(1);
    let early = RecordingSubscriber::<i32>::unlimited();
    skipping.subscribe(Arc::clone(&early));
    subject.send(1)?;
    let late = RecordingSubscriber::<i32>::unlimited();
    skipping.subscribe(Arc::clone(&late));

    // Act
    subject.send(2)?;
    subject.send(3)?;

    // Assert
    assert_eq!(early.values(), vec![2, 3]);
    assert_eq!(late.values(), vec![3]);
    Ok(())
}
