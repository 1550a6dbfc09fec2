// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{
    Cancellables, Completion, CurrentValueSubject, IntoPublisher, PassthroughSubject, Publisher,
};
use rivulet_stream::prelude::*;
use rivulet_test_utils::RecordingSubscriber;
use std::sync::Arc;

#[test]
fn test_subscribe_subject_relays_values_and_completion() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32>::new();
    let recorder = RecordingSubscriber::<i32>::unlimited();
    subject.subscribe(Arc::clone(&recorder));

    // Act
    let _feed = vec![1, 2, 3].publisher().subscribe_subject(subject.clone());

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    assert!(subject.is_completed());
    Ok(())
}

#[test]
fn test_cancelling_feed_leaves_subject_open() -> anyhow::Result<()> {
    // Arrange
    let source = PassthroughSubject::<i32>::new();
    let subject = PassthroughSubject::<i32>::new();
    let recorder = RecordingSubscriber::<i32>::unlimited();
    subject.subscribe(Arc::clone(&recorder));
    let feed = source.subscribe_subject(subject.clone());
    source.send(1)?;

    // Act
    feed.cancel();
    source.send(2)?;
    subject.send(3)?;

    // Assert
    assert_eq!(recorder.values(), vec![1, 3]);
    assert!(!subject.is_completed());
    assert_eq!(source.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_subscribe_subject_updates_current_value() -> anyhow::Result<()> {
    // Arrange
    let subject = CurrentValueSubject::<i32>::new(0);
    let source = PassthroughSubject::<i32>::new();
    let _feed = source.subscribe_subject(subject.clone());

    // Act
    source.send(41)?;
    source.send(42)?;

    // Assert
    assert_eq!(subject.value(), 42);
    Ok(())
}

#[test]
fn test_dropping_registry_cancels_stored_feed() -> anyhow::Result<()> {
    // Arrange
    let source = PassthroughSubject::<i32>::new();
    let subject = CurrentValueSubject::<i32>::new(0);
    let mut registry = Cancellables::new();
    source
        .subscribe_subject(subject.clone())
        .store(&mut registry);

    // Act
    drop(registry);
    source.send(7)?;

    // Assert
    assert_eq!(subject.value(), 0);
    assert_eq!(source.subscriber_count(), 0);
    Ok(())
}
