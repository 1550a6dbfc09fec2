// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, IntoPublisher, Never, PassthroughSubject, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::{ErrorInjectingPublisher, RecordingSubscriber};
use std::sync::Arc;

#[test]
fn test_ignore_output_forwards_only_completion() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<Never>::with_demand(Demand::NONE);

    // Act
    (1..=1000).publisher().ignore_output().subscribe(Arc::clone(&recorder));

    // Assert
    assert!(recorder.values().is_empty());
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_ignore_output_forwards_failure() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<Never, &str>::unlimited();

    // Act
    ErrorInjectingPublisher::new(vec![1, 2, 3], "boom")
        .ignore_output()
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.completion(), Some(Completion::Failure("boom")));
    Ok(())
}

#[test]
fn test_ignore_output_waits_for_subject_completion() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32>::new();
    let recorder = RecordingSubscriber::<Never>::unlimited();
    subject.clone().ignore_output().subscribe(Arc::clone(&recorder));

    // Act
    subject.send(1)?;
    subject.send(2)?;

    // Assert
    assert!(!recorder.is_completed());

    // Act
    subject.finish()?;

    // Assert
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}
