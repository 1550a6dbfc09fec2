// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, IntoPublisher, Just, PassthroughSubject, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::RecordingSubscriber;
use std::sync::Arc;

#[test]
fn test_prefix_until_output_from_finishes_on_trigger() -> anyhow::Result<()> {
    // Arrange
    let values = PassthroughSubject::<i32>::new();
    let stop = PassthroughSubject::<()>::new();
    let recorder = RecordingSubscriber::<i32>::unlimited();
    values
        .clone()
        .prefix_until_output_from(stop.clone())
        .subscribe(Arc::clone(&recorder));

    // Act
    values.send(1)?;
    values.send(2)?;
    stop.send(())?;
    values.send(3)?;

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    assert_eq!(values.subscriber_count(), 0);
    assert_eq!(stop.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_prefix_until_output_from_ignores_trigger_completion() -> anyhow::Result<()> {
    // Arrange
    let values = PassthroughSubject::<i32>::new();
    let stop = PassthroughSubject::<&'static str, &'static str>::new();
    let recorder = RecordingSubscriber::<i32>::unlimited();
    values
        .clone()
        .prefix_until_output_from(stop.clone())
        .subscribe(Arc::clone(&recorder));

    // Act
    stop.send_completion(Completion::Failure("trigger broke"))?;
    values.send(1)?;
    values.finish()?;

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}

#[test]
fn test_prefix_until_output_from_with_immediate_trigger_emits_nothing() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    (1..=5)
        .publisher()
        .prefix_until_output_from(Just::new(true))
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert!(recorder.values().is_empty());
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}
