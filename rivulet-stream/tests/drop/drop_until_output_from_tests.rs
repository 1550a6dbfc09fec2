// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, PassthroughSubject, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::RecordingSubscriber;
use std::sync::Arc;

#[test]
fn test_drop_until_output_from_opens_on_trigger() -> anyhow::Result<()> {
    // Arrange
    let values = PassthroughSubject::<i32>::new();
    let start = PassthroughSubject::<u8>::new();
    let recorder = RecordingSubscriber::<i32>::unlimited();
    values
        .clone()
        .drop_until_output_from(start.clone())
        .subscribe(Arc::clone(&recorder));

    // Act
    values.send(1)?;
    start.send(0)?;
    values.send(2)?;
    values.send(3)?;

    // Assert
    assert_eq!(recorder.values(), vec![2, 3]);
    assert_eq!(start.subscriber_count(), 0);
    assert!(!recorder.is_completed());
    Ok(())
}

#[test]
fn test_drop_until_output_from_silent_trigger_drops_everything() -> anyhow::Result<()> {
    // Arrange
    let values = PassthroughSubject::<i32>::new();
    let start = PassthroughSubject::<u8>::new();
    let recorder = RecordingSubscriber::<i32>::unlimited();
    values
        .clone()
        .drop_until_output_from(start.clone())
        .subscribe(Arc::clone(&recorder));

    // Act
    start.finish()?;
    values.send(1)?;
    values.send(2)?;
    values.finish()?;

    // Assert
    assert!(recorder.values().is_empty());
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}

#[test]
fn test_drop_until_output_from_respects_demand_after_opening() -> anyhow::Result<()> {
    // Arrange
    let values = PassthroughSubject::<i32>::new();
    let start = PassthroughSubject::<u8>::new();
    let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(1));
    values
        .clone()
        .drop_until_output_from(start.clone())
        .subscribe(Arc::clone(&recorder));

    // Act
    values.send(1)?;
    values.send(2)?;
    start.send(0)?;
    values.send(3)?;
    values.send(4)?;

    // Assert
    assert_eq!(recorder.values(), vec![3]);
    Ok(())
}
