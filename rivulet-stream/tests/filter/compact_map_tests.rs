// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, Demand, IntoPublisher, Publisher};
use rivulet_stream::prelude::*;
use rivulet_test_utils::RecordingSubscriber;
use std::sync::Arc;

#[test]
fn test_compact_map_drops_none_results() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    vec!["1", "x", "2", "", "3"]
        .publisher()
        .compact_map(|s| s.parse::<i32>().ok())
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_compact_map_dropped_values_do_not_consume_demand() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(2));

    // Act
    vec!["1", "x", "2", "3"]
        .publisher()
        .compact_map(|s| s.parse::<i32>().ok())
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);
    assert!(!recorder.is_completed());

    // Act
    recorder.request(Demand::max(5));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}
