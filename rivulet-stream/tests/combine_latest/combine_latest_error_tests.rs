// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, PassthroughSubject, Publisher, RivuletError};
use rivulet_stream::prelude::*;
use rivulet_test_utils::RecordingSubscriber;
use std::sync::Arc;

#[test]
fn test_combine_latest_fails_on_first_failure() -> anyhow::Result<()> {
    // Arrange
    let left = PassthroughSubject::<i32, RivuletError>::new();
    let right = PassthroughSubject::<i32, RivuletError>::new();
    let recorder = RecordingSubscriber::<(i32, i32), RivuletError>::unlimited();
    left.clone()
        .combine_latest(right.clone())
        .subscribe(Arc::clone(&recorder));
    left.send(1)?;
    right.send(2)?;

    // Act
    left.send_completion(Completion::Failure(RivuletError::stream_error("left broke")))?;
    right.send(3)?;

    // Assert
    assert_eq!(recorder.values(), vec![(1, 2)]);
    assert_eq!(
        recorder.completions(),
        vec![Completion::Failure(RivuletError::stream_error("left broke"))]
    );
    assert_eq!(right.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_combine_latest_fails_even_before_first_combination() -> anyhow::Result<()> {
    // Arrange
    let left = PassthroughSubject::<i32, &'static str>::new();
    let right = PassthroughSubject::<i32, &'static str>::new();
    let recorder = RecordingSubscriber::<(i32, i32), &str>::unlimited();
    left.clone()
        .combine_latest(right.clone())
        .subscribe(Arc::clone(&recorder));

    // Act
    right.send_completion(Completion::Failure("boom"))?;

    // Assert
    assert!(recorder.values().is_empty());
    assert_eq!(recorder.completion(), Some(Completion::Failure("boom")));
    Ok(())
}
