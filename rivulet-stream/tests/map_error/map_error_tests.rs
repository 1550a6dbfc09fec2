// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, IntoPublisher, Just, Publisher, RivuletError};
use rivulet_stream::prelude::*;
use rivulet_test_utils::{ErrorInjectingPublisher, RecordingSubscriber};
use std::sync::Arc;

#[test]
fn test_map_error_converts_failure() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32, RivuletError>::unlimited();

    // Act
    ErrorInjectingPublisher::new(vec![1, 2], "disk full")
        .map_error(RivuletError::stream_error)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);
    assert_eq!(
        recorder.completion(),
        Some(Completion::Failure(RivuletError::stream_error("disk full")))
    );
    Ok(())
}

#[test]
fn test_map_error_leaves_finished_untouched() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32, usize>::unlimited();

    // Act
    vec![1, 2]
        .publisher_with_failure::<&str>()
        .map_error(str::len)
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_set_failure_type_allows_combining_with_fallible_publishers() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32, &str>::unlimited();

    // Act
    Just::new(0)
        .set_failure_type::<&str>()
        .append(ErrorInjectingPublisher::new(vec![1], "boom"))
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![0, 1]);
    assert_eq!(recorder.completion(), Some(Completion::Failure("boom")));
    Ok(())
}
