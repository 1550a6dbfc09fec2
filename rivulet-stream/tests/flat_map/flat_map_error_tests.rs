// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{
    AnyPublisher, Completion, EraseExt, Fail, IntoPublisher, PassthroughSubject, Publisher,
};
use rivulet_stream::prelude::*;
use rivulet_test_utils::{ErrorInjectingPublisher, RecordingSubscriber};
use std::sync::Arc;

#[test]
fn test_flat_map_inner_failure_cancels_everything() -> anyhow::Result<()> {
    // Arrange
    let outer = PassthroughSubject::<u32, &'static str>::new();
    let healthy = PassthroughSubject::<i32, &'static str>::new();
    let sibling = healthy.clone();
    let recorder = RecordingSubscriber::<i32, &str>::unlimited();
    outer
        .clone()
        .flat_map(move |n| -> AnyPublisher<i32, &'static str> {
            if n == 0 {
                sibling.clone().erase()
            } else {
                Fail::<i32, &'static str>::new("boom").erase()
            }
        })
        .subscribe(Arc::clone(&recorder));
    outer.send(0)?;
    healthy.send(1)?;

    // Act
    outer.send(1)?;
    healthy.send(2)?;

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert_eq!(recorder.completions(), vec![Completion::Failure("boom")]);
    assert_eq!(healthy.subscriber_count(), 0);
    assert_eq!(outer.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_flat_map_outer_failure_fails_output() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32, &str>::unlimited();

    // Act
    ErrorInjectingPublisher::new(vec![1, 2], "outer boom")
        .flat_map(|n| vec![n, n * 10].publisher_with_failure::<&str>())
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1, 10, 2, 20]);
    assert_eq!(recorder.completions(), vec![Completion::Failure("outer boom")]);
    Ok(())
}
