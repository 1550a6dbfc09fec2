// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{Completion, PassthroughSubject, Publisher};
use rivulet_runtime::TokioRuntime;
use rivulet_stream_time::prelude::*;
use rivulet_test_utils::{
    assert_no_element_emitted, wait_for_completion, ErrorInjectingPublisher, RecordingSubscriber,
};
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_delay_forwards_failure_after_values() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32, &str>::unlimited();

    // Act
    ErrorInjectingPublisher::new(vec![1, 2], "boom")
        .delay(Duration::from_millis(20), TokioRuntime)
        .subscribe(Arc::clone(&recorder));

    // Assert
    wait_for_completion(&recorder, TIMEOUT).await;
    assert_eq!(recorder.values(), vec![1, 2]);
    assert_eq!(recorder.completions(), vec![Completion::Failure("boom")]);
    Ok(())
}

#[tokio::test]
async fn test_delay_holds_failure_back() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, String>::new();
    let recorder = RecordingSubscriber::<i32, String>::unlimited();
    subject
        .clone()
        .delay(Duration::from_millis(200), TokioRuntime)
        .subscribe(Arc::clone(&recorder));

    // Act
    subject.send_completion(Completion::Failure("late".to_string()))?;

    // Assert
    assert_no_element_emitted(&recorder, 50).await;
    wait_for_completion(&recorder, TIMEOUT).await;
    assert_eq!(
        recorder.completion(),
        Some(Completion::Failure("late".to_string()))
    );
    Ok(())
}
