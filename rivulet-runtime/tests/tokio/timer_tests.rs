// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_runtime::{Runtime, Timer, TokioRuntime};
use std::time::Duration;

#[tokio::test]
async fn test_sleep_future_waits_at_least_the_duration() {
    // Arrange
    let timer = TokioRuntime.timer();
    let start = timer.now();

    // Act
    timer.sleep_future(Duration::from_millis(20)).await;

    // Assert
    assert!(timer.now() - start >= Duration::from_millis(20));
}

#[tokio::test]
async fn test_spawned_future_runs() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = futures::channel::oneshot::channel();

    // Act
    TokioRuntime.spawn(async move {
        let _ = tx.send(7);
    });

    // Assert
    assert_eq!(rx.await?, 7);
    Ok(())
}
