// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_runtime::{CancellationToken, Runtime, SmolRuntime, TaskHandle, Timer};
use std::time::Duration;

#[test]
fn test_smol_sleep_waits_at_least_the_duration() {
    smol::block_on(async {
        // Arrange
        let timer = SmolRuntime.timer();
        let start = timer.now();

        // Act
        timer.sleep_future(Duration::from_millis(20)).await;

        // Assert
        assert!(timer.now() - start >= Duration::from_millis(20));
    });
}

#[test]
fn test_smol_spawned_future_runs() -> anyhow::Result<()> {
    smol::block_on(async {
        // Arrange
        let (tx, rx) = futures::channel::oneshot::channel();

        // Act
        SmolRuntime.spawn(async move {
            let _ = tx.send(11);
        });

        // Assert
        assert_eq!(rx.await?, 11);
        Ok(())
    })
}

#[test]
fn test_smol_task_handle_cancels_on_drop() {
    smol::block_on(async {
        // Arrange
        let observed = CancellationToken::new();
        let flag = observed.clone();
        let handle = TaskHandle::spawn(&SmolRuntime, move |token| async move {
            token.cancelled().await;
            flag.cancel();
        });

        // Act
        drop(handle);
        SmolRuntime.timer().sleep_future(Duration::from_millis(20)).await;

        // Assert
        assert!(observed.is_cancelled());
    });
}
