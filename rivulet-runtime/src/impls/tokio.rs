// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[cfg(feature = "runtime-tokio")]
use std::{future::Future, time::Duration};

#[cfg(feature = "runtime-tokio")]
use crate::{runtime::Runtime, timer::Timer};

/// Spawns onto the ambient tokio runtime.
///
/// `spawn` must be called from within a tokio runtime context.
#[cfg(feature = "runtime-tokio")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioRuntime;

#[cfg(feature = "runtime-tokio")]
impl Runtime for TokioRuntime {
    type Timer = TokioTimer;
    type Instant = std::time::Instant;

    fn timer(&self) -> Self::Timer {
        TokioTimer
    }

    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(future);
    }
}

#[cfg(feature = "runtime-tokio")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioTimer;

#[cfg(feature = "runtime-tokio")]
impl Timer for TokioTimer {
    type Sleep = tokio::time::Sleep;

    type Instant = std::time::Instant;

    fn sleep_future(&self, duration: Duration) -> Self::Sleep {
        tokio::time::sleep(duration)
    }

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }
}
