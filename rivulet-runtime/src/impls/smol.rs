// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[cfg(feature = "runtime-smol")]
use std::future::Future;

#[cfg(feature = "runtime-smol")]
use crate::{runtime::Runtime, timer::Timer};

/// Spawns onto smol's global executor.
#[cfg(feature = "runtime-smol")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SmolRuntime;

#[cfg(feature = "runtime-smol")]
impl Runtime for SmolRuntime {
    type Timer = SmolTimer;
    type Instant = std::time::Instant;

    fn timer(&self) -> Self::Timer {
        SmolTimer
    }

    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        smol::spawn(future).detach();
    }
}

#[cfg(feature = "runtime-smol")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SmolTimer;

#[cfg(feature = "runtime-smol")]
pub struct SmolSleep {
    timer: async_io::Timer,
}

#[cfg(feature = "runtime-smol")]
impl SmolSleep {
    fn new(duration: std::time::Duration) -> Self {
        Self {
            timer: async_io::Timer::after(duration),
        }
    }
}

#[cfg(feature = "runtime-smol")]
impl core::future::Future for SmolSleep {
    type Output = ();

    fn poll(
        mut self: core::pin::Pin<&mut Self>,
        cx: &mut core::task::Context<'_>,
    ) -> core::task::Poll<Self::Output> {
        core::pin::Pin::new(&mut self.timer).poll(cx).map(|_| ())
    }
}

#[cfg(feature = "runtime-smol")]
impl Timer for SmolTimer {
    type Sleep = SmolSleep;

    type Instant = std::time::Instant;

    fn sleep_future(&self, duration: std::time::Duration) -> Self::Sleep {
        SmolSleep::new(duration)
    }

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }
}
