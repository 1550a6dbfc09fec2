// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::timer::Timer;
use core::fmt::Debug;
use core::future::Future;

/// An executor able to run detached work and hand out timers.
///
/// Implementations are cheap handles; clone them freely into operators.
pub trait Runtime: Clone + Send + Sync + Debug + 'static {
    type Timer: Timer<Instant = Self::Instant>;
    type Instant: Copy + Ord + Send + Sync + Debug + 'static;

    /// A timer driven by this runtime.
    fn timer(&self) -> Self::Timer;

    /// Runs `future` to completion in the background.
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
