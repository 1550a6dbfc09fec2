// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt::Debug;
use core::future::Future;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A clock and a source of sleep futures.
pub trait Timer: Clone + Send + Sync + Debug + 'static {
    type Sleep: Future<Output = ()> + Send + 'static;

    type Instant: Copy
        + Debug
        + Ord
        + Send
        + Sync
        + 'static
        + Add<Duration, Output = Self::Instant>
        + Sub<Duration, Output = Self::Instant>
        + Sub<Self::Instant, Output = Duration>;

    fn sleep_future(&self, duration: Duration) -> Self::Sleep;

    fn now(&self) -> Self::Instant;
}
