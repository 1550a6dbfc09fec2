// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension traits and sources for time-based pipelines.

pub use crate::delay::DelayExt;
pub use crate::timer_publisher::TimerPublisher;
