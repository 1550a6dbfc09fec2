// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Time-based operators and sources for Rivulet publishers.
//!
//! Everything here is scheduled on a [`Runtime`](rivulet_runtime::Runtime)
//! passed in by the caller, so the crate never talks to an async runtime
//! directly.
//!
//! # Overview
//!
//! - **[`DelayExt`]** - `.delay(duration, runtime)` shifts every value and the
//!   completion later in time, preserving order
//! - **[`TimerPublisher`]** - a connectable source emitting the current instant
//!   at a fixed interval, with [`autoconnect`](TimerPublisher::autoconnect)
//!
//! # Runtime Support
//!
//! - `runtime-tokio` (default) - `TokioRuntime`
//! - `runtime-smol` - `SmolRuntime`
//!
//! # Example
//!
//! ```rust,no_run
//! use rivulet_core::{PassthroughSubject, SinkExt};
//! use rivulet_runtime::TokioRuntime;
//! use rivulet_stream_time::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let clicks = PassthroughSubject::<&str>::new();
//! let _handle = clicks
//!     .clone()
//!     .delay(Duration::from_millis(250), TokioRuntime)
//!     .sink_value(|click| println!("{click}"));
//!
//! clicks.send("first").unwrap();
//! # }
//! ```

mod logging;

pub mod delay;
pub mod prelude;
pub mod timer_publisher;

pub use delay::{Delay, DelayExt};
pub use timer_publisher::{Autoconnect, TimerPublisher};
