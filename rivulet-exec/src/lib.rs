// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Executor integration for Rivulet publishers.
//!
//! - [`spawn_future`] runs an async block on a [`Runtime`](rivulet_runtime::Runtime)
//!   and exposes its single result as a cached [`OneShot`](rivulet_core::OneShot).
//! - [`bridge`], [`try_bridge`] and [`event_channel`] feed an external
//!   `futures::Stream` or channel into a hot publisher.
//! - [`ValuesExt::values`] goes the other way, consuming a publisher as an
//!   async `Stream` that requests one value at a time.

mod logging;
pub mod bridge;
pub mod spawn_future;
pub mod values;

pub use bridge::{bridge, event_channel, try_bridge, Bridge};
pub use spawn_future::spawn_future;
pub use values::{Values, ValuesExt};
