// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Rivulet
//!
//! Demand-driven reactive publishers for Rust.
//!
//! ## Overview
//!
//! A [`Publisher`] emits values to each attached [`Subscriber`], never more
//! than the subscriber requested through its [`Subscription`]. A publisher
//! ends at most once, either `Finished` or with a failure. Between source and
//! sink sit operator stages (`map`, `filter`, `zip`, `flat_map`, ...) that keep
//! the same demand accounting, so backpressure holds across a whole pipeline.
//!
//! The crate is a facade over the workspace:
//!
//! - `rivulet-core`: the protocol, subjects, cancellation and root publishers
//! - `rivulet-stream`: operator stages
//! - `rivulet-stream-time`: `delay` and the periodic [`TimerPublisher`]
//! - `rivulet-exec`: spawned futures, stream bridges and async iteration
//! - `rivulet-runtime`: the [`Runtime`] and [`Timer`] abstractions
//!
//! ## Quick Start
//!
//! ```rust
//! use rivulet::prelude::*;
//!
//! let subject = PassthroughSubject::<i32>::new();
//! let mut handles = Cancellables::new();
//! subject
//!     .clone()
//!     .filter(|n| n % 2 == 0)
//!     .map(|n| n * 10)
//!     .sink_value(|n| println!("{n}"))
//!     .store(&mut handles);
//!
//! for n in 1..=4 {
//!     subject.send(n).ok();
//! }
//! ```

#[cfg(feature = "runtime-tokio")]
pub mod receiver_ext;

pub use rivulet_core::{
    AnyCancellable, AnyPublisher, AnySubscriber, AssignExt, Cancellable, Cancellables,
    Completion, CurrentValueSubject, Demand, DemandBuffer, EmptySubscription, EraseExt,
    PassthroughSubject, Published, Publisher, Sink, SinkExt, Subscriber, Subscription,
    SubscriptionRef, UpstreamSubscriptions,
};
pub use rivulet_core::{Deferred, Empty, Fail, IntoPublisher, Just, OneShot, Promise, Sequence};
pub use rivulet_error::{IntoRivuletError, Never, Result, RivuletError, SubjectError};
pub use rivulet_exec::{
    bridge, event_channel, spawn_future, try_bridge, Bridge, Values, ValuesExt,
};
pub use rivulet_runtime::{CancellationToken, Runtime, TaskHandle, Timer};
#[cfg(feature = "runtime-smol")]
pub use rivulet_runtime::{SmolRuntime, SmolTimer};
#[cfg(feature = "runtime-tokio")]
pub use rivulet_runtime::{TokioRuntime, TokioTimer};
pub use rivulet_stream_time::{Autoconnect, Delay, DelayExt, TimerPublisher};

#[cfg(feature = "runtime-tokio")]
pub use receiver_ext::UnboundedReceiverExt;

/// Prelude module for convenient imports
pub mod prelude {
    pub use rivulet_core::{
        AnyCancellable, AnyPublisher, AssignExt, Cancellables, Completion, CurrentValueSubject,
        Deferred, Demand, Empty, EraseExt, Fail, IntoPublisher, Just, OneShot, PassthroughSubject,
        Published, Publisher, SinkExt, Subscriber, Subscription,
    };
    pub use rivulet_error::{Never, RivuletError, SubjectError};
    pub use rivulet_exec::{spawn_future, ValuesExt};
    pub use rivulet_stream::prelude::*;
    pub use rivulet_stream_time::prelude::*;

    #[cfg(feature = "runtime-tokio")]
    pub use crate::receiver_ext::UnboundedReceiverExt;
    #[cfg(feature = "runtime-tokio")]
    pub use rivulet_runtime::TokioRuntime;
}
