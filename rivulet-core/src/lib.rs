// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Protocol core of the Rivulet reactive streams engine.
//!
//! A [`Publisher`] hands each [`Subscriber`] a [`Subscription`]; the subscriber
//! drives the flow by requesting [`Demand`] and receives values, then a single
//! [`Completion`]. Everything else in the workspace (operators, timers, executor
//! bridges) is built on these four pieces.
//!
//! This crate also provides:
//!
//! - root publishers ([`Just`], [`Empty`], [`Fail`], [`Sequence`], [`Deferred`],
//!   [`OneShot`]);
//! - hot subjects ([`PassthroughSubject`], [`CurrentValueSubject`]) and the
//!   [`Published`] property cell;
//! - closure sinks ([`SinkExt`], [`AssignExt`]);
//! - explicit cancellation ([`AnyCancellable`], [`Cancellables`]);
//! - [`DemandBuffer`] and [`UpstreamSubscriptions`], the building blocks used
//!   by operator stages.

mod logging;

pub mod assign;
pub mod cancellable;
pub mod completion;
pub mod demand;
pub mod demand_buffer;
pub mod published;
pub mod publisher;
pub mod sink;
pub mod sources;
pub mod subject;
pub mod subscriber;
pub mod subscription;
pub mod upstream;

pub use self::assign::AssignExt;
pub use self::cancellable::{AnyCancellable, Cancellable, Cancellables};
pub use self::completion::Completion;
pub use self::demand::Demand;
pub use self::demand_buffer::DemandBuffer;
pub use self::published::Published;
pub use self::publisher::{AnyPublisher, EraseExt, Publisher};
pub use self::sink::{Sink, SinkExt};
pub use self::sources::{
    Deferred, Empty, Fail, IntoPublisher, Just, OneShot, Promise, Sequence,
};
pub use self::subject::{CurrentValueSubject, PassthroughSubject};
pub use self::subscriber::{AnySubscriber, Subscriber};
pub use self::subscription::{EmptySubscription, Subscription, SubscriptionRef};
pub use self::upstream::UpstreamSubscriptions;
pub use rivulet_error::{Never, RivuletError, SubjectError};
