// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Scheduling seam for Rivulet.
//!
//! Timing operators and executor bridges never talk to an async runtime
//! directly. They are generic over [`Runtime`], which supplies a [`Timer`] and
//! a way to spawn detached work. Tokio is the default backend; smol is
//! available behind the `runtime-smol` feature.

mod logging;

pub mod cancellation_token;
pub mod impls;
pub mod runtime;
pub mod task;
pub mod timer;

pub use self::cancellation_token::CancellationToken;
pub use self::runtime::Runtime;
pub use self::task::TaskHandle;
pub use self::timer::Timer;

#[cfg(feature = "runtime-smol")]
pub use self::impls::smol::{SmolRuntime, SmolTimer};
#[cfg(feature = "runtime-tokio")]
pub use self::impls::tokio::{TokioRuntime, TokioTimer};

/// The runtime selected by the enabled features, tokio taking precedence.
#[cfg(feature = "runtime-tokio")]
pub type DefaultRuntime = TokioRuntime;

/// The runtime selected by the enabled features, tokio taking precedence.
#[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
pub type DefaultRuntime = SmolRuntime;
