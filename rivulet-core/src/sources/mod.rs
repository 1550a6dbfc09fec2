// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Root publishers: the places pipelines start.

pub mod deferred;
pub mod empty;
pub mod just;
pub mod one_shot;
pub mod sequence;

pub use deferred::Deferred;
pub use empty::{Empty, Fail};
pub use just::Just;
pub use one_shot::{OneShot, Promise};
pub use sequence::{IntoPublisher, Sequence};
