// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension methods for tokio `UnboundedReceiver` to create publishers.

use rivulet_exec::{bridge, Bridge};
use rivulet_runtime::TokioRuntime;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

/// Extension trait for `UnboundedReceiver` to create hot publishers.
pub trait UnboundedReceiverExt<T> {
    /// Pumps the receiver on the ambient tokio runtime into a [`Bridge`].
    ///
    /// Each received item is mapped through `mapper` and sent as a value; the
    /// publisher finishes once every sender is dropped.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet::prelude::*;
    /// use tokio::sync::mpsc;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let (tx, rx) = mpsc::unbounded_channel::<u32>();
    /// let readings = rx.into_publisher(|celsius| celsius as f64 * 1.8 + 32.0);
    /// let _handle = readings.sink_value(|fahrenheit| println!("{fahrenheit}"));
    /// tx.send(21).ok();
    /// # }
    /// ```
    fn into_publisher<U, F>(self, mapper: F) -> Bridge<U>
    where
        F: FnMut(T) -> U + Send + 'static,
        U: Clone + Send + 'static;
}

impl<T> UnboundedReceiverExt<T> for mpsc::UnboundedReceiver<T>
where
    T: Send + 'static,
{
    fn into_publisher<U, F>(self, mapper: F) -> Bridge<U>
    where
        F: FnMut(T) -> U + Send + 'static,
        U: Clone + Send + 'static,
    {
        bridge(&TokioRuntime, UnboundedReceiverStream::new(self).map(mapper))
    }
}
