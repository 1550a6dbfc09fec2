// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{AnyCancellable, Publisher, SinkExt};
use parking_lot::Mutex;
use rivulet_error::Never;
use std::sync::Arc;

/// Extension trait writing every value of an infallible publisher into a
/// shared object through an explicit mutator.
pub trait AssignExt: Publisher<Failure = Never> {
    /// Applies `setter` to `target` with each received value.
    ///
    /// # Examples
    ///
    /// ```
    /// use parking_lot::Mutex;
    /// use rivulet_core::{AssignExt, IntoPublisher};
    /// use std::sync::Arc;
    ///
    /// #[derive(Default)]
    /// struct Label {
    ///     text: String,
    /// }
    ///
    /// let label = Arc::new(Mutex::new(Label::default()));
    /// let _ = vec!["Hello", "World"]
    ///     .publisher()
    ///     .assign(Arc::clone(&label), |label, text| label.text = text.to_string());
    ///
    /// assert_eq!(label.lock().text, "World");
    /// ```
    fn assign<O, F>(&self, target: Arc<Mutex<O>>, setter: F) -> AnyCancellable
    where
        O: Send + 'static,
        F: Fn(&mut O, Self::Output) + Send + Sync + 'static,
    {
        self.sink_value(move |value| setter(&mut target.lock(), value))
    }
}

impl<P> AssignExt for P where P: Publisher<Failure = Never> + ?Sized {}
