// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{AnyPublisher, CurrentValueSubject};
use parking_lot::ReentrantMutex;
use rivulet_error::Never;
use std::fmt;

/// An observable property cell.
///
/// `set` stores a new value and announces it; [`publisher`](Self::publisher)
/// emits the current value to each new subscriber followed by every later
/// update.
///
/// ```
/// use rivulet_core::{Published, SinkExt};
/// use std::sync::{Arc, Mutex};
///
/// let temperature = Published::new(20);
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let _handle = temperature
///     .publisher()
///     .sink_value(move |t| sink.lock().unwrap().push(t));
///
/// temperature.set(21);
///
/// assert_eq!(temperature.get(), 21);
/// assert_eq!(*seen.lock().unwrap(), vec![20, 21]);
/// ```
pub struct Published<T> {
    subject: CurrentValueSubject<T>,
    // Serializes writers so `update` reads and sends as one step.
    writer: ReentrantMutex<()>,
}

impl<T> Published<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a cell holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            subject: CurrentValueSubject::new(initial),
            writer: ReentrantMutex::new(()),
        }
    }

    /// The current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.subject.value()
    }

    /// Stores `value` and delivers it to every subscriber with demand.
    pub fn set(&self, value: T) {
        let _writer = self.writer.lock();
        // The subject is never completed, so the send cannot be rejected.
        let _ = self.subject.send(value);
    }

    /// Stores the result of `update` applied to the current value.
    ///
    /// Concurrent updates are serialized, so none of them is lost.
    pub fn update<F>(&self, update: F)
    where
        F: FnOnce(&T) -> T,
    {
        let _writer = self.writer.lock();
        self.set(update(&self.get()));
    }

    /// A publisher of the current and every future value.
    #[must_use]
    pub fn publisher(&self) -> AnyPublisher<T, Never> {
        AnyPublisher::new(self.subject.clone())
    }
}

impl<T> fmt::Debug for Published<T>
where
    T: Clone + Send + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Published").field(&self.get()).finish()
    }
}
