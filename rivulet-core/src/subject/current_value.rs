// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::shared::{Latest, SubjectCore};
use super::define_subject_impl;
use rivulet_error::Never;
use std::fmt;
use std::sync::Arc;

/// A subject that remembers its latest value.
///
/// A new subscriber receives the latest value (the seed if nothing was sent
/// yet) as soon as it requests demand, then every later send.
pub struct CurrentValueSubject<T, E = Never> {
    core: Arc<SubjectCore<T, E, Latest<T>>>,
}

impl<T, E> CurrentValueSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a subject seeded with `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            core: Arc::new(SubjectCore::new(Latest(initial))),
        }
    }

    /// The latest value sent, or the seed.
    ///
    /// Sends rejected after completion do not change it.
    #[must_use]
    pub fn value(&self) -> T {
        self.core.retained(|latest| latest.0.clone())
    }
}

impl<T, E> fmt::Debug for CurrentValueSubject<T, E>
where
    T: Clone + Send + fmt::Debug + 'static,
    E: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentValueSubject")
            .field("value", &self.value())
            .field("subscribers", &self.subscriber_count())
            .field("completed", &self.is_completed())
            .finish()
    }
}

define_subject_impl!(CurrentValueSubject);
