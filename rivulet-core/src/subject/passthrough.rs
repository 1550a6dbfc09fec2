// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::shared::{NoReplay, SubjectCore};
use super::define_subject_impl;
use rivulet_error::Never;
use std::fmt;
use std::sync::Arc;

/// A subject that broadcasts values to current subscribers only.
///
/// Late subscribers see nothing sent before they attached. See the
/// [module documentation](crate::subject) for the shared behaviour.
pub struct PassthroughSubject<T, E = Never> {
    core: Arc<SubjectCore<T, E, NoReplay>>,
}

impl<T, E> PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: Arc::new(SubjectCore::new(NoReplay)),
        }
    }
}

impl<T, E> Default for PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassthroughSubject")
            .field("subscribers", &self.subscriber_count())
            .field("completed", &self.is_completed())
            .finish()
    }
}

define_subject_impl!(PassthroughSubject);
