// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Publishers that fail on purpose.

use rivulet_core::{Completion, Demand, Publisher, Sequence, Subscriber, SubscriptionRef};

/// Emits `values` against demand, then fails with `error` instead of finishing.
///
/// ```rust
/// use rivulet_core::{Completion, Publisher};
/// use rivulet_test_utils::{ErrorInjectingPublisher, RecordingSubscriber};
/// use std::sync::Arc;
///
/// let failing = ErrorInjectingPublisher::new(vec![1, 2], "boom");
/// let recorder = RecordingSubscriber::<i32, &str>::unlimited();
/// failing.subscribe(Arc::clone(&recorder));
///
/// assert_eq!(recorder.values(), vec![1, 2]);
/// assert_eq!(recorder.completion(), Some(Completion::Failure("boom")));
/// ```
#[derive(Debug, Clone)]
pub struct ErrorInjectingPublisher<T, E> {
    values: Vec<T>,
    error: E,
}

impl<T, E> ErrorInjectingPublisher<T, E> {
    pub fn new(values: Vec<T>, error: E) -> Self {
        Self { values, error }
    }
}

impl<T, E> Publisher for ErrorInjectingPublisher<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + Sync + 'static,
{
    type Output = T;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = T, Failure = E>,
    {
        Sequence::<_, E>::new(self.values.clone()).subscribe(FailOnFinish {
            inner: subscriber,
            error: self.error.clone(),
        });
    }
}

struct FailOnFinish<S, E> {
    inner: S,
    error: E,
}

impl<S, E> Subscriber for FailOnFinish<S, E>
where
    S: Subscriber<Failure = E>,
    E: Clone + Send + Sync + 'static,
{
    type Input = S::Input;
    type Failure = E;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.inner.receive_subscription(subscription);
    }

    fn receive(&self, input: S::Input) -> Demand {
        self.inner.receive(input)
    }

    fn receive_completion(&self, completion: Completion<E>) {
        let completion = match completion {
            Completion::Finished => Completion::Failure(self.error.clone()),
            failure => failure,
        };
        self.inner.receive_completion(completion);
    }
}
