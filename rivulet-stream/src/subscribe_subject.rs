// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use rivulet_core::{
    AnyCancellable, Cancellable, Completion, Demand, Publisher, Subscriber, SubscriptionRef,
};
use std::sync::Arc;

/// Extension trait feeding a publisher into a subject.
pub trait SubscribeSubjectExt: Publisher {
    /// Subscribes `subject` to this publisher, so every value and the
    /// completion are re-sent through it.
    ///
    /// The returned handle cancels this one upstream; the subject stays
    /// open for other sources.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rivulet_core::{IntoPublisher, PassthroughSubject, SinkExt};
    /// use rivulet_stream::prelude::*;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let subject = PassthroughSubject::<i32>::new();
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let _listener = subject.sink_value(move |n| sink.lock().unwrap().push(n));
    ///
    /// let _feed = vec![1, 2, 3].publisher().subscribe_subject(subject.clone());
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    /// assert!(subject.is_completed());
    /// ```
    fn subscribe_subject<J>(&self, subject: J) -> AnyCancellable
    where
        J: Subscriber<Input = Self::Output, Failure = Self::Failure>,
    {
        let feed = Arc::new(SubjectFeed {
            subject,
            subscription: Mutex::new(None),
        });
        self.subscribe(Arc::clone(&feed));
        AnyCancellable::from_cancellable(feed)
    }
}

impl<P: Publisher + ?Sized> SubscribeSubjectExt for P {}

struct SubjectFeed<J> {
    subject: J,
    subscription: Mutex<Option<SubscriptionRef>>,
}

impl<J: Subscriber> Subscriber for SubjectFeed<J> {
    type Input = J::Input;
    type Failure = J::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        *self.subscription.lock() = Some(SubscriptionRef::clone(&subscription));
        self.subject.receive_subscription(subscription);
    }

    fn receive(&self, input: J::Input) -> Demand {
        self.subject.receive(input)
    }

    fn receive_completion(&self, completion: Completion<J::Failure>) {
        self.subscription.lock().take();
        self.subject.receive_completion(completion);
    }
}

impl<J: Subscriber> Cancellable for SubjectFeed<J> {
    fn cancel(&self) {
        let subscription = self.subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}
