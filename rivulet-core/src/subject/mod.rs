// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber subjects.
//!
//! A subject is a [`Publisher`](crate::Publisher) that can also be pushed into
//! imperatively with `send`. Each value is delivered synchronously to every
//! attached subscriber that still has demand; a subscriber without demand
//! simply misses it.
//!
//! ## Characteristics
//!
//! - **Hot**: [`PassthroughSubject`] does not replay anything to late subscribers.
//!   [`CurrentValueSubject`] replays the latest value (or its seed) on first demand.
//! - **Terminal**: `send_completion` completes every subscriber. Later sends
//!   return [`SubjectError::Completed`](rivulet_error::SubjectError) and late
//!   subscribers receive the recorded completion straight away.
//! - **Shared**: cheap to clone; all clones share the same subscribers.
//! - **Serialized**: sends from different threads never overlap, and a send
//!   issued from inside a subscriber callback is delivered once the current
//!   delivery round is over.
//! - **Subscriber**: a subject can subscribe to any publisher with matching
//!   types and forwards everything it receives.
//!
//! ## Example
//!
//! ```
//! use rivulet_core::{CurrentValueSubject, SinkExt};
//! use std::sync::{Arc, Mutex};
//!
//! let subject = CurrentValueSubject::<&str>::new("seed");
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let handle = subject.sink_value(move |v| sink.lock().unwrap().push(v));
//!
//! subject.send("next").unwrap();
//! handle.cancel();
//! subject.send("missed").unwrap();
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["seed", "next"]);
//! assert_eq!(subject.value(), "missed");
//! ```

mod shared;
pub mod current_value;
pub mod passthrough;

pub use current_value::CurrentValueSubject;
pub use passthrough::PassthroughSubject;

macro_rules! define_subject_impl {
    ($subject:ident) => {
        impl<T, E> $subject<T, E>
        where
            T: Clone + Send + 'static,
            E: Clone + Send + 'static,
        {
            /// Delivers `value` to every subscriber that has outstanding demand.
            ///
            /// # Errors
            ///
            /// Returns `SubjectError::Completed` once the subject has completed.
            pub fn send(&self, value: T) -> Result<(), rivulet_error::SubjectError> {
                self.core.send(value)
            }

            /// Completes every current subscriber and terminates the subject.
            ///
            /// # Errors
            ///
            /// Returns `SubjectError::Completed` if the subject already completed.
            pub fn send_completion(
                &self,
                completion: $crate::Completion<E>,
            ) -> Result<(), rivulet_error::SubjectError> {
                self.core.send_completion(completion)
            }

            /// Finishes the subject successfully.
            ///
            /// # Errors
            ///
            /// Returns `SubjectError::Completed` if the subject already completed.
            pub fn finish(&self) -> Result<(), rivulet_error::SubjectError> {
                self.send_completion($crate::Completion::Finished)
            }

            /// Returns `true` once a completion has been sent.
            #[must_use]
            pub fn is_completed(&self) -> bool {
                self.core.is_completed()
            }

            /// Returns the number of currently attached subscribers.
            #[must_use]
            pub fn subscriber_count(&self) -> usize {
                self.core.subscriber_count()
            }
        }

        impl<T, E> Clone for $subject<T, E> {
            fn clone(&self) -> Self {
                Self {
                    core: std::sync::Arc::clone(&self.core),
                }
            }
        }

        impl<T, E> $crate::Publisher for $subject<T, E>
        where
            T: Clone + Send + 'static,
            E: Clone + Send + 'static,
        {
            type Output = T;
            type Failure = E;

            fn subscribe<S>(&self, subscriber: S)
            where
                S: $crate::Subscriber<Input = T, Failure = E>,
            {
                self.core.attach(std::sync::Arc::new(subscriber));
            }
        }

        impl<T, E> $crate::Subscriber for $subject<T, E>
        where
            T: Clone + Send + 'static,
            E: Clone + Send + 'static,
        {
            type Input = T;
            type Failure = E;

            fn receive_subscription(&self, subscription: $crate::SubscriptionRef) {
                self.core.add_upstream(subscription);
            }

            fn receive(&self, input: T) -> $crate::Demand {
                let _ = self.core.send(input);
                $crate::Demand::NONE
            }

            fn receive_completion(&self, completion: $crate::Completion<E>) {
                let _ = self.core.send_completion(completion);
            }
        }
    };
}

pub(crate) use define_subject_impl;
