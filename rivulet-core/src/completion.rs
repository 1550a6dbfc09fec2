// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_error::Never;

/// The terminal signal of a stream.
///
/// A subscriber receives at most one completion, and never a value after it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Completion<E> {
    /// The stream ended successfully.
    Finished,
    /// The stream ended with a failure.
    Failure(E),
}

impl<E> Completion<E> {
    /// Returns `true` if this is a successful completion.
    pub const fn is_finished(&self) -> bool {
        matches!(self, Completion::Finished)
    }

    /// Returns `true` if this is a failure.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Completion::Failure(_))
    }

    /// The failure, if any, discarding a successful completion.
    pub fn failure(self) -> Option<E> {
        match self {
            Completion::Finished => None,
            Completion::Failure(error) => Some(error),
        }
    }

    /// Maps the failure value, leaving `Finished` untouched.
    pub fn map_failure<F, M>(self, f: M) -> Completion<F>
    where
        M: FnOnce(E) -> F,
    {
        match self {
            Completion::Finished => Completion::Finished,
            Completion::Failure(error) => Completion::Failure(f(error)),
        }
    }

    /// Borrows the failure value.
    pub const fn as_ref(&self) -> Completion<&E> {
        match self {
            Completion::Finished => Completion::Finished,
            Completion::Failure(error) => Completion::Failure(error),
        }
    }
}

impl Completion<Never> {
    /// Widens an infallible completion into any failure type.
    pub fn cast<F>(self) -> Completion<F> {
        match self {
            Completion::Finished => Completion::Finished,
            Completion::Failure(never) => match never {},
        }
    }
}

impl<E> From<Result<(), E>> for Completion<E> {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Completion::Finished,
            Err(error) => Completion::Failure(error),
        }
    }
}

impl<E> From<Completion<E>> for Result<(), E> {
    fn from(completion: Completion<E>) -> Self {
        match completion {
            Completion::Finished => Ok(()),
            Completion::Failure(error) => Err(error),
        }
    }
}
