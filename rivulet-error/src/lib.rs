// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Failure types for the Rivulet reactive streams engine.
//!
//! Every publisher carries a `Failure` type parameter. This crate provides the
//! three failure vocabularies used across the workspace:
//!
//! - [`Never`]: an uninhabited marker for pipelines that cannot fail. A
//!   `Completion<Never>` can only ever be `Finished`.
//! - [`RivuletError`]: a general-purpose failure for fallible transforms such as
//!   `try_map` and exhausted retries.
//! - [`SubjectError`]: returned when an imperative send is rejected by a subject.
//!
//! # Examples
//!
//! ```
//! use rivulet_error::{Result, RivuletError};
//!
//! fn parse(input: &str) -> Result<u32> {
//!     input
//!         .parse()
//!         .map_err(|_| RivuletError::stream_error(format!("not a number: {input}")))
//! }
//!
//! assert!(parse("12").is_ok());
//! assert!(parse("twelve").is_err());
//! ```

use std::fmt;
use std::sync::Arc;

/// Root failure type for fallible Rivulet pipelines.
///
/// `RivuletError` is `Clone` so that a single failure can be fanned out to every
/// subscriber of a subject or of a cached future. User errors are therefore held
/// behind an [`Arc`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum RivuletError {
    /// Stream processing encountered an error
    ///
    /// General failure raised by a transform that doesn't fit other categories.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong
        context: String,
    },

    /// Custom error from user code
    ///
    /// Wraps errors produced by user-provided transforms so they can travel
    /// through a pipeline as its failure signal.
    #[error("User error: {0}")]
    UserError(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// Invalid state encountered
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the invalid state
        message: String,
    },

    /// Upstream kept failing after every permitted resubscription
    #[error("Retry exhausted after {attempts} attempts")]
    RetryExhausted {
        /// Number of subscriptions attempted, including the first one
        attempts: usize,
    },
}

impl RivuletError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Create an invalid state error with the given message
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Arc::new(error))
    }
}

impl PartialEq for RivuletError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::StreamProcessingError { context: a },
                Self::StreamProcessingError { context: b },
            ) => a == b,
            (Self::InvalidState { message: a }, Self::InvalidState { message: b }) => a == b,
            (Self::RetryExhausted { attempts: a }, Self::RetryExhausted { attempts: b }) => a == b,
            (Self::UserError(a), Self::UserError(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Specialized Result type for Rivulet operations
pub type Result<T> = std::result::Result<T, RivuletError>;

/// Extension trait for converting foreign errors into `RivuletError`
pub trait IntoRivuletError {
    /// Convert this error into a `RivuletError`
    fn into_rivulet(self) -> RivuletError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoRivuletError for E {
    fn into_rivulet(self) -> RivuletError {
        RivuletError::user_error(self)
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(RivuletError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| RivuletError::StreamProcessingError {
            context: format!("{}: {e}", context.into()),
        })
    }
}

/// Failure type of publishers that can never fail.
///
/// `Never` has no values, so a `Completion<Never>` is statically known to be a
/// successful completion and `match never {}` is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Never {}

impl fmt::Display for Never {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl std::error::Error for Never {}

impl From<Never> for RivuletError {
    fn from(never: Never) -> Self {
        match never {}
    }
}

/// Errors specific to imperative subject operations.
///
/// A rejected send delivers nothing; the error only reports why.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    /// The subject already delivered its terminal signal.
    #[error("Subject has already completed")]
    Completed,
}
