// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the Rivulet reactive streams engine.
//!
//! Designed for development and testing only, not for production code.
//!
//! # Key Types
//!
//! ## `RecordingSubscriber`
//!
//! A subscriber with scripted demand that records every signal it receives.
//! Pipelines are driven synchronously, so most assertions can be made right
//! after `subscribe` returns:
//!
//! ```rust
//! use rivulet_core::{Completion, IntoPublisher, Publisher};
//! use rivulet_test_utils::RecordingSubscriber;
//! use std::sync::Arc;
//!
//! let recorder = RecordingSubscriber::<char>::unlimited();
//! vec!['a', 'b'].publisher().subscribe(Arc::clone(&recorder));
//!
//! assert_eq!(recorder.values(), vec!['a', 'b']);
//! assert_eq!(recorder.completion(), Some(Completion::Finished));
//! ```
//!
//! ## TestData and Variants
//!
//! ```rust
//! use rivulet_test_utils::test_data::{TestData, person_alice};
//!
//! match person_alice() {
//!     TestData::Person(p) => assert_eq!(p.name, "Alice"),
//!     _ => panic!("Expected person"),
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! - `Person` - a person with name and age
//! - `Animal` - an animal with name and leg count
//! - `Plant` - a plant with species and height

pub mod animal;
pub mod error_injection;
pub mod helpers;
pub mod person;
pub mod plant;
pub mod recording;
pub mod test_data;

pub use self::error_injection::ErrorInjectingPublisher;
pub use self::helpers::{
    assert_no_element_emitted, collect_sync, wait_for_completion, wait_for_values,
};
pub use self::recording::{Event, RecordingSubscriber};
pub use self::test_data::TestData;
