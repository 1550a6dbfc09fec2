// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Demand-aware operator stages for Rivulet publishers.
//!
//! Every operator is a [`Publisher`](rivulet_core::Publisher) wrapping one or
//! more upstream publishers, provided through an extension trait so that
//! pipelines read top to bottom. Each subscription gets its own operator
//! state, dropped with the subscription.
//!
//! ## Operator Categories
//!
//! ### Transformation
//!
//! - **[`map`](MapExt::map)**, **[`try_map`](TryMapExt::try_map)**: one value in, one out
//! - **[`compact_map`](CompactMapExt::compact_map)**: one value in, zero or one out
//! - **[`scan`](ScanExt::scan)**: running accumulator
//! - **[`collect`](CollectExt::collect)**: fixed-size batches
//! - **[`replace_nil`](ReplaceNilExt::replace_nil)**, **[`replace_empty`](ReplaceEmptyExt::replace_empty)**: defaults
//! - **[`map_error`](MapErrorExt::map_error)**: failure conversion
//!
//! ### Filtering
//!
//! - **[`filter`](FilterExt::filter)**, **[`remove_duplicates`](RemoveDuplicatesExt::remove_duplicates)**
//! - **[`prefix`](PrefixExt::prefix)**, **[`prefix_while`](PrefixExt::prefix_while)**,
//!   **[`prefix_until_output_from`](PrefixUntilOutputFromExt::prefix_until_output_from)**
//! - **[`drop_first`](DropFirstExt::drop_first)**, **[`drop_while`](DropWhileExt::drop_while)**,
//!   **[`drop_until_output_from`](DropUntilOutputFromExt::drop_until_output_from)**
//! - **[`ignore_output`](IgnoreOutputExt::ignore_output)**
//!
//! ### Combination
//!
//! - **[`zip`](ZipExt::zip)**: lockstep tuples
//! - **[`combine_latest`](CombineLatestExt::combine_latest)**: latest of every upstream
//! - **[`merge`](MergeExt::merge)**, [`merge_all`]: arrival-order interleaving
//! - **[`append`](AppendExt::append)**, **[`prepend`](PrependExt::prepend)**: concatenation
//! - **[`flat_map`](FlatMapExt::flat_map)**, **[`switch_to_latest`](SwitchToLatestExt::switch_to_latest)**: inner publishers
//!
//! ### Side Effects and Recovery
//!
//! - **[`handle_events`](HandleEventsExt::handle_events)**: observe every signal
//! - **[`retry`](RetryExt::retry)**: resubscribe on failure
//! - **[`subscribe_subject`](SubscribeSubjectExt::subscribe_subject)**: feed a subject
//!
//! # Demand
//!
//! One-to-one stages pass the downstream subscription straight through and
//! give back one unit of demand for every value they drop. Stages that
//! emit on their own schedule (batching, combining, inner publishers) queue
//! their output and only deliver it against downstream demand, so no stage
//! ever delivers more than was requested.
//!
//! # Example
//!
//! ```rust
//! use rivulet_core::{IntoPublisher, SinkExt};
//! use rivulet_stream::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let _ = (1..=10)
//!     .publisher()
//!     .filter(|n| n % 2 == 1)
//!     .map(|n| n * n)
//!     .collect(2)
//!     .sink_value(move |batch| sink.lock().unwrap().push(batch));
//!
//! assert_eq!(
//!     *seen.lock().unwrap(),
//!     vec![vec![1, 9], vec![25, 49], vec![81]]
//! );
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

mod logging;
mod relay;
mod serial;
mod trigger;
mod upstream_slot;

pub mod collect;
pub mod combine_latest;
pub mod compact_map;
pub mod concatenate;
pub mod drop_first;
pub mod drop_until_output_from;
pub mod drop_while;
pub mod filter;
pub mod flat_map;
pub mod handle_events;
pub mod ignore_output;
pub mod map;
pub mod map_error;
pub mod merge;
pub mod prefix;
pub mod prefix_until_output_from;
pub mod prelude;
pub mod remove_duplicates;
pub mod replace_empty;
pub mod replace_nil;
pub mod retry;
pub mod scan;
pub mod subscribe_subject;
pub mod switch_to_latest;
pub mod try_map;
pub mod zip;

pub use collect::{Collect, CollectExt};
pub use combine_latest::{CombineLatest, CombineLatest3, CombineLatest4, CombineLatestExt};
pub use compact_map::{CompactMap, CompactMapExt};
pub use concatenate::{AppendExt, Concatenate, PrependExt};
pub use drop_first::{DropFirst, DropFirstExt};
pub use drop_until_output_from::{DropUntilOutputFrom, DropUntilOutputFromExt};
pub use drop_while::{DropWhile, DropWhileExt};
pub use filter::{Filter, FilterExt};
pub use flat_map::{FlatMap, FlatMapExt};
pub use handle_events::{EventHandlers, HandleEvents, HandleEventsExt};
pub use ignore_output::{IgnoreOutput, IgnoreOutputExt};
pub use map::{Map, MapExt};
pub use map_error::{MapError, MapErrorExt, SetFailureType};
pub use merge::{merge_all, Merge, MergeAll, MergeExt};
pub use prefix::{Prefix, PrefixExt, PrefixWhile};
pub use prefix_until_output_from::{PrefixUntilOutputFrom, PrefixUntilOutputFromExt};
pub use remove_duplicates::{RemoveDuplicates, RemoveDuplicatesExt};
pub use replace_empty::{ReplaceEmpty, ReplaceEmptyExt};
pub use replace_nil::{ReplaceNil, ReplaceNilExt};
pub use retry::{Retry, RetryExt};
pub use scan::{Scan, ScanExt};
pub use subscribe_subject::SubscribeSubjectExt;
pub use switch_to_latest::{SwitchToLatest, SwitchToLatestExt};
pub use try_map::{TryMap, TryMapExt};
pub use zip::{Zip, Zip3, Zip4, ZipExt};
