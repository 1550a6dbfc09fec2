// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prelude module re-exporting every operator extension trait.
//!
//! ```rust
//! use rivulet_core::IntoPublisher;
//! use rivulet_stream::prelude::*;
//!
//! let _pipeline = (1..=3)
//!     .publisher()
//!     .map(|n| n + 1)
//!     .filter(|n| n % 2 == 0)
//!     .scan(0, |total, n| total + n);
//! ```

pub use crate::collect::CollectExt;
pub use crate::combine_latest::CombineLatestExt;
pub use crate::compact_map::CompactMapExt;
pub use crate::concatenate::{AppendExt, PrependExt};
pub use crate::drop_first::DropFirstExt;
pub use crate::drop_until_output_from::DropUntilOutputFromExt;
pub use crate::drop_while::DropWhileExt;
pub use crate::filter::FilterExt;
pub use crate::flat_map::FlatMapExt;
pub use crate::handle_events::{EventHandlers, HandleEventsExt};
pub use crate::ignore_output::IgnoreOutputExt;
pub use crate::map::MapExt;
pub use crate::map_error::MapErrorExt;
pub use crate::merge::{merge_all, MergeExt};
pub use crate::prefix::PrefixExt;
pub use crate::prefix_until_output_from::PrefixUntilOutputFromExt;
pub use crate::remove_duplicates::RemoveDuplicatesExt;
pub use crate::replace_empty::ReplaceEmptyExt;
pub use crate::replace_nil::ReplaceNilExt;
pub use crate::retry::RetryExt;
pub use crate::scan::ScanExt;
pub use crate::subscribe_subject::SubscribeSubjectExt;
pub use crate::switch_to_latest::SwitchToLatestExt;
pub use crate::try_map::TryMapExt;
pub use crate::zip::ZipExt;
