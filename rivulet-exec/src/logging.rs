// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

// Conditional logging shim: uses `tracing` when enabled, compiles to nothing otherwise

#![allow(unused_imports, unused_macros)]

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_event {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

// `warn` would clash with the built-in lint attribute in a bare `use`.
#[cfg(not(feature = "tracing"))]
pub(crate) use {debug, trace, warn_event as warn};
