//! Logging macros that forward to `tracing` when the `tracing` feature is
//! enabled and expand to nothing otherwise.
//!
//! ```bash
//! RUST_LOG=tagalloc=trace cargo test --features tracing
//! ```

#![allow(unused_macros, unused_imports)]

#[cfg(feature = "tracing")]
macro_rules! trace_log {
  ($($arg:tt)*) => {
    tracing::trace!($($arg)*)
  };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
  ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! debug_log {
  ($($arg:tt)*) => {
    tracing::debug!($($arg)*)
  };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
  ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! warn_log {
  ($($arg:tt)*) => {
    tracing::warn!($($arg)*)
  };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_log {
  ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! error_log {
  ($($arg:tt)*) => {
    tracing::error!($($arg)*)
  };
}

#[cfg(not(feature = "tracing"))]
macro_rules! error_log {
  ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use error_log;
pub(crate) use trace_log;
pub(crate) use warn_log;
