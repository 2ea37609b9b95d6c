use thiserror::Error;

/// Failure reported by the allocator.
///
/// These are recoverable errors caused by the request, not by the
/// allocator's own state. A broken block partition panics instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AllocError {
  /// The request was rejected before searching for a block.
  #[error("invalid request for {count} elements: {reason}")]
  InvalidSize {
    /// Number of elements requested.
    count: usize,
    reason: &'static str,
  },
  /// No free block can hold the request.
  #[error("out of space: requested {requested} bytes, largest free block is {largest_free}")]
  OutOfSpace { requested: usize, largest_free: usize },
  /// The pointer does not refer to a live allocation.
  #[error("no allocated block at offset {offset}")]
  InvalidPointer { offset: usize },
}

impl AllocError {
  /// Treats this error as fatal and panics with its message.
  ///
  /// For callers that, like most Rust collections, abort on allocation
  /// failure.
  #[cold]
  pub fn consider_fatal(&self) -> ! {
    panic!("allocation failed: {self}")
  }
}

pub type Result<T, E = AllocError> = std::result::Result<T, E>;
