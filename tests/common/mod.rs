//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Once;

use tagalloc::{Allocator, Block};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a test-friendly subscriber honouring `RUST_LOG`.
///
/// Events only show up when the crate is built with `--features tracing`.
pub fn init_tracing() {
  INIT.call_once(|| {
    let _ = tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::from_default_env())
      .with_test_writer()
      .try_init();
  });
}

/// All blocks of `allocator` in buffer order.
pub fn blocks<T, const N: usize>(allocator: &Allocator<T, N>) -> Vec<Block> {
  allocator.blocks().collect()
}
