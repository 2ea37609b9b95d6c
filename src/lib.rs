//! # tagalloc - A Fixed-Capacity Boundary-Tag Allocator
//!
//! This crate provides an allocator that serves variable-sized requests out of
//! a single buffer of `N` bytes owned by the allocator itself. Once the
//! allocator exists, no memory is ever requested from the system allocator.
//!
//! ## Overview
//!
//! The buffer is always tiled edge to edge by blocks. Each block carries a
//! boundary tag at both ends holding its payload size, positive while the
//! block is free and negative while it is in use:
//!
//! ```text
//!   Buffer of N = 100 bytes after allocate(10), allocate(20):
//!
//!   0    4          14   18   22                    42   46   50                         96  100
//!   ┌────┬──────────┬────┬────┬──────────────────────┬────┬────┬──────────────────────────┬────┐
//!   │-10 │ payload  │-10 │-20 │       payload        │-20 │ 46 │          free            │ 46 │
//!   └────┴──────────┴────┴────┴──────────────────────┴────┴────┴──────────────────────────┴────┘
//!        ▲                    ▲
//!        └── first pointer    └── second pointer
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   tagalloc
//!   ├── tag      - Boundary tag encoding
//!   ├── block    - Block geometry and the block walker
//!   ├── pointer  - Typed offsets into the buffer
//!   ├── error    - AllocError
//!   └── fixed    - Allocator implementation
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use tagalloc::Allocator;
//!
//! let mut allocator = Allocator::<u32, 128>::new();
//!
//! let ptr = allocator.allocate(4).unwrap();
//! for i in 0..4 {
//!   allocator.construct(ptr.add(i), i as u32 * 10).unwrap();
//! }
//! assert_eq!(unsafe { allocator.get(ptr.add(3)) }, Ok(30));
//!
//! for i in 0..4 {
//!   unsafe { allocator.destroy(ptr.add(i)) }.unwrap();
//! }
//! allocator.deallocate(ptr, 4).unwrap();
//! assert!(allocator.valid());
//! ```
//!
//! ## How It Works
//!
//! `allocate` looks for the leftmost free block that stays at least one
//! minimum block (two tags and one element) larger than the request, and
//! splits it:
//!
//! ```text
//!   ┌────┬────────────────────────────────────────────┬────┐
//!   │ +s │                  free                      │ +s │
//!   └────┴────────────────────────────────────────────┴────┘
//!                              │
//!                              ▼
//!   ┌────┬───────────┬────┬────┬─────────────────────────┬────┐
//!   │ -r │ requested │ -r │ +t │          free           │ +t │   t = s - r - 2 * tag
//!   └────┴───────────┴────┴────┴─────────────────────────┴────┘
//! ```
//!
//! If no block can be split, the leftmost free block that is merely large
//! enough is handed out whole, so no unusable sliver is ever created.
//!
//! `deallocate` flips the tags back to positive and merges the block with a
//! free neighbour on either side:
//!
//! ```text
//!   ┌────┬──────┬────┬────┬──────┬────┬────┬──────┬────┐
//!   │ +a │ free │ +a │ -b │ used │ -b │ +c │ free │ +c │
//!   └────┴──────┴────┴────┴──────┴────┴────┴──────┴────┘
//!                            │ deallocate
//!                            ▼
//!   ┌────┬─────────────────────────────────────────┬────┐
//!   │ +m │                 free                    │ +m │   m = a + b + c + 4 * tag
//!   └────┴─────────────────────────────────────────┴────┘
//! ```
//!
//! After every operation the partition can be re-checked with
//! [`Allocator::valid`]. Debug builds, and release builds with the `strict`
//! feature, do so automatically and panic if it is broken.
//!
//! ## Features
//!
//! - **`tracing`**: emit `tracing` events from allocation and deallocation
//! - **`strict`**: keep the partition check in release builds
//!
//! ## Limitations
//!
//! - **Single-threaded only**: mutation requires `&mut`
//! - **Fixed size**: the buffer never grows
//! - **Tag alignment only**: elements are read and written unaligned

mod tracing_helpers;

mod block;
mod error;
mod fixed;
mod pointer;
pub mod tag;

pub use block::{Block, Blocks};
pub use error::{AllocError, Result};
pub use fixed::Allocator;
pub use pointer::Pointer;
