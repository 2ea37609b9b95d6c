//! Boundary tag codec.
//!
//! A tag is a signed integer of [`TAG_SIZE`] bytes stored in little-endian
//! order at a block boundary. Its magnitude is the payload size of the block
//! and its sign the block state:
//!
//! ```text
//!   ┌──────────┬────────────────────────────┬──────────┐
//!   │ tag = +s │        s payload bytes     │ tag = +s │   free block
//!   └──────────┴────────────────────────────┴──────────┘
//!   ┌──────────┬────────────────────────────┬──────────┐
//!   │ tag = -s │        s payload bytes     │ tag = -s │   block in use
//!   └──────────┴────────────────────────────┴──────────┘
//! ```
//!
//! Every write covers the whole slot, so a read always gives back the exact
//! value that was written last.

use std::mem;

/// Integer type of a boundary tag.
pub type Tag = i32;

/// Width in bytes of a boundary tag.
pub const TAG_SIZE: usize = mem::size_of::<Tag>();

/// Reads the tag stored at `offset`.
///
/// Returns `None` when the slot does not fit inside `buf`.
pub fn read_tag(
  buf: &[u8],
  offset: usize,
) -> Option<Tag> {
  let end = offset.checked_add(TAG_SIZE)?;
  let bytes: [u8; TAG_SIZE] = buf.get(offset..end)?.try_into().ok()?;
  Some(Tag::from_le_bytes(bytes))
}

/// Writes `value` into the slot at `offset`.
///
/// Returns `None`, leaving `buf` untouched, when the slot does not fit.
pub fn write_tag(
  buf: &mut [u8],
  offset: usize,
  value: Tag,
) -> Option<()> {
  let end = offset.checked_add(TAG_SIZE)?;
  buf.get_mut(offset..end)?.copy_from_slice(&value.to_le_bytes());
  Some(())
}

/// Builds the tag for a block of `size` payload bytes.
///
/// Zero and sizes beyond `Tag::MAX` have no representation.
pub fn encode(
  size: usize,
  is_free: bool,
) -> Option<Tag> {
  let magnitude = Tag::try_from(size).ok().filter(|&m| m > 0)?;
  Some(if is_free { magnitude } else { -magnitude })
}

/// Payload size carried by `tag`.
pub fn payload_size(tag: Tag) -> usize {
  tag.unsigned_abs() as usize
}

/// Whether `tag` marks a free block.
pub fn is_free(tag: Tag) -> bool {
  tag > 0
}
