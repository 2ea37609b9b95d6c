use crate::tag::{self, TAG_SIZE};

/// A block of the buffer, as described by its boundary tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
  /// Offset of the leading tag.
  pub offset: usize,
  /// Payload bytes between the two tags.
  pub size: usize,
  pub is_free: bool,
}

impl Block {
  pub fn new(
    offset: usize,
    size: usize,
    is_free: bool,
  ) -> Self {
    Self { offset, size, is_free }
  }

  /// Decodes the block whose leading tag sits at `offset`.
  ///
  /// Returns `None` if either tag is out of bounds or zero, or if the two
  /// tags disagree.
  pub fn read(
    buf: &[u8],
    offset: usize,
  ) -> Option<Self> {
    let head = tag::read_tag(buf, offset)?;
    let size = tag::payload_size(head);
    if size == 0 {
      return None;
    }

    let tail = tag::read_tag(buf, offset.checked_add(TAG_SIZE)?.checked_add(size)?)?;
    (head == tail).then(|| Self::new(offset, size, tag::is_free(head)))
  }

  /// Offset of the first payload byte.
  pub fn payload(&self) -> usize {
    self.offset + TAG_SIZE
  }

  /// Offset of the trailing tag.
  pub fn tail(&self) -> usize {
    self.offset + TAG_SIZE + self.size
  }

  /// Offset one past the trailing tag, where the next block starts.
  pub fn end(&self) -> usize {
    self.offset + self.span()
  }

  /// Total bytes covered, tags included.
  pub fn span(&self) -> usize {
    self.size + 2 * TAG_SIZE
  }
}

/// Walks a buffer block by block from offset 0.
///
/// The walk stops early at the first block whose tags cannot be decoded;
/// [`Blocks::is_broken`] reports whether that happened.
#[derive(Clone, Debug)]
pub struct Blocks<'a> {
  buf: &'a [u8],
  offset: usize,
  broken: bool,
}

impl<'a> Blocks<'a> {
  pub fn new(buf: &'a [u8]) -> Self {
    Self {
      buf,
      offset: 0,
      broken: false,
    }
  }

  pub fn is_broken(&self) -> bool {
    self.broken
  }
}

impl Iterator for Blocks<'_> {
  type Item = Block;

  fn next(&mut self) -> Option<Block> {
    if self.broken || self.offset >= self.buf.len() {
      return None;
    }

    match Block::read(self.buf, self.offset) {
      Some(block) => {
        self.offset = block.end();
        Some(block)
      }
      None => {
        self.broken = true;
        None
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tag::write_tag;

  fn put(
    buf: &mut [u8],
    offset: usize,
    size: usize,
    value: i32,
  ) {
    write_tag(buf, offset, value).unwrap();
    write_tag(buf, offset + TAG_SIZE + size, value).unwrap();
  }

  #[test]
  fn test_walk() {
    let mut buf = [0u8; 40];
    put(&mut buf, 0, 6, -6);
    put(&mut buf, 14, 18, 18);

    let mut blocks = Blocks::new(&buf);
    assert_eq!(blocks.next(), Some(Block::new(0, 6, false)));
    assert_eq!(blocks.next(), Some(Block::new(14, 18, true)));
    assert_eq!(blocks.next(), None);
    assert!(!blocks.is_broken());
  }

  #[test]
  fn test_geometry() {
    let block = Block::new(14, 18, true);

    assert_eq!(block.payload(), 18);
    assert_eq!(block.tail(), 36);
    assert_eq!(block.end(), 40);
    assert_eq!(block.span(), 26);
  }

  #[test]
  fn test_mismatched_tags() {
    let mut buf = [0u8; 40];
    put(&mut buf, 0, 6, -6);
    put(&mut buf, 14, 18, 18);
    write_tag(&mut buf, 36, -18).unwrap();

    let mut blocks = Blocks::new(&buf);
    assert_eq!(blocks.by_ref().count(), 1);
    assert!(blocks.is_broken());
  }

  #[test]
  fn test_zero_and_overrunning_tags() {
    let buf = [0u8; 16];
    assert_eq!(Block::read(&buf, 0), None);

    let mut buf = [0u8; 16];
    write_tag(&mut buf, 0, 100).unwrap();
    assert_eq!(Block::read(&buf, 0), None);
  }
}
