use std::{
  fmt,
  marker::PhantomData,
  mem::{self, ManuallyDrop},
  ops::Range,
  ptr,
};

use crate::{
  block::{Block, Blocks},
  error::{AllocError, Result},
  pointer::Pointer,
  tag::{self, TAG_SIZE, Tag},
  tracing_helpers::{debug_log, error_log, trace_log, warn_log},
};

/// Fixed-capacity allocator for elements of type `T` over an inline buffer
/// of `N` bytes.
///
/// The buffer is tiled by blocks carrying a boundary tag at each end (see
/// [`crate::tag`]). Allocation is first-fit: the leftmost free block that
/// can be split is split, otherwise the leftmost free block that is large
/// enough is handed out whole. Deallocation merges the freed block with
/// free neighbours on both sides.
pub struct Allocator<T, const N: usize> {
  buf: [u8; N],
  _marker: PhantomData<T>,
}

impl<T, const N: usize> Allocator<T, N> {
  /// Smallest payload a free block may be left with.
  const MIN_PAYLOAD: usize = if mem::size_of::<T>() == 0 {
    1
  } else {
    mem::size_of::<T>()
  };

  /// Smallest block a split may produce, tags included.
  pub const MIN_BLOCK: usize = 2 * TAG_SIZE + Self::MIN_PAYLOAD;

  /// Payload of the single free block of an empty allocator.
  pub const CAPACITY: usize = {
    assert!(N <= Tag::MAX as usize, "buffer size does not fit in a tag");
    assert!(N >= Self::MIN_BLOCK, "buffer cannot hold a single block");
    N - 2 * TAG_SIZE
  };

  /// Creates an allocator whose whole buffer is one free block.
  pub fn new() -> Self {
    let mut allocator = Self {
      buf: [0; N],
      _marker: PhantomData,
    };
    allocator.write_block(0, Self::CAPACITY, true);
    allocator.check("new");
    allocator
  }

  /// Reserves room for `count` consecutive elements.
  ///
  /// Returns a pointer to the first element.
  pub fn allocate(
    &mut self,
    count: usize,
  ) -> Result<Pointer<T>> {
    let requested = Self::request_size(count)?;

    let payload = match self.first_fit(requested) {
      Some(Fit::Split(block)) => {
        let rest = Block::new(
          block.offset + requested + 2 * TAG_SIZE,
          block.size - requested - 2 * TAG_SIZE,
          true,
        );
        self.write_block(block.offset, requested, false);
        self.write_block(rest.offset, rest.size, true);
        trace_log!(
          offset = block.offset,
          requested,
          remainder = rest.size,
          "split free block"
        );
        block.payload()
      }
      Some(Fit::Whole(block)) => {
        self.write_block(block.offset, block.size, false);
        trace_log!(
          offset = block.offset,
          requested,
          size = block.size,
          "handed out whole free block"
        );
        block.payload()
      }
      None => {
        let largest_free = self.largest_free();
        warn_log!(requested, largest_free, "allocation failed");
        return Err(AllocError::OutOfSpace {
          requested,
          largest_free,
        });
      }
    };

    self.check("allocate");
    debug_log!(count, payload, "allocated");
    Ok(Pointer::new(payload))
  }

  /// Releases the allocation starting at `ptr`.
  ///
  /// `count` is accepted for symmetry with [`Allocator::allocate`]; the
  /// block size is recovered from its tags.
  pub fn deallocate(
    &mut self,
    ptr: Pointer<T>,
    _count: usize,
  ) -> Result<()> {
    let block = self.live_block(ptr).ok_or_else(|| {
      warn_log!(offset = ptr.offset(), "deallocate of unknown pointer");
      AllocError::InvalidPointer {
        offset: ptr.offset(),
      }
    })?;

    let mut start = block.offset;
    let mut size = block.size;

    if let Some(prev) = self.block_before(&block).filter(|prev| prev.is_free) {
      trace_log!(offset = prev.offset, size = prev.size, "merging with previous block");
      start = prev.offset;
      size += prev.size + 2 * TAG_SIZE;
    }

    if let Some(next) = self.block_after(&block).filter(|next| next.is_free) {
      trace_log!(offset = next.offset, size = next.size, "merging with next block");
      size += next.size + 2 * TAG_SIZE;
    }

    self.write_block(start, size, true);
    self.check("deallocate");
    debug_log!(offset = ptr.offset(), start, size, "deallocated");
    Ok(())
  }

  /// Moves `value` into the buffer at `ptr`.
  ///
  /// `ptr` must address an element lying inside an allocated block.
  pub fn construct(
    &mut self,
    ptr: Pointer<T>,
    value: T,
  ) -> Result<()> {
    let range = self.element_range(ptr)?;
    let slot = &mut self.buf[range];
    // SAFETY: `slot` is exactly `size_of::<T>()` bytes of the buffer, and the
    // write makes no alignment assumption.
    unsafe { ptr::write_unaligned(slot.as_mut_ptr().cast::<T>(), value) };
    self.check("construct");
    Ok(())
  }

  /// Drops the value stored at `ptr`.
  ///
  /// # Safety
  ///
  /// A value must have been placed at `ptr` by [`Allocator::construct`] and
  /// not destroyed since.
  pub unsafe fn destroy(
    &mut self,
    ptr: Pointer<T>,
  ) -> Result<()> {
    let range = self.element_range(ptr)?;
    let slot = &self.buf[range];
    // SAFETY: the caller guarantees `slot` holds a live `T`; ownership moves
    // out of the buffer and the value is dropped here.
    drop(unsafe { ptr::read_unaligned(slot.as_ptr().cast::<T>()) });
    self.check("destroy");
    Ok(())
  }

  /// Returns a clone of the value stored at `ptr`.
  ///
  /// # Safety
  ///
  /// A value must have been placed at `ptr` by [`Allocator::construct`] and
  /// not destroyed since.
  pub unsafe fn get(
    &self,
    ptr: Pointer<T>,
  ) -> Result<T>
  where
    T: Clone,
  {
    let range = self.element_range(ptr)?;
    let slot = &self.buf[range];
    // SAFETY: the caller guarantees `slot` holds a live `T`. The bitwise copy
    // is never dropped, so ownership stays with the buffer.
    let value = ManuallyDrop::new(unsafe { ptr::read_unaligned(slot.as_ptr().cast::<T>()) });
    Ok(T::clone(&value))
  }

  /// Checks that the blocks tile the buffer exactly and that both tags of
  /// every block agree.
  pub fn valid(&self) -> bool {
    let mut blocks = self.blocks();
    let covered: usize = blocks.by_ref().map(|block| block.span()).sum();
    !blocks.is_broken() && covered == N
  }

  /// Iterates over the blocks in buffer order.
  pub fn blocks(&self) -> Blocks<'_> {
    Blocks::new(&self.buf)
  }

  /// Raw tag stored at `offset`, if a tag fits there.
  pub fn tag_at(
    &self,
    offset: usize,
  ) -> Option<Tag> {
    tag::read_tag(&self.buf, offset)
  }

  /// Total payload bytes held by free blocks.
  pub fn free_bytes(&self) -> usize {
    self
      .blocks()
      .filter(|block| block.is_free)
      .map(|block| block.size)
      .sum()
  }

  /// Payload size of the largest free block, or zero when none is free.
  pub fn largest_free(&self) -> usize {
    self
      .blocks()
      .filter(|block| block.is_free)
      .map(|block| block.size)
      .max()
      .unwrap_or(0)
  }

  /// Leftmost free block that can be split for `requested` bytes, or failing
  /// that, the leftmost one large enough to hand out whole.
  fn first_fit(
    &self,
    requested: usize,
  ) -> Option<Fit> {
    self
      .blocks()
      .find(|block| {
        block.is_free
          && block
            .size
            .checked_sub(requested)
            .is_some_and(|rest| rest >= Self::MIN_BLOCK)
      })
      .map(Fit::Split)
      .or_else(|| {
        self
          .blocks()
          .find(|block| block.is_free && block.size >= requested)
          .map(Fit::Whole)
      })
  }

  fn request_size(count: usize) -> Result<usize> {
    let reject = |reason: &'static str| {
      warn_log!(count, reason, "rejected allocation request");
      Err(AllocError::InvalidSize { count, reason })
    };

    if count == 0 {
      return reject("zero elements requested");
    }
    let Some(bytes) = count.checked_mul(mem::size_of::<T>()) else {
      return reject("request size overflows");
    };
    if bytes == 0 {
      return reject("zero-sized element type");
    }
    if bytes > Self::CAPACITY {
      return reject("request exceeds buffer capacity");
    }
    Ok(bytes)
  }

  /// Allocated block whose payload starts at `ptr`.
  fn live_block(
    &self,
    ptr: Pointer<T>,
  ) -> Option<Block> {
    self
      .blocks()
      .take_while(|block| block.payload() <= ptr.offset())
      .find(|block| !block.is_free && block.payload() == ptr.offset())
  }

  fn block_before(
    &self,
    block: &Block,
  ) -> Option<Block> {
    let tail = block.offset.checked_sub(TAG_SIZE)?;
    let size = tag::payload_size(self.tag_at(tail)?);
    let offset = tail.checked_sub(size)?.checked_sub(TAG_SIZE)?;
    Block::read(&self.buf, offset)
  }

  fn block_after(
    &self,
    block: &Block,
  ) -> Option<Block> {
    Block::read(&self.buf, block.end())
  }

  /// Byte range of the element at `ptr`, if it lies inside an allocated
  /// payload.
  fn element_range(
    &self,
    ptr: Pointer<T>,
  ) -> Result<Range<usize>> {
    let start = ptr.offset();
    let end = start.checked_add(mem::size_of::<T>());

    end
      .and_then(|end| {
        self
          .blocks()
          .find(|block| !block.is_free && block.payload() <= start && end <= block.tail())
          .map(|_| start..end)
      })
      .ok_or(AllocError::InvalidPointer { offset: start })
  }

  fn write_block(
    &mut self,
    offset: usize,
    size: usize,
    is_free: bool,
  ) {
    let written = tag::encode(size, is_free).and_then(|value| {
      tag::write_tag(&mut self.buf, offset, value)?;
      tag::write_tag(&mut self.buf, offset + TAG_SIZE + size, value)
    });

    if written.is_none() {
      Self::corrupted("write_block");
    }
  }

  fn check(
    &self,
    op: &'static str,
  ) {
    if cfg!(any(debug_assertions, feature = "strict")) && !self.valid() {
      Self::corrupted(op);
    }
  }

  #[cold]
  fn corrupted(op: &'static str) -> ! {
    error_log!(op, "block partition is corrupted");
    panic!("partition invariant violated in {op}")
  }
}

enum Fit {
  Split(Block),
  Whole(Block),
}

impl<T, const N: usize> Default for Allocator<T, N> {
  fn default() -> Self {
    Self::new()
  }
}

/// Any two allocators of the same type are interchangeable.
impl<T, const N: usize> PartialEq for Allocator<T, N> {
  fn eq(
    &self,
    _other: &Self,
  ) -> bool {
    true
  }
}

impl<T, const N: usize> Eq for Allocator<T, N> {}

impl<T, const N: usize> fmt::Debug for Allocator<T, N> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Allocator")
      .field("size", &N)
      .field("blocks", &self.blocks().collect::<Vec<_>>())
      .finish()
  }
}

/// Block map, one `[offset used|free size]` entry per block.
impl<T, const N: usize> fmt::Display for Allocator<T, N> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    let mut blocks = self.blocks();
    for block in blocks.by_ref() {
      let state = if block.is_free { "free" } else { "used" };
      write!(f, "[{} {} {}]", block.offset, state, block.size)?;
    }
    if blocks.is_broken() {
      write!(f, "[corrupted]")?;
    }
    Ok(())
  }
}
