use std::{
  cmp::Ordering,
  fmt,
  hash::{Hash, Hasher},
  marker::PhantomData,
  mem,
};

/// Position of an element of type `T` inside an allocator's buffer.
///
/// A pointer is a plain byte offset. It is only meaningful for the
/// allocator that handed it out; the allocator checks every pointer it is
/// given against its own block layout.
pub struct Pointer<T> {
  offset: usize,
  _marker: PhantomData<fn() -> T>,
}

impl<T> Pointer<T> {
  pub(crate) const fn new(offset: usize) -> Self {
    Self {
      offset,
      _marker: PhantomData,
    }
  }

  /// Byte offset into the buffer.
  pub const fn offset(self) -> usize {
    self.offset
  }

  /// Pointer to the `count`-th element after this one.
  ///
  /// The offset wraps instead of overflowing; the allocator rejects any
  /// pointer that falls outside an allocation.
  pub const fn add(
    self,
    count: usize,
  ) -> Self {
    Self::new(
      self
        .offset
        .wrapping_add(count.wrapping_mul(mem::size_of::<T>())),
    )
  }

  /// Pointer to the `count`-th element before this one.
  ///
  /// Stepping before the buffer start wraps around like [`Pointer::add`].
  pub const fn sub(
    self,
    count: usize,
  ) -> Self {
    Self::new(
      self
        .offset
        .wrapping_sub(count.wrapping_mul(mem::size_of::<T>())),
    )
  }
}

impl<T> Clone for Pointer<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for Pointer<T> {}

impl<T> PartialEq for Pointer<T> {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    self.offset == other.offset
  }
}

impl<T> Eq for Pointer<T> {}

impl<T> PartialOrd for Pointer<T> {
  fn partial_cmp(
    &self,
    other: &Self,
  ) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl<T> Ord for Pointer<T> {
  fn cmp(
    &self,
    other: &Self,
  ) -> Ordering {
    self.offset.cmp(&other.offset)
  }
}

impl<T> Hash for Pointer<T> {
  fn hash<H: Hasher>(
    &self,
    state: &mut H,
  ) {
    self.offset.hash(state);
  }
}

impl<T> fmt::Debug for Pointer<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "Pointer({})", self.offset)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{AllocError, Allocator};

  #[test]
  fn test_element_steps() {
    let p: Pointer<u64> = Pointer::new(4);

    assert_eq!(p.add(3).offset(), 28);
    assert_eq!(p.add(3).sub(3), p);
    assert!(p < p.add(1));
  }

  #[test]
  fn test_step_before_buffer_is_rejected() {
    let mut allocator = Allocator::<u64, 64>::new();
    let p = allocator.allocate(1).unwrap();
    assert_eq!(p.offset(), 4);

    let before = p.sub(1);
    assert_eq!(before.offset(), 4usize.wrapping_sub(8));
    assert_eq!(before.add(1), p);

    assert_eq!(
      allocator.deallocate(before, 1),
      Err(AllocError::InvalidPointer {
        offset: before.offset()
      })
    );
    assert_eq!(
      allocator.construct(before, 7),
      Err(AllocError::InvalidPointer {
        offset: before.offset()
      })
    );

    let far = p.add(usize::MAX);
    assert_eq!(
      allocator.construct(far, 7),
      Err(AllocError::InvalidPointer { offset: far.offset() })
    );
    assert!(allocator.valid());
  }
}
