//! Construct/destroy round trips for several element types.

mod common;

use std::{cell::Cell, rc::Rc};

use tagalloc::{AllocError, Allocator};

macro_rules! typed_tests {
  ($($name:ident: $ty:ty = $value:expr;)*) => {
    $(
      mod $name {
        use super::*;

        #[test]
        fn one() {
          common::init_tracing();
          let mut allocator = Allocator::<$ty, 100>::new();
          let value: $ty = $value;

          let p = allocator.allocate(1).unwrap();
          allocator.construct(p, value).unwrap();
          assert_eq!(unsafe { allocator.get(p) }, Ok(value));
          unsafe { allocator.destroy(p) }.unwrap();
          allocator.deallocate(p, 1).unwrap();

          assert!(allocator.valid());
        }

        #[test]
        fn ten() {
          let mut allocator = Allocator::<$ty, 100>::new();
          let value: $ty = $value;

          let b = allocator.allocate(10).unwrap();
          for i in 0..10 {
            allocator.construct(b.add(i), value).unwrap();
          }

          let matching = (0..10)
            .filter(|&i| unsafe { allocator.get(b.add(i)) } == Ok(value))
            .count();
          assert_eq!(matching, 10);

          for i in (0..10).rev() {
            unsafe { allocator.destroy(b.add(i)) }.unwrap();
          }
          allocator.deallocate(b, 10).unwrap();

          assert_eq!(common::blocks(&allocator).len(), 1);
        }
      }
    )*
  };
}

typed_tests! {
  bytes: u8 = 2;
  ints: i32 = 2;
  doubles: f64 = 2.0;
  pairs: (u16, i16) = (2, -2);
}

/// Counts how many times it has been dropped.
#[derive(Clone)]
struct Tracked(Rc<Cell<usize>>);

impl Drop for Tracked {
  fn drop(&mut self) {
    self.0.set(self.0.get() + 1);
  }
}

#[test]
fn destroy_runs_drop_exactly_once() {
  let drops = Rc::new(Cell::new(0));
  let mut allocator = Allocator::<Tracked, 200>::new();

  let p = allocator.allocate(3).unwrap();
  for i in 0..3 {
    allocator.construct(p.add(i), Tracked(drops.clone())).unwrap();
  }
  assert_eq!(drops.get(), 0);
  assert_eq!(Rc::strong_count(&drops), 4);

  let copy = unsafe { allocator.get(p.add(1)) }.unwrap();
  assert_eq!(Rc::strong_count(&drops), 5);
  drop(copy);
  assert_eq!(drops.get(), 1);

  for i in 0..3 {
    unsafe { allocator.destroy(p.add(i)) }.unwrap();
  }
  assert_eq!(drops.get(), 4);
  assert_eq!(Rc::strong_count(&drops), 1);

  allocator.deallocate(p, 3).unwrap();
}

#[test]
fn rejected_construct_drops_value() {
  let drops = Rc::new(Cell::new(0));
  let mut allocator = Allocator::<Tracked, 200>::new();
  let p = allocator.allocate(1).unwrap();

  assert_eq!(
    allocator.construct(p.add(1), Tracked(drops.clone())),
    Err(AllocError::InvalidPointer {
      offset: p.add(1).offset()
    })
  );
  assert_eq!(drops.get(), 1);
}

#[test]
fn allocators_compare_equal() {
  let mut a = Allocator::<f64, 64>::new();
  let b = Allocator::<f64, 64>::new();
  a.allocate(2).unwrap();

  assert!(a == b);
  assert!(!(a != b));
}
