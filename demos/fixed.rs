use tagalloc::{AllocError, Allocator};

const BUFFER_SIZE: usize = 128;

/// Prints the block map and free space after a step.
fn print_blocks(
  label: &str,
  allocator: &Allocator<u32, BUFFER_SIZE>,
) {
  println!(
    "[{}] {} (free = {} bytes, largest = {}, valid = {})",
    label,
    allocator,
    allocator.free_bytes(),
    allocator.largest_free(),
    allocator.valid(),
  );
}

fn main() -> Result<(), AllocError> {
  // Every block is framed by two 4-byte tags, so the empty allocator holds a
  // single free block of BUFFER_SIZE - 8 bytes.
  let mut allocator = Allocator::<u32, BUFFER_SIZE>::new();
  print_blocks("start", &allocator);

  // --------------------------------------------------------------------
  // 1) Allocate three u32 and fill them.
  // --------------------------------------------------------------------
  let first = allocator.allocate(3)?;
  for i in 0..3 {
    allocator.construct(first.add(i), 0xDEAD_0000 + i as u32)?;
  }
  println!("\n[1] allocate(3) -> {:?}", first);
  print_blocks("1", &allocator);

  // --------------------------------------------------------------------
  // 2) Two more allocations; each one splits the trailing free block.
  // --------------------------------------------------------------------
  let second = allocator.allocate(8)?;
  let third = allocator.allocate(2)?;
  println!("\n[2] allocate(8) -> {:?}, allocate(2) -> {:?}", second, third);
  print_blocks("2", &allocator);

  // --------------------------------------------------------------------
  // 3) Free the first block. Its neighbour is in use, so nothing merges.
  // --------------------------------------------------------------------
  for i in 0..3 {
    unsafe { allocator.destroy(first.add(i))? };
  }
  allocator.deallocate(first, 3)?;
  println!("\n[3] deallocate {:?}", first);
  print_blocks("3", &allocator);

  // --------------------------------------------------------------------
  // 4) A small request. Splitting is preferred over handing out a whole
  //    block, so the 12-byte hole is skipped for the larger free block.
  // --------------------------------------------------------------------
  let fourth = allocator.allocate(1)?;
  println!(
    "\n[4] allocate(1) -> {:?}, landed in the hole? {}",
    fourth,
    if fourth == first { "yes" } else { "no" }
  );
  print_blocks("4", &allocator);

  // --------------------------------------------------------------------
  // 5) Free everything; the blocks merge back into one.
  // --------------------------------------------------------------------
  allocator.deallocate(second, 8)?;
  allocator.deallocate(fourth, 1)?;
  allocator.deallocate(third, 2)?;
  println!("\n[5] deallocate all");
  print_blocks("5", &allocator);

  // --------------------------------------------------------------------
  // 6) Requests that cannot be served.
  // --------------------------------------------------------------------
  println!("\n[6] allocate(64) -> {:?}", allocator.allocate(64).unwrap_err());
  println!("[6] deallocate twice -> {:?}", allocator.deallocate(third, 2).unwrap_err());

  Ok(())
}
