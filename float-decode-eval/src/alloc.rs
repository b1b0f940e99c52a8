//! Heap allocation counting for the report binary. Criterion has no equivalent
//! of a per-iteration allocation report, so the harness installs a counting
//! global allocator and samples the counters around a single decode.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);

/// Forwards every call to the system allocator and counts allocation calls and
/// requested bytes. Install with `#[global_allocator]`; reallocation counts as
/// a fresh allocation of the new size.
pub struct CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
  unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
    ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    ALLOCATED_BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed);
    System.alloc(layout)
  }

  unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
    ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    ALLOCATED_BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed);
    System.alloc_zeroed(layout)
  }

  unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
    ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    ALLOCATED_BYTES.fetch_add(new_size as u64, Ordering::Relaxed);
    System.realloc(ptr, layout, new_size)
  }

  unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
    System.dealloc(ptr, layout)
  }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AllocStats {
  pub allocations: u64,
  pub bytes: u64,
}

pub fn reset() {
  ALLOCATIONS.store(0, Ordering::Relaxed);
  ALLOCATED_BYTES.store(0, Ordering::Relaxed);
}

pub fn snapshot() -> AllocStats {
  AllocStats {
    allocations: ALLOCATIONS.load(Ordering::Relaxed),
    bytes: ALLOCATED_BYTES.load(Ordering::Relaxed),
  }
}
