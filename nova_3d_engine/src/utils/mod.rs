//! Small data structures shared across engine modules.

mod slot_allocator;

pub use slot_allocator::SlotAllocator;
