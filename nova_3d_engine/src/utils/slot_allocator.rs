/// Hands out and recycles `u32` slot indices within a fixed capacity.
///
/// Backs the free list of one sub-buffer chunk: indices map to
/// equal-sized regions of the chunk's buffer. Fresh indices come out in
/// ascending order; freed indices are recycled last-in first-out.
///
/// # Example
///
/// ```ignore
/// let mut alloc = SlotAllocator::new(2);
/// let a = alloc.alloc();  // Some(0)
/// let b = alloc.alloc();  // Some(1)
/// alloc.alloc();          // None (full)
/// alloc.free(0);          // 0 is now available
/// let c = alloc.alloc();  // Some(0) (recycled)
/// ```
pub struct SlotAllocator {
    free_list: Vec<u32>,
    next_id: u32,
    capacity: u32,
    live: Vec<bool>,
    len: u32,
}

impl SlotAllocator {
    /// Create an allocator able to hold `capacity` live slots
    pub fn new(capacity: u32) -> Self {
        Self {
            free_list: Vec::new(),
            next_id: 0,
            capacity,
            live: vec![false; capacity as usize],
            len: 0,
        }
    }

    /// Allocate the next available slot index, or `None` when full
    pub fn alloc(&mut self) -> Option<u32> {
        let id = match self.free_list.pop() {
            Some(id) => id,
            None if self.next_id < self.capacity => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
            None => return None,
        };
        self.live[id as usize] = true;
        self.len += 1;
        Some(id)
    }

    /// Return a slot index to the pool for reuse
    ///
    /// Returns `false` (and changes nothing) if `id` is out of range or not
    /// currently allocated.
    pub fn free(&mut self, id: u32) -> bool {
        match self.live.get_mut(id as usize) {
            Some(live) if *live => {
                *live = false;
                self.len -= 1;
                self.free_list.push(id);
                true
            }
            _ => false,
        }
    }

    /// Number of currently allocated slots
    pub fn len(&self) -> u32 {
        self.len
    }
}

#[cfg(test)]
impl SlotAllocator {
    pub(crate) fn is_live(&self, id: u32) -> bool {
        self.live.get(id as usize).copied().unwrap_or(false)
    }

    /// Highest index ever allocated + 1
    pub(crate) fn high_water_mark(&self) -> u32 {
        self.next_id
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.capacity
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len == self.capacity
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "slot_allocator_tests.rs"]
mod tests;
