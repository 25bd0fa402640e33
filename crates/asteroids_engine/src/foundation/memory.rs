//! Arena memory for the simulation
//!
//! Every long-lived buffer the simulation touches is sized once at startup
//! and carved from a named [`Arena`]. After startup nothing in the per-frame
//! path grows a heap allocation: arenas hand out byte [`Block`]s from a
//! bump offset, and [`Pool`] provides typed, fixed-capacity storage whose
//! byte budget is charged against an arena.
//!
//! A pool's slots are the arena's region for its element type. Resetting,
//! freeing or dropping the arena releases every block and pool carved from
//! it: released pools read back empty and refuse pushes.
//!
//! ```
//! use asteroids_engine::foundation::memory::{Arena, Pool};
//!
//! let mut arena = Arena::create("ENTITY", 1024).unwrap();
//! let mut ids: Pool<u32> = Pool::carve(&mut arena, 16).unwrap();
//! let slot = ids.push(7).unwrap();
//! assert_eq!(ids.get(slot), Some(&7));
//! assert_eq!(arena.used(), 16 * std::mem::size_of::<u32>());
//!
//! arena.reset();
//! assert!(ids.is_released());
//! assert_eq!(ids.get(slot), None);
//! ```

use std::cell::Cell;
use std::ops::Range;
use std::rc::Rc;

/// Kilobytes to bytes
#[must_use]
pub const fn kilobytes(n: usize) -> usize {
    n * 1024
}

/// Megabytes to bytes
#[must_use]
pub const fn megabytes(n: usize) -> usize {
    kilobytes(n) * 1024
}

/// Memory errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The platform allocator could not reserve the arena's backing region
    #[error("arena [{tag}] could not reserve {size} bytes")]
    AllocationFailure {
        /// Arena name
        tag: String,
        /// Requested size in bytes
        size: usize,
    },

    /// A request did not fit in the remaining capacity
    #[error("arena [{tag}] exhausted: requested {requested} bytes, {remaining} remaining")]
    CapacityExceeded {
        /// Arena or pool name
        tag: String,
        /// Requested size (bytes for arenas, slots for pools)
        requested: usize,
        /// Remaining size in the same unit
        remaining: usize,
    },
}

/// Contents of an arena between two resets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Generation {
    Live(u32),
    Released,
}

/// A byte range handed out by [`Arena::alloc`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    offset: usize,
    len: usize,
    generation: Generation,
}

impl Block {
    /// Byte offset into the arena's byte region
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the block is zero-sized
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Named bump allocator with a fixed byte budget
///
/// [`Arena::alloc`] hands out zeroed byte blocks; [`Pool::carve`] charges
/// typed storage to the same budget. The byte region is reserved in full on
/// the first block, so an arena that only backs pools never holds bytes.
/// [`Arena::reset`] rewinds the budget and releases everything carved so far.
#[derive(Debug)]
pub struct Arena {
    tag: String,
    capacity: usize,
    used: usize,
    bytes: Vec<u8>,
    generation: Rc<Cell<Generation>>,
}

impl Arena {
    /// Create an arena of `size` bytes under the name `tag`
    ///
    /// # Errors
    ///
    /// [`MemoryError::AllocationFailure`] if `size` exceeds what the
    /// platform allocator can ever reserve.
    pub fn create(tag: impl Into<String>, size: usize) -> Result<Self, MemoryError> {
        let tag = tag.into();
        if isize::try_from(size).is_err() {
            log::error!("Arena [{tag}] cannot reserve {size} bytes");
            return Err(MemoryError::AllocationFailure { tag, size });
        }
        log::debug!("Arena [{tag}] created with {size} bytes");

        Ok(Self {
            tag,
            capacity: size,
            used: 0,
            bytes: Vec::new(),
            generation: Rc::new(Cell::new(Generation::Live(0))),
        })
    }

    /// Take `count * element_size` bytes from the budget, returning the
    /// byte length charged
    fn charge(&mut self, count: usize, element_size: usize) -> Result<usize, MemoryError> {
        let remaining = self.remaining();
        let len = count
            .checked_mul(element_size)
            .filter(|&len| len <= remaining)
            .ok_or_else(|| MemoryError::CapacityExceeded {
                tag: self.tag.clone(),
                requested: count.saturating_mul(element_size),
                remaining,
            })?;
        self.used += len;
        Ok(len)
    }

    fn refund(&mut self, len: usize) {
        self.used -= len;
    }

    /// Carve a zeroed block of `count * element_size` bytes
    ///
    /// # Errors
    ///
    /// [`MemoryError::CapacityExceeded`] if the request (or its size
    /// computation) does not fit, and [`MemoryError::AllocationFailure`] if
    /// the byte region cannot be reserved. The arena is left unchanged.
    pub fn alloc(&mut self, count: usize, element_size: usize) -> Result<Block, MemoryError> {
        let len = self.charge(count, element_size)?;
        if self.bytes.capacity() == 0 && self.bytes.try_reserve_exact(self.capacity).is_err() {
            self.refund(len);
            return Err(MemoryError::AllocationFailure {
                tag: self.tag.clone(),
                size: self.capacity,
            });
        }

        let offset = self.bytes.len();
        self.bytes.resize(offset + len, 0);
        Ok(Block {
            offset,
            len,
            generation: self.generation.get(),
        })
    }

    /// Bytes of a block carved since the last reset
    #[must_use]
    pub fn bytes(&self, block: Block) -> Option<&[u8]> {
        if block.generation != self.generation.get() {
            return None;
        }
        self.bytes.get(block.range())
    }

    /// Mutable bytes of a block carved since the last reset
    pub fn bytes_mut(&mut self, block: Block) -> Option<&mut [u8]> {
        if block.generation != self.generation.get() {
            return None;
        }
        self.bytes.get_mut(block.range())
    }

    /// Release every block and pool and rewind to empty
    ///
    /// Blocks carved afterwards start zeroed; earlier blocks no longer
    /// resolve and earlier pools read back empty.
    pub fn reset(&mut self) {
        let next = match self.generation.get() {
            Generation::Live(n) => Generation::Live(n.wrapping_add(1)),
            Generation::Released => Generation::Released,
        };
        log::trace!("Arena [{}] reset ({} bytes released)", self.tag, self.used);
        self.generation.set(next);
        self.bytes.clear();
        self.used = 0;
    }

    /// Release the arena along with everything carved from it
    pub fn free(self) {
        log::debug!(
            "Arena [{}] freed ({} of {} bytes in use)",
            self.tag,
            self.used,
            self.capacity
        );
    }

    /// Arena name
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Total size in bytes
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes handed out since the last reset
    #[must_use]
    pub const fn used(&self) -> usize {
        self.used
    }

    /// Bytes still available
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.capacity - self.used
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        self.generation.set(Generation::Released);
    }
}

/// Fixed-capacity typed storage carved from an arena
///
/// Slots are appended in order and addressed by dense index. Capacity never
/// changes after [`Pool::carve`]; a full pool refuses further pushes. Once
/// the arena is reset or freed the pool is released: it reads back empty,
/// refuses pushes and drops its slots on the next mutable access.
#[derive(Debug)]
pub struct Pool<T> {
    tag: String,
    items: Vec<T>,
    capacity: usize,
    arena_generation: Rc<Cell<Generation>>,
    carved_in: Generation,
}

impl<T> Pool<T> {
    /// Carve room for `capacity` values of `T`, charging
    /// `capacity * size_of::<T>()` bytes to `arena`
    ///
    /// # Errors
    ///
    /// Fails if the arena cannot cover the budget or the slots cannot be
    /// reserved; the arena is left unchanged.
    pub fn carve(arena: &mut Arena, capacity: usize) -> Result<Self, MemoryError> {
        let len = arena.charge(capacity, std::mem::size_of::<T>())?;

        let mut items = Vec::new();
        if items.try_reserve_exact(capacity).is_err() {
            arena.refund(len);
            return Err(MemoryError::AllocationFailure {
                tag: arena.tag().to_owned(),
                size: len,
            });
        }

        Ok(Self {
            tag: arena.tag().to_owned(),
            items,
            capacity,
            arena_generation: Rc::clone(&arena.generation),
            carved_in: arena.generation.get(),
        })
    }

    /// Whether the arena has been reset or freed since this pool was carved
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.arena_generation.get() != self.carved_in
    }

    /// Drop the slots of a released pool; true while the pool is live
    fn reclaim(&mut self) -> bool {
        if self.is_released() {
            if self.items.capacity() > 0 {
                log::trace!("Pool in [{}] released with its arena", self.tag);
                self.items = Vec::new();
            }
            return false;
        }
        true
    }

    /// Append a value and return its index
    ///
    /// # Errors
    ///
    /// [`MemoryError::CapacityExceeded`] when the pool is full or released.
    pub fn push(&mut self, value: T) -> Result<usize, MemoryError> {
        if !self.reclaim() || self.items.len() >= self.capacity {
            return Err(MemoryError::CapacityExceeded {
                tag: self.tag.clone(),
                requested: 1,
                remaining: 0,
            });
        }
        self.items.push(value);
        Ok(self.items.len() - 1)
    }

    /// Value at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Mutable value at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if !self.reclaim() {
            return None;
        }
        self.items.get_mut(index)
    }

    /// Drop every value and rewind to empty; capacity is kept
    pub fn reset(&mut self) {
        if self.reclaim() {
            self.items.clear();
        }
    }

    /// Keep only the values `keep` accepts, preserving order
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        if self.reclaim() {
            self.items.retain(keep);
        }
    }

    /// Number of occupied slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether no slot is occupied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Whether no further value fits
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Maximum number of slots; zero once released
    #[must_use]
    pub fn capacity(&self) -> usize {
        if self.is_released() {
            0
        } else {
            self.capacity
        }
    }

    /// Occupied slots in index order
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        if self.is_released() {
            &[]
        } else {
            &self.items
        }
    }

    /// Iterate occupied slots in index order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_advances_offset() {
        let mut arena = Arena::create("TEST", 64).unwrap();
        let a = arena.alloc(4, 4).unwrap();
        let b = arena.alloc(2, 8).unwrap();

        assert_eq!(a.offset(), 0);
        assert_eq!(b.offset(), 16);
        assert_eq!(arena.used(), 32);
        assert_eq!(arena.remaining(), 32);
    }

    #[test]
    fn test_alloc_past_capacity_fails_without_mutation() {
        let mut arena = Arena::create("TEST", 16).unwrap();
        arena.alloc(1, 10).unwrap();

        let err = arena.alloc(1, 10).unwrap_err();
        assert_eq!(
            err,
            MemoryError::CapacityExceeded {
                tag: "TEST".into(),
                requested: 10,
                remaining: 6
            }
        );
        assert_eq!(arena.used(), 10);
    }

    #[test]
    fn test_alloc_overflowing_size_fails() {
        let mut arena = Arena::create("TEST", 16).unwrap();
        assert!(arena.alloc(usize::MAX, 2).is_err());
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_exact_fit() {
        let mut arena = Arena::create("TEST", 16).unwrap();
        assert!(arena.alloc(4, 4).is_ok());
        assert_eq!(arena.remaining(), 0);
        assert!(arena.alloc(0, 4).is_ok());
        assert!(arena.alloc(1, 1).is_err());
    }

    #[test]
    fn test_reset_releases_blocks_and_rewinds() {
        let mut arena = Arena::create("TEST", 8).unwrap();
        let block = arena.alloc(8, 1).unwrap();
        arena.bytes_mut(block).unwrap().fill(0xAB);

        arena.reset();

        assert_eq!(arena.used(), 0);
        assert_eq!(arena.bytes(block), None);
        let fresh = arena.alloc(8, 1).unwrap();
        assert_eq!(fresh.offset(), 0);
        assert!(arena.bytes(fresh).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_huge_arena_reports_allocation_failure() {
        let err = Arena::create("HUGE", usize::MAX).unwrap_err();
        assert!(matches!(err, MemoryError::AllocationFailure { .. }));
    }

    #[test]
    fn test_pool_charges_arena_and_caps_pushes() {
        let mut arena = Arena::create("POOL", 64).unwrap();
        let mut pool: Pool<u64> = Pool::carve(&mut arena, 2).unwrap();
        assert_eq!(arena.used(), 16);

        assert_eq!(pool.push(10).unwrap(), 0);
        assert_eq!(pool.push(20).unwrap(), 1);
        assert!(pool.is_full());
        assert!(pool.push(30).is_err());
        assert_eq!(pool.as_slice(), &[10, 20]);

        pool.reset();
        assert!(pool.is_empty());
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn test_pool_larger_than_arena_fails() {
        let mut arena = Arena::create("POOL", 8).unwrap();
        assert!(Pool::<u64>::carve(&mut arena, 2).is_err());
    }

    #[test]
    fn test_pool_only_arena_holds_no_bytes() {
        let mut arena = Arena::create("POOL", megabytes(1)).unwrap();
        let _pool: Pool<u64> = Pool::carve(&mut arena, 1000).unwrap();
        assert_eq!(arena.used(), 8000);
        assert_eq!(arena.bytes.capacity(), 0);
    }

    #[test]
    fn test_arena_reset_empties_its_pools() {
        let mut arena = Arena::create("POOL", 64).unwrap();
        let mut pool: Pool<u64> = Pool::carve(&mut arena, 2).unwrap();
        pool.push(7).unwrap();

        arena.reset();

        assert!(pool.is_released());
        assert!(pool.is_empty());
        assert_eq!(pool.get(0), None);
        assert_eq!(pool.get_mut(0), None);
        assert_eq!(pool.capacity(), 0);
        assert!(pool.push(8).is_err());

        // The budget is free for a fresh carve
        let mut fresh: Pool<u64> = Pool::carve(&mut arena, 8).unwrap();
        assert_eq!(fresh.push(9).unwrap(), 0);
        assert!(!fresh.is_released());
    }

    #[test]
    fn test_freed_arena_releases_its_pools() {
        let mut arena = Arena::create("POOL", 64).unwrap();
        let mut pool: Pool<u32> = Pool::carve(&mut arena, 4).unwrap();
        pool.push(1).unwrap();

        arena.free();

        assert!(pool.is_released());
        assert!(pool.as_slice().is_empty());
        assert!(pool.push(2).is_err());
    }

    #[test]
    fn test_pool_retain_keeps_order() {
        let mut arena = Arena::create("POOL", 64).unwrap();
        let mut pool: Pool<u32> = Pool::carve(&mut arena, 6).unwrap();
        for value in 1..=6 {
            pool.push(value).unwrap();
        }
        pool.retain(|value| value % 2 == 0);
        assert_eq!(pool.as_slice(), &[2, 4, 6]);
    }
}
