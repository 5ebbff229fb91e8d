use std::alloc::{Layout, alloc_zeroed};
use std::ptr;

use crate::{SlotAllocator, Unit};

/// Heap-backed slot allocator with an optional per-buffer limit
///
/// Buffers come from [`alloc_zeroed`], so requests the system cannot
/// satisfy come back as `None` rather than aborting. The zero fill is left
/// to the system allocator: large buffers are mapped zero pages that are
/// only touched once a unit is stored, which keeps a resize proportional to
/// the units it copies rather than to the new capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapAllocator {
    limit: Option<usize>,
}

impl HeapAllocator {
    /// Creates an unbounded allocator
    pub const fn new() -> Self {
        Self { limit: None }
    }

    /// Creates an allocator refusing buffers longer than `max_slots`
    pub const fn with_limit(max_slots: usize) -> Self {
        Self {
            limit: Some(max_slots),
        }
    }
}

impl SlotAllocator for HeapAllocator {
    fn alloc_slots(&mut self, len: usize) -> Option<Box<[Unit]>> {
        if self.limit.is_some_and(|max| len > max) {
            return None;
        }

        if len == 0 {
            return Some(Box::default());
        }

        let layout = Layout::array::<Unit>(len).ok()?;
        // SAFETY: `layout` has a non-zero size since `len > 0`.
        let raw = unsafe { alloc_zeroed(layout) }.cast::<Unit>();
        if raw.is_null() {
            return None;
        }
        // SAFETY: `raw` was allocated by the global allocator with the layout
        // of `[Unit; len]`, and all-zero bytes are a valid `Unit`.
        Some(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(raw, len)) })
    }

    fn max_slots(&self) -> Option<usize> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_alloc_exact_len() {
        let mut alloc = HeapAllocator::new();

        let slots = alloc.alloc_slots(10).unwrap();
        assert_eq!(slots.len(), 10);
        assert!(slots.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_heap_alloc_zero_len() {
        let mut alloc = HeapAllocator::new();
        assert_eq!(alloc.alloc_slots(0).map(|s| s.len()), Some(0));
    }

    #[test]
    fn test_heap_alloc_capacity_overflow() {
        let mut alloc = HeapAllocator::new();
        assert!(alloc.alloc_slots(usize::MAX).is_none());
    }

    #[test]
    fn test_heap_alloc_above_isize_max() {
        let mut alloc = HeapAllocator::new();
        assert!(alloc.alloc_slots(usize::MAX / 4).is_none());
    }

    #[test]
    fn test_heap_alloc_large_is_zeroed_and_writable() {
        let mut alloc = HeapAllocator::new();
        let len = 1 << 24;

        let mut slots = alloc.alloc_slots(len).unwrap();
        assert_eq!(slots.len(), len);
        assert_eq!(slots[0], 0);
        assert_eq!(slots[len - 1], 0);
        slots[len - 1] = -1;
        assert_eq!(slots[len - 1], -1);
    }

    #[test]
    fn test_heap_alloc_limit() {
        let mut alloc = HeapAllocator::with_limit(4);
        assert_eq!(alloc.max_slots(), Some(4));

        assert!(alloc.alloc_slots(4).is_some());
        assert!(alloc.alloc_slots(5).is_none());
        assert_eq!(HeapAllocator::new().max_slots(), None);
    }
}
