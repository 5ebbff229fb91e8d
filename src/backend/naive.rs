#![cfg(test)]

use crate::{SlotAllocator, Unit};

/// Test allocator that succeeds a fixed number of times, then refuses
pub struct NaiveAllocator {
    remaining: usize,
    handed_out: usize,
}

impl NaiveAllocator {
    pub fn new(successes: usize) -> Self {
        Self {
            remaining: successes,
            handed_out: 0,
        }
    }

    pub fn handed_out(&self) -> usize {
        self.handed_out
    }
}

impl SlotAllocator for NaiveAllocator {
    fn alloc_slots(&mut self, len: usize) -> Option<Box<[Unit]>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.handed_out += 1;
        Some(vec![0; len].into_boxed_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_allocator_budget() {
        let mut alloc = NaiveAllocator::new(2);

        assert_eq!(alloc.alloc_slots(3).map(|s| s.len()), Some(3));
        assert_eq!(alloc.alloc_slots(0).map(|s| s.len()), Some(0));
        assert!(alloc.alloc_slots(1).is_none());
        assert_eq!(alloc.handed_out(), 2);
    }
}
