use crate::{SlotAllocator, StackError, Unit};

/// Unsynchronised LIFO state: the unit buffer, the fill count and the
/// allocator that produced the buffer.
///
/// `slots.len()` is the capacity. Slots `0..count` hold live units, oldest
/// first.
pub struct LifoBuffer<A: SlotAllocator> {
    slots: Box<[Unit]>,
    count: usize,
    alloc: A,
}

impl<A: SlotAllocator> LifoBuffer<A> {
    /// Allocates an empty stack of `capacity` slots from `alloc`
    pub fn new(mut alloc: A, capacity: usize) -> Result<Self, StackError> {
        let slots = alloc
            .alloc_slots(capacity)
            .ok_or(StackError::OutOfMemory)?;
        Ok(Self {
            slots,
            count: 0,
            alloc,
        })
    }

    /// Number of slots in the buffer
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    /// Number of live units
    pub fn len(&self) -> usize {
        self.count
    }
    /// True when no unit is stored
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
    /// True when every slot holds a unit
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Live units, oldest first
    pub fn as_slice(&self) -> &[Unit] {
        &self.slots[..self.count]
    }

    /// Length of the backing buffer, always equal to `capacity()`
    pub fn buffer_len(&self) -> usize {
        self.slots.len()
    }

    /// Stores `value` on top, or fails with `Full`
    pub fn push(&mut self, value: Unit) -> Result<(), StackError> {
        if self.is_full() {
            return Err(StackError::Full);
        }
        self.slots[self.count] = value;
        self.count += 1;
        Ok(())
    }

    /// Removes and returns the top unit, or fails with `Empty`
    pub fn pop(&mut self) -> Result<Unit, StackError> {
        if self.is_empty() {
            return Err(StackError::Empty);
        }
        self.count -= 1;
        Ok(self.slots[self.count])
    }

    /// Moves the live units into a buffer of `new_capacity` slots.
    ///
    /// When shrinking below `len()`, the newest units are dropped and the
    /// number dropped is returned. The new buffer is allocated before
    /// anything is dropped: on `OutOfMemory` the stack is untouched.
    pub fn resize(&mut self, new_capacity: usize) -> Result<usize, StackError> {
        let mut slots = self
            .alloc
            .alloc_slots(new_capacity)
            .ok_or(StackError::OutOfMemory)?;

        let keep = self.count.min(new_capacity);
        slots[..keep].copy_from_slice(&self.slots[..keep]);

        let discarded = self.count - keep;
        self.count = keep;
        self.slots = slots;
        Ok(discarded)
    }
}
