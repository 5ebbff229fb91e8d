//! Lock-guarded handle over a [`LifoBuffer`]
//!
//! One `Mutex` covers the buffer, the count and the capacity together.
//! Every engine operation holds it for its whole body, so push, pop and
//! resize are mutually exclusive. Clones share the same stack.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};

use crate::backend::heap::HeapAllocator;
use crate::utils::lifo::LifoBuffer;
use crate::{SlotAllocator, Stack, StackError, Unit};

/// Cloneable, thread-safe handle to one bounded LIFO stack
///
/// # Examples
///
/// ```
/// use stackdev::prelude::*;
///
/// let stack = SharedStack::new(2).unwrap();
/// let other = stack.clone();
///
/// stack.push(1).unwrap();
/// other.push(2).unwrap();
/// assert_eq!(stack.push(3), Err(StackError::Full));
///
/// assert_eq!(other.pop(), Ok(2));
/// assert_eq!(stack.len(), 1);
/// ```
pub struct SharedStack<A: SlotAllocator = HeapAllocator> {
    inner: Arc<Mutex<LifoBuffer<A>>>,
}

impl<A: SlotAllocator> Clone for SharedStack<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedStack<HeapAllocator> {
    /// Creates a stack with `capacity` slots on the heap
    pub fn new(capacity: usize) -> Result<Self, StackError> {
        Self::with_allocator(HeapAllocator::new(), capacity)
    }
}

impl<A: SlotAllocator> SharedStack<A> {
    /// Creates a stack whose buffers come from `alloc`
    pub fn with_allocator(alloc: A, capacity: usize) -> Result<Self, StackError> {
        let buffer = LifoBuffer::new(alloc, capacity).inspect_err(|_| {
            warn!("failed to allocate initial stack of {capacity} slots");
        })?;
        info!("stack initialised with capacity {capacity}");
        Ok(Self {
            inner: Arc::new(Mutex::new(buffer)),
        })
    }

    // No engine operation panics while holding the guard, so the state
    // behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, LifoBuffer<A>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("stack lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Pushes `value`, failing with [`StackError::Full`] at capacity
    pub fn push(&self, value: Unit) -> Result<(), StackError> {
        debug!("pushing {value}");
        self.lock()
            .push(value)
            .inspect_err(|_| warn!("push of {value} rejected: stack is full"))
    }

    /// Pops the newest unit, failing with [`StackError::Empty`]
    pub fn pop(&self) -> Result<Unit, StackError> {
        let value = self
            .lock()
            .pop()
            .inspect_err(|_| warn!("pop rejected: stack is empty"))?;
        debug!("popped {value}");
        Ok(value)
    }

    /// Reallocates to `new_capacity` slots, dropping the newest units that
    /// no longer fit
    ///
    /// Returns the number of units dropped. On [`StackError::OutOfMemory`]
    /// nothing changes.
    pub fn resize(&self, new_capacity: usize) -> Result<usize, StackError> {
        let mut stack = self.lock();
        let old_capacity = stack.capacity();
        match stack.resize(new_capacity) {
            Ok(discarded) => {
                info!(
                    "stack resized from {old_capacity} to {new_capacity} slots, {discarded} units discarded"
                );
                Ok(discarded)
            }
            Err(err) => {
                warn!("failed to allocate {new_capacity} slots, keeping {old_capacity}");
                Err(err)
            }
        }
    }

    /// Number of units currently stored
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no units are stored
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns true if a push would fail
    pub fn is_full(&self) -> bool {
        self.lock().is_full()
    }

    /// Current maximum number of units
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Copy of the live units, oldest first
    pub fn snapshot(&self) -> Vec<Unit> {
        self.lock().as_slice().to_vec()
    }

    /// Runs `f` against the buffer while holding the stack lock
    ///
    /// Lets callers inspect several fields as one consistent view.
    pub fn with_locked<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&LifoBuffer<A>) -> R,
    {
        let guard = self.lock();
        f(&guard)
    }
}

impl<A: SlotAllocator> Stack for SharedStack<A> {
    fn push(&self, value: Unit) -> Result<(), StackError> {
        SharedStack::push(self, value)
    }

    fn pop(&self) -> Result<Unit, StackError> {
        SharedStack::pop(self)
    }

    fn resize(&self, new_capacity: usize) -> Result<usize, StackError> {
        SharedStack::resize(self, new_capacity)
    }

    fn len(&self) -> usize {
        SharedStack::len(self)
    }

    fn capacity(&self) -> usize {
        SharedStack::capacity(self)
    }
}

impl<A: SlotAllocator> core::fmt::Debug for SharedStack<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (len, capacity) = self.with_locked(|s| (s.len(), s.capacity()));
        f.debug_struct("SharedStack")
            .field("len", &len)
            .field("capacity", &capacity)
            .finish()
    }
}
