//! Slot allocator backend implementations
//!
//! This module contains concrete allocators for the stack's unit buffer.

/// Heap allocator with fallible reservation
pub mod heap;

#[cfg(test)]
pub mod naive;
