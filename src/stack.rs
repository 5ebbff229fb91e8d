//! # stackdev - A bounded, resizable LIFO of `i32` units
//!
//! stackdev keeps one contiguous buffer of signed 32-bit units behind a single
//! lock and exposes it the way a character device would:
//!
//! - **Stack engine** - push/pop/resize with a hard capacity
//! - **Byte-stream adapter** - raw bytes in, units pushed; units popped, raw bytes out
//! - **Control channel** - one `resize` verb that changes capacity at runtime
//! - **Shared handles** - cloneable handles, any number of independent stacks
//! - **Process-wide stack** - optional lazily-initialised global instance
//!
//! ## Quick Start
//!
//! ```rust
//! use stackdev::prelude::*;
//!
//! // A stack with room for 3 units
//! let stack = SharedStack::new(3).unwrap();
//!
//! // 16 bytes = 4 units, only 3 fit: short count
//! let mut bytes = Vec::new();
//! for value in [1i32, 2, 3, 4] {
//!     bytes.extend_from_slice(&value.to_le_bytes());
//! }
//! assert_eq!(write_bytes(&stack, &bytes).unwrap(), 12);
//!
//! // Reading pops newest first
//! let out = read_bytes(&stack, 16).unwrap();
//! assert_eq!(out.len(), 12);
//! assert_eq!(&out[..4], &3i32.to_le_bytes());
//! ```
//!
//! ## Features
//!
//! - `global-stack` (default) - Process-wide stack behind [`prelude::global_stack`]
//! - `cli` (default) - The `stackdev` binary (pipe transport on stdin/stdout)
//!
//! ## Architecture
//!
//! ### Core Traits
//!
//! The [`Stack`] trait is the engine interface every front end talks to:
//!
//! - `push()` / `pop()` - One unit at a time, each under its own lock acquisition
//! - `resize()` - Reallocate the buffer, dropping the newest units on shrink
//! - `len()` / `capacity()` - Query state
//!
//! The [`SlotAllocator`] trait supplies the unit buffers. The default
//! [`prelude::HeapAllocator`] reserves fallibly, so an impossible request
//! becomes [`StackError::OutOfMemory`] instead of an abort.
//!
//! ### Batches are not atomic
//!
//! A write of N units is N pushes. Another caller may push, pop or resize
//! between any two of them.
//!
//! ## Error Codes
//!
//! | Error | errno | Raised by |
//! |-------|-------|-----------|
//! | `Full` | `ENOBUFS` | push on a saturated stack |
//! | `Empty` | `ENOSPC` | pop on an empty stack |
//! | `OutOfMemory` | `ENOMEM` | buffer allocation failure |
//! | `InvalidArgument` | `EINVAL` | unknown control verb |
//!
//! Byte-stream calls only surface an error when not a single unit went
//! through; otherwise they return a short count.

#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/stackdev/0.1.0")]

use thiserror::Error;

// Internal modules - use prelude for public API
mod backend;
mod shared;
mod utils;

#[cfg(feature = "global-stack")]
mod global;

/// Runtime configuration for building stacks
pub mod config;

/// Out-of-band control verbs
pub mod control;

/// File-like handle over a shared stack
pub mod device;

/// Convenient re-exports for common use
///
/// ```
/// use stackdev::prelude::*;
/// ```
pub mod prelude;

/// The element type stored on the stack
pub type Unit = i32;

/// Width of one encoded unit in bytes
pub const UNIT_WIDTH: usize = core::mem::size_of::<Unit>();

/// Capacity used when nothing else is configured
pub const DEFAULT_CAPACITY: usize = 10;

/// Returns the version string of the stackdev crate
///
/// # Examples
///
/// ```
/// use stackdev::version;
/// assert_eq!(version(), "0.1.0");
/// ```
pub fn version() -> &'static str {
    "0.1.0"
}

const ENOMEM: i32 = 12;
const EINVAL: i32 = 22;
const ENOSPC: i32 = 28;
const ENOBUFS: i32 = 105;

/// Errors raised by the stack engine and its front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum StackError {
    /// Push on a stack holding `capacity` units
    #[error("stack is full")]
    Full,
    /// Pop on a stack holding no units
    #[error("stack is empty")]
    Empty,
    /// A unit buffer could not be allocated
    #[error("out of memory for stack buffer")]
    OutOfMemory,
    /// Unrecognised control verb
    #[error("invalid argument")]
    InvalidArgument,
}

impl StackError {
    /// Linux errno a character device reports for this error
    pub const fn errno(self) -> i32 {
        match self {
            StackError::Full => ENOBUFS,
            StackError::Empty => ENOSPC,
            StackError::OutOfMemory => ENOMEM,
            StackError::InvalidArgument => EINVAL,
        }
    }

    /// Negative status code reported at the endpoint boundary
    pub const fn status(self) -> i64 {
        -(self.errno() as i64)
    }

    /// Recovers a `StackError` carried inside an [`std::io::Error`]
    pub fn from_io(err: &std::io::Error) -> Option<Self> {
        err.get_ref()?.downcast_ref::<StackError>().copied()
    }
}

impl From<StackError> for std::io::Error {
    fn from(err: StackError) -> Self {
        let kind = match err {
            StackError::Full => std::io::ErrorKind::Other,
            StackError::Empty => std::io::ErrorKind::UnexpectedEof,
            StackError::OutOfMemory => std::io::ErrorKind::OutOfMemory,
            StackError::InvalidArgument => std::io::ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, err)
    }
}

/// Source of unit buffers for the stack engine
///
/// Every buffer handed out must hold exactly `len` slots. Returning `None`
/// is reported to callers as [`StackError::OutOfMemory`].
///
/// # Examples
///
/// ```
/// use stackdev::prelude::*;
///
/// let mut alloc = HeapAllocator::with_limit(8);
/// assert_eq!(alloc.alloc_slots(8).map(|s| s.len()), Some(8));
/// assert!(alloc.alloc_slots(9).is_none());
/// ```
pub trait SlotAllocator: Send {
    /// Allocates a zeroed buffer of `len` units
    fn alloc_slots(&mut self, len: usize) -> Option<Box<[Unit]>>;

    /// Largest buffer this allocator will hand out, if bounded
    fn max_slots(&self) -> Option<usize> {
        None
    }
}

/// Engine interface shared by every front end
///
/// Each call is one critical section. Nothing here groups several calls
/// into one atomic step.
pub trait Stack {
    /// Pushes `value`, failing with [`StackError::Full`] at capacity
    fn push(&self, value: Unit) -> Result<(), StackError>;

    /// Pops the most recently pushed unit, failing with [`StackError::Empty`]
    fn pop(&self) -> Result<Unit, StackError>;

    /// Reallocates to `new_capacity` slots
    ///
    /// Returns how many of the newest units were dropped to fit.
    fn resize(&self, new_capacity: usize) -> Result<usize, StackError>;

    /// Number of units currently stored
    fn len(&self) -> usize;

    /// Returns true if no units are stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current maximum number of units
    fn capacity(&self) -> usize;
}
