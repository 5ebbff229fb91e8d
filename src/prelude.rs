//! Prelude module for convenient imports
//!
//! ```
//! use stackdev::prelude::*;
//! ```

pub use crate::DEFAULT_CAPACITY;
pub use crate::SlotAllocator;
pub use crate::Stack;
pub use crate::StackError;
pub use crate::UNIT_WIDTH;
pub use crate::Unit;

pub use crate::backend::heap::HeapAllocator;

pub use crate::shared::SharedStack;
pub use crate::utils::lifo::LifoBuffer;
pub use crate::utils::stream::{Units, read_bytes, read_into, write_bytes};

pub use crate::config::{ConfigError, StackConfig};
pub use crate::control::{ControlCommand, resize_command};
pub use crate::device::StackDevice;

#[cfg(feature = "global-stack")]
pub use crate::global::{global_stack, init_global_stack, with_global_stack};
