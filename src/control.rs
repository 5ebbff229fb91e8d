//! Control channel for the stack
//!
//! A single administrative verb, `resize`, reaches the engine without going
//! through the byte-stream adapter. It arrives either as the numeric
//! command a character device accepts through `ioctl`, or as a text line.
//!
//! ```
//! use stackdev::control::{ControlCommand, RESIZE_IOCTL};
//! use stackdev::StackError;
//!
//! assert_eq!(ControlCommand::parse("resize 16"), Ok(ControlCommand::Resize(16)));
//! assert_eq!(ControlCommand::from_raw(RESIZE_IOCTL, 4), Ok(ControlCommand::Resize(4)));
//! assert_eq!(ControlCommand::parse("shrink 4"), Err(StackError::InvalidArgument));
//! ```

use log::{info, warn};
use nom::bytes::complete::tag;
use nom::character::complete::{space0, space1, u64 as decimal};
use nom::combinator::all_consuming;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};

use crate::{Stack, StackError};

const IOC_WRITE: u32 = 1;
const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = 8;
const IOC_SIZESHIFT: u32 = 16;
const IOC_DIRSHIFT: u32 = 30;

const fn iow(ty: u8, nr: u8, size: u32) -> u32 {
    (IOC_WRITE << IOC_DIRSHIFT)
        | (size << IOC_SIZESHIFT)
        | ((ty as u32) << IOC_TYPESHIFT)
        | ((nr as u32) << IOC_NRSHIFT)
}

/// `_IOW('a', 1, int32_t *)` on a 64-bit host
pub const RESIZE_IOCTL: u32 = iow(b'a', 1, 8);

/// Text verb for a resize
pub const RESIZE_VERB: &str = "resize";

/// A decoded control request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Change the stack capacity to the given number of units
    Resize(usize),
}

impl ControlCommand {
    /// Decodes a numeric command and its argument
    pub fn from_raw(cmd: u32, arg: u64) -> Result<Self, StackError> {
        if cmd != RESIZE_IOCTL {
            warn!("unknown control command {cmd:#x}");
            return Err(StackError::InvalidArgument);
        }
        // A capacity that does not fit in usize can never be allocated
        let capacity = usize::try_from(arg).map_err(|_| StackError::OutOfMemory)?;
        Ok(Self::Resize(capacity))
    }

    /// Parses a text command such as `resize 16`
    pub fn parse(line: &str) -> Result<Self, StackError> {
        match resize_line(line) {
            Ok((_, capacity)) => {
                let capacity = usize::try_from(capacity).map_err(|_| StackError::OutOfMemory)?;
                Ok(Self::Resize(capacity))
            }
            Err(_) => {
                warn!("unknown control command {line:?}");
                Err(StackError::InvalidArgument)
            }
        }
    }

    /// Runs the command against `stack`
    pub fn apply<S: Stack + ?Sized>(self, stack: &S) -> Result<(), StackError> {
        match self {
            Self::Resize(capacity) => {
                info!("control: resize to {capacity}");
                stack.resize(capacity).map(|_| ())
            }
        }
    }

    /// Runs the command and returns the endpoint status: 0 or a negative errno
    pub fn dispatch<S: Stack + ?Sized>(self, stack: &S) -> i64 {
        match self.apply(stack) {
            Ok(()) => 0,
            Err(err) => err.status(),
        }
    }
}

fn resize_line(input: &str) -> IResult<&str, u64> {
    all_consuming(delimited(
        space0,
        preceded(tag(RESIZE_VERB), preceded(space1, decimal)),
        space0,
    ))
    .parse(input)
}

/// Forwards `new_capacity` to the stack's resize
pub fn resize_command<S: Stack + ?Sized>(stack: &S, new_capacity: usize) -> Result<(), StackError> {
    ControlCommand::Resize(new_capacity).apply(stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::heap::HeapAllocator;
    use crate::shared::SharedStack;

    #[test]
    fn test_resize_ioctl_number() {
        assert_eq!(RESIZE_IOCTL, 0x4008_6101);
    }

    #[test]
    fn test_from_raw_resize() {
        assert_eq!(
            ControlCommand::from_raw(RESIZE_IOCTL, 2),
            Ok(ControlCommand::Resize(2))
        );
    }

    #[test]
    fn test_from_raw_unknown() {
        assert_eq!(
            ControlCommand::from_raw(0x4008_6102, 2),
            Err(StackError::InvalidArgument)
        );
        assert_eq!(ControlCommand::from_raw(0, 0), Err(StackError::InvalidArgument));
    }

    #[test]
    fn test_parse_resize() {
        assert_eq!(ControlCommand::parse("resize 7"), Ok(ControlCommand::Resize(7)));
        assert_eq!(
            ControlCommand::parse("  resize   0  "),
            Ok(ControlCommand::Resize(0))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for line in ["", "resize", "resize -1", "resize 3 4", "resize3", "grow 3", "RESIZE 3"] {
            assert_eq!(
                ControlCommand::parse(line),
                Err(StackError::InvalidArgument),
                "{line:?}"
            );
        }
    }

    #[test]
    fn test_apply_resize() {
        let stack = SharedStack::new(10).unwrap();
        for i in 0..8 {
            stack.push(i).unwrap();
        }

        assert_eq!(ControlCommand::Resize(7).apply(&stack), Ok(()));
        assert_eq!(stack.capacity(), 7);
        assert_eq!(stack.len(), 7);
    }

    #[test]
    fn test_dispatch_status() {
        let stack = SharedStack::with_allocator(HeapAllocator::with_limit(16), 4).unwrap();

        assert_eq!(ControlCommand::Resize(16).dispatch(&stack), 0);
        assert_eq!(ControlCommand::Resize(17).dispatch(&stack), -12);
        assert_eq!(stack.capacity(), 16);
    }

    #[test]
    fn test_resize_command() {
        let stack = SharedStack::new(2).unwrap();
        assert_eq!(resize_command(&stack, 5), Ok(()));
        assert_eq!(stack.capacity(), 5);
        assert_eq!(resize_command(&stack, usize::MAX), Err(StackError::OutOfMemory));
        assert_eq!(stack.capacity(), 5);
    }
}
