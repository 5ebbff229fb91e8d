//! Open-file view of a shared stack
//!
//! [`StackDevice`] behaves like a descriptor on a stack character
//! device: [`std::io::Write`] pushes, [`std::io::Read`] pops and
//! [`StackDevice::ioctl`] carries the control verb. Several devices may
//! share one stack, each call interleaving freely with the others.
//!
//! ```
//! use std::io::{Read, Write};
//! use stackdev::prelude::*;
//! use stackdev::control::RESIZE_IOCTL;
//!
//! let mut dev = StackDevice::new(SharedStack::new(10).unwrap());
//! dev.ioctl(RESIZE_IOCTL, 2).unwrap();
//!
//! // Three units offered, two accepted
//! let written = dev.write(&[1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]).unwrap();
//! assert_eq!(written, 8);
//!
//! let mut buf = [0u8; 8];
//! assert_eq!(dev.read(&mut buf).unwrap(), 8);
//! assert_eq!(buf, [2, 0, 0, 0, 1, 0, 0, 0]);
//! ```

use std::io;

use log::debug;

use crate::backend::heap::HeapAllocator;
use crate::control::ControlCommand;
use crate::shared::SharedStack;
use crate::utils::stream::{read_into, write_bytes};
use crate::{SlotAllocator, StackError};

/// A handle performing byte-stream reads/writes and control calls
pub struct StackDevice<A: SlotAllocator = HeapAllocator> {
    stack: SharedStack<A>,
}

impl<A: SlotAllocator> StackDevice<A> {
    /// Opens a device over `stack`
    pub fn new(stack: SharedStack<A>) -> Self {
        debug!("device opened");
        Self { stack }
    }

    /// The stack this device talks to
    pub fn stack(&self) -> &SharedStack<A> {
        &self.stack
    }

    /// Runs a numeric control command
    pub fn ioctl(&self, cmd: u32, arg: u64) -> Result<(), StackError> {
        debug!("ioctl cmd={cmd:#x} arg={arg}");
        ControlCommand::from_raw(cmd, arg)?.apply(&self.stack)
    }
}

impl<A: SlotAllocator> Clone for StackDevice<A> {
    fn clone(&self) -> Self {
        Self::new(self.stack.clone())
    }
}

impl<A: SlotAllocator> Drop for StackDevice<A> {
    fn drop(&mut self) {
        debug!("device closed");
    }
}

impl<A: SlotAllocator> io::Read for StackDevice<A> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(read_into(&self.stack, buf)?)
    }
}

impl<A: SlotAllocator> io::Write for StackDevice<A> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        debug!("write of {} bytes", buf.len());
        Ok(write_bytes(&self.stack, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
