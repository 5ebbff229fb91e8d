//! Device Usage Example
//!
//! Writes a batch of units through a `StackDevice`, reads them back newest
//! first and resizes the stack through the control command.

use std::io::{Read, Write};

use stackdev::control::RESIZE_IOCTL;
use stackdev::prelude::*;

fn main() -> std::io::Result<()> {
    println!("=== StackDevice Usage ===\n");

    let stack = SharedStack::new(3).map_err(std::io::Error::from)?;
    let mut dev = StackDevice::new(stack);

    // Four units offered, three fit: a short count, not an error
    let bytes: Vec<u8> = [1i32, 2, 3, 4].iter().flat_map(|n| n.to_le_bytes()).collect();
    let written = dev.write(&bytes)?;
    println!("Wrote {written} of {} bytes", bytes.len());

    let mut buf = [0u8; 16];
    let read = dev.read(&mut buf)?;
    let units: Vec<i32> = buf[..read]
        .chunks_exact(UNIT_WIDTH)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    println!("Read {read} bytes: {units:?}");

    // Empty stack: the error comes through as an io::Error
    match dev.read(&mut buf) {
        Ok(n) => println!("Unexpected read of {n} bytes"),
        Err(err) => println!(
            "Read on empty stack failed: {err} (errno {:?})",
            StackError::from_io(&err).map(StackError::errno)
        ),
    }

    dev.ioctl(RESIZE_IOCTL, 8).map_err(std::io::Error::from)?;
    println!("\nResized to {} slots", dev.stack().capacity());

    let status = ControlCommand::Resize(2).dispatch(dev.stack());
    println!("Resize to 2 via dispatch: status {status}");

    let status = ControlCommand::from_raw(0x1234, 0)
        .map(|cmd| cmd.dispatch(dev.stack()))
        .unwrap_or_else(StackError::status);
    println!("Unknown command: status {status}");

    Ok(())
}
