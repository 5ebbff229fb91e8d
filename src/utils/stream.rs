//! Byte-stream adapter between raw buffers and stack units
//!
//! Writes decode a byte buffer into units and push them one by one; reads
//! pop units one by one and encode them back into bytes.
//!
//! # Encoding
//!
//! - One unit is 4 bytes, little-endian
//! - A trailing 1-3 byte remainder on write is zero-extended into one more
//!   unit (the given bytes are the low-order bytes)
//! - A read only ever produces whole units; a requested length that is not
//!   a multiple of 4 is rounded down
//!
//! # Short Counts
//!
//! Both directions stop at the first engine error. If nothing went through
//! the error is returned; otherwise the byte count achieved so far is
//! returned and the error is dropped.
//!
//! ```
//! use stackdev::prelude::*;
//!
//! let stack = SharedStack::new(2).unwrap();
//!
//! // Three units offered, two fit
//! let bytes = [1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0];
//! assert_eq!(write_bytes(&stack, &bytes), Ok(8));
//!
//! // Nothing fits any more: now the error comes through
//! assert_eq!(write_bytes(&stack, &bytes), Err(StackError::Full));
//!
//! // A 3-byte remainder becomes one zero-padded unit
//! let stack = SharedStack::new(2).unwrap();
//! assert_eq!(write_bytes(&stack, &[0xDE, 0xAD, 0xDE]), Ok(3));
//! assert_eq!(read_bytes(&stack, 4), Ok(vec![0xDE, 0xAD, 0xDE, 0x00]));
//! ```

use nom::error::Error;
use nom::number::complete::le_i32;

use crate::{Stack, StackError, UNIT_WIDTH, Unit};

/// Iterator over the units encoded in a write buffer
///
/// Yields each unit together with the number of input bytes it covers.
pub struct Units<'a> {
    input: &'a [u8],
}

impl<'a> Units<'a> {
    /// Starts decoding `input`
    pub fn new(input: &'a [u8]) -> Self {
        Self { input }
    }
}

impl Iterator for Units<'_> {
    type Item = (Unit, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.input.is_empty() {
            return None;
        }

        match le_i32::<_, Error<&[u8]>>(self.input) {
            Ok((rest, value)) => {
                self.input = rest;
                Some((value, UNIT_WIDTH))
            }
            // Fewer than UNIT_WIDTH bytes left
            Err(_) => {
                let tail = core::mem::take(&mut self.input);
                Some((pad_unit(tail), tail.len()))
            }
        }
    }
}

fn pad_unit(tail: &[u8]) -> Unit {
    let mut raw = [0u8; UNIT_WIDTH];
    raw[..tail.len()].copy_from_slice(tail);
    Unit::from_le_bytes(raw)
}

/// Pushes every unit encoded in `bytes`, stopping at the first failure
///
/// Returns the number of input bytes that made it onto the stack.
pub fn write_bytes<S: Stack + ?Sized>(stack: &S, bytes: &[u8]) -> Result<usize, StackError> {
    let mut consumed = 0;
    for (value, width) in Units::new(bytes) {
        if let Err(err) = stack.push(value) {
            return if consumed == 0 { Err(err) } else { Ok(consumed) };
        }
        consumed += width;
    }
    Ok(consumed)
}

/// Pops up to `out.len() / 4` units into `out`, newest first
///
/// Returns the number of bytes written to the front of `out`.
pub fn read_into<S: Stack + ?Sized>(stack: &S, out: &mut [u8]) -> Result<usize, StackError> {
    let units = out.len() / UNIT_WIDTH;
    pop_units(stack, units, |index, raw| {
        out[index * UNIT_WIDTH..(index + 1) * UNIT_WIDTH].copy_from_slice(&raw);
    })
}

/// Pops up to `requested / 4` units and returns their encoding
pub fn read_bytes<S: Stack + ?Sized>(stack: &S, requested: usize) -> Result<Vec<u8>, StackError> {
    let mut out = Vec::new();
    pop_units(stack, requested / UNIT_WIDTH, |_, raw| {
        out.extend_from_slice(&raw);
    })?;
    Ok(out)
}

fn pop_units<S, F>(stack: &S, units: usize, mut emit: F) -> Result<usize, StackError>
where
    S: Stack + ?Sized,
    F: FnMut(usize, [u8; UNIT_WIDTH]),
{
    for index in 0..units {
        match stack.pop() {
            Ok(value) => emit(index, value.to_le_bytes()),
            Err(err) if index == 0 => return Err(err),
            Err(_) => return Ok(index * UNIT_WIDTH),
        }
    }
    Ok(units * UNIT_WIDTH)
}
