//! Process-wide stack
//!
//! Most code should build its own [`SharedStack`] and pass it around. This
//! module exists for front ends that need one stack for the whole process,
//! the way a kernel driver keeps a single static instance.
//!
//! ## Automatic Default Initialization
//!
//! The first call to [`global_stack`] builds the stack from
//! [`StackConfig::default`] (capacity 10) unless [`init_global_stack`] ran
//! earlier. Initialisation happens once; later configurations are ignored.
//!
//! The automatic path does not read the environment: `STACKDEV_CAPACITY`
//! and `STACKDEV_MAX_CAPACITY` only take effect when the caller passes
//! [`StackConfig::from_env`] to [`init_global_stack`] before first use.
//!
//! ```rust
//! use stackdev::prelude::*;
//!
//! let config = StackConfig::from_lookup(|key| match key {
//!     "STACKDEV_CAPACITY" => Some("4".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//! let stack = init_global_stack(&config).unwrap();
//! assert_eq!(global_stack().unwrap().capacity(), stack.capacity());
//! ```
//!
//! ```rust
//! use stackdev::prelude::*;
//!
//! let stack = global_stack().unwrap();
//! assert!(stack.capacity() > 0);
//! ```

use log::info;
use once_cell::sync::OnceCell;

use crate::StackError;
use crate::config::StackConfig;
use crate::shared::SharedStack;

static GLOBAL: OnceCell<SharedStack> = OnceCell::new();

/// Builds the process-wide stack from `config` if it does not exist yet
///
/// Returns the process-wide stack, which may have been built earlier with a
/// different configuration.
pub fn init_global_stack(config: &StackConfig) -> Result<&'static SharedStack, StackError> {
    GLOBAL.get_or_try_init(|| {
        info!("initialising process-wide stack");
        config.build()
    })
}

/// Returns the process-wide stack, building it with defaults on first use
pub fn global_stack() -> Result<&'static SharedStack, StackError> {
    init_global_stack(&StackConfig::default())
}

/// Runs `f` with the process-wide stack
#[inline]
pub fn with_global_stack<F, R>(f: F) -> Result<R, StackError>
where
    F: FnOnce(&SharedStack) -> R,
{
    global_stack().map(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::stream::{read_bytes, write_bytes};
    use serial_test::serial;

    fn reset() {
        let stack = global_stack().unwrap();
        while stack.pop().is_ok() {}
        stack.resize(crate::DEFAULT_CAPACITY).unwrap();
    }

    #[test]
    #[serial]
    fn test_global_is_shared() {
        reset();
        let a = global_stack().unwrap();
        let b = global_stack().unwrap();

        a.push(11).unwrap();
        assert_eq!(b.pop(), Ok(11));
        assert!(core::ptr::eq(a, b));
    }

    #[test]
    #[serial]
    fn test_global_init_once() {
        reset();
        let config = StackConfig {
            capacity: 3,
            max_capacity: None,
        };
        let stack = init_global_stack(&config).unwrap();
        assert_eq!(stack.capacity(), crate::DEFAULT_CAPACITY);
    }

    #[test]
    #[serial]
    fn test_global_stream_round_trip() {
        reset();
        let bytes: Vec<u8> = [1i32, 2].iter().flat_map(|v| v.to_le_bytes()).collect();

        let written = with_global_stack(|s| write_bytes(s, &bytes)).unwrap();
        assert_eq!(written, Ok(8));

        let out = with_global_stack(|s| read_bytes(s, 8)).unwrap().unwrap();
        assert_eq!(out, [2i32.to_le_bytes(), 1i32.to_le_bytes()].concat());
    }
}
