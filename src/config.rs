use thiserror::Error;

use crate::backend::heap::HeapAllocator;
use crate::shared::SharedStack;
use crate::{DEFAULT_CAPACITY, StackError};

/// Environment variable holding the initial capacity
pub const CAPACITY_ENV: &str = "STACKDEV_CAPACITY";

/// Environment variable holding the largest capacity a resize may request
pub const MAX_CAPACITY_ENV: &str = "STACKDEV_MAX_CAPACITY";

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but is not an unsigned integer
    #[error("{key} must be an unsigned integer, got {value:?}")]
    InvalidNumber {
        /// Variable name
        key: &'static str,
        /// Raw value found
        value: String,
    },
    /// The initial capacity is above the configured maximum
    #[error("capacity {capacity} exceeds maximum capacity {max}")]
    CapacityAboveMax {
        /// Requested initial capacity
        capacity: usize,
        /// Configured maximum
        max: usize,
    },
}

/// Settings used to build a [`SharedStack`]
///
/// # Examples
///
/// ```
/// use stackdev::config::StackConfig;
///
/// let config = StackConfig::from_lookup(|key| match key {
///     "STACKDEV_CAPACITY" => Some("32".to_string()),
///     _ => None,
/// })
/// .unwrap();
/// assert_eq!(config.capacity, 32);
/// assert_eq!(config.max_capacity, None);
///
/// let stack = config.build().unwrap();
/// assert_eq!(stack.capacity(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackConfig {
    /// Capacity at construction
    pub capacity: usize,
    /// Upper bound for every buffer allocation, if any
    pub max_capacity: Option<usize>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_capacity: None,
        }
    }
}

impl StackConfig {
    /// Reads [`CAPACITY_ENV`] and [`MAX_CAPACITY_ENV`] from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            capacity: parse_number(&lookup, CAPACITY_ENV)?.unwrap_or(defaults.capacity),
            max_capacity: parse_number(&lookup, MAX_CAPACITY_ENV)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the initial capacity respects the maximum
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.max_capacity {
            Some(max) if self.capacity > max => Err(ConfigError::CapacityAboveMax {
                capacity: self.capacity,
                max,
            }),
            _ => Ok(()),
        }
    }

    /// Allocator enforcing `max_capacity`
    pub fn allocator(&self) -> HeapAllocator {
        match self.max_capacity {
            Some(max) => HeapAllocator::with_limit(max),
            None => HeapAllocator::new(),
        }
    }

    /// Builds a stack with these settings
    pub fn build(&self) -> Result<SharedStack, StackError> {
        SharedStack::with_allocator(self.allocator(), self.capacity)
    }
}

fn parse_number<F>(lookup: &F, key: &'static str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(None),
    }
}
