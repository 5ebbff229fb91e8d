//! Data structures behind the shared stack
//!
//! Provides the unsynchronised LIFO buffer and the byte-stream adapter.

pub mod lifo;

pub mod stream;
