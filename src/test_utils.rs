//! Test doubles shared across module tests
//!
//! An in-memory backend and two controllable clocks.

#[cfg(test)]
pub use doubles::*;
