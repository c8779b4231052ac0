//! Shared internal utilities for the kestrel workspace
//!
//! This crate holds the byte/word toolkit the cipher kernels are built on:
//! endian-exact loads and stores, segmented counter arithmetic, and
//! constant-time primitives. Nothing here allocates and nothing here is
//! fallible; contract violations are programming bugs and panic.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod constant_time;
pub mod counter;
pub mod endian;
