//! Integration test crate for Cutroom.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the cutroom crates to verify they work together.

#[cfg(test)]
mod engine;
