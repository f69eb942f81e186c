//! bx CLI library
//!
//! Exposes the command, exit code and rendering layers for integration tests.

pub mod commands;
pub mod exit_code;
pub mod output;
