//! # COINS Validator CLI Library
//!
//! Command-line access to the validation profile registry: list the
//! registered profiles, show one, or check a profile file before shipping it.

pub mod commands;

pub use commands::*;
