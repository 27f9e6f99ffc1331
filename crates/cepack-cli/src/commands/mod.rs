//! Command implementations.
//!
//! Each command module provides an `execute` function taking its parsed
//! arguments.

pub mod check;
pub mod config;

pub use check::execute as check_execute;
pub use config::execute as config_execute;
