//! Utilities that are used across the `splitpage` subcommands.

pub mod display;
pub mod url;
