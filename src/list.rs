//! Listing the contents of a store file.

pub mod command;
