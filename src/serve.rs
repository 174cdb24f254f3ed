//! Serving a page request: publication checks, variant selection, sticky
//! assignments, translation redirects, and hit tracking.

pub mod command;
pub mod compute;
pub mod results;
