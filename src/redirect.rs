//! Tracked redirect links and their resolution.

use serde::Deserialize;
use serde::Serialize;

pub mod command;
pub mod compute;

/// A tracked redirect link.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Redirect {
    /// Identifier of the redirect record.
    pub id: u64,

    /// The opaque tracking token the link is addressed by.
    pub token: String,

    /// The destination URL, possibly containing `{contactfield=...}` tokens.
    pub url: String,

    /// Unpublished redirects resolve as not found.
    pub is_published: bool,

    /// Number of recorded clicks.
    #[serde(default)]
    pub hits: u64,
}
