//! Results related to handling a page request.

use serde::Deserialize;
use serde::Serialize;

use crate::page::PageId;

/// What the caller should do with a handled page request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Serve the resolved page's content.
    Render {
        /// The page that was actually shown (the selected variant, not
        /// necessarily the page the slug pointed at).
        page: PageId,

        /// The content to serve, analytics and robots directives spliced in.
        content: String,
    },

    /// Send the visitor elsewhere.
    Redirect {
        /// The destination URL.
        url: String,

        /// The redirect status code (301 or 302).
        code: u16,
    },

    /// No servable page matched the request.
    NotFound,

    /// The page exists but is not published and has no redirect fallback.
    AccessDenied,
}
