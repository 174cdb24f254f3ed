//! The hit record persisted for every tracked page view or redirect click.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::page::PageId;

/// A recorded page view.
///
/// Hits are append-only: counters derived from them only ever grow, and a
/// lost increment under concurrent writers is acceptable; nothing in this
/// crate claims exactly-once accounting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hit {
    /// The page the hit was recorded against, when one could be resolved.
    #[serde(default)]
    pub page: Option<PageId>,

    /// The response code the visitor received (200, 301, 302, 401, 404).
    pub code: u16,

    /// The visitor key the hit belongs to.
    #[serde(default)]
    pub visitor: Option<String>,

    /// The contact attributed via a clickthrough token, if any.
    #[serde(default)]
    pub contact: Option<u64>,

    /// The URL the visitor was sent to or served from.
    #[serde(default)]
    pub url: Option<String>,

    /// When the hit was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl Hit {
    /// Creates a hit recorded now.
    pub fn new(page: Option<PageId>, code: u16) -> Self {
        Hit {
            page,
            code,
            visitor: None,
            contact: None,
            url: None,
            recorded_at: Utc::now(),
        }
    }

    /// Attaches the visitor key.
    pub fn with_visitor<V>(mut self, visitor: V) -> Self
    where
        V: Into<String>,
    {
        self.visitor = Some(visitor.into());
        self
    }

    /// Attaches an attributed contact, if one was resolved.
    pub fn with_contact(mut self, contact: Option<u64>) -> Self {
        self.contact = contact;
        self
    }

    /// Attaches the URL involved in the hit.
    pub fn with_url<U>(mut self, url: U) -> Self
    where
        U: Into<String>,
    {
        self.url = Some(url.into());
        self
    }
}
