//! Landing pages and the relationships between them.
//!
//! A [`Page`] is the unit everything else in this crate operates on: variant
//! (A/B test) children hang off a parent page, translations hang off a
//! translation parent, and unpublished pages may carry a redirect fallback.
//! Pages are plain value snapshots: stores hand out owned copies, and all
//! mutation goes back through a store as an explicit command.

use chrono::DateTime;
use chrono::Utc;
use core::fmt;
use serde::Deserialize;
use serde::Serialize;

pub mod translation;
pub mod variant;

/// Identifier for a [`Page`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PageId {
    fn from(id: u64) -> Self {
        PageId(id)
    }
}

/// A landing page record.
///
/// The variant fields are only meaningful in combination: a page with a
/// `variant_parent` is a child variant and its `variant_weight` is the
/// configured share of traffic (percent, 0–100) it should receive. The
/// parent implicitly receives whatever the children leave over. Hit counts
/// are monotonically non-decreasing for the life of a page.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Page {
    /// Identifier of this page.
    pub id: PageId,

    /// Human-readable title.
    pub title: String,

    /// URL alias (slug) this page is served under.
    pub alias: String,

    /// Raw HTML content of the page.
    #[serde(default)]
    pub custom_html: Option<String>,

    /// Publication flag. A page that is not published is never shown to
    /// visitors, though it may carry a redirect fallback.
    pub is_published: bool,

    /// Do not publish before this instant.
    #[serde(default)]
    pub publish_up: Option<DateTime<Utc>>,

    /// Do not publish after this instant.
    #[serde(default)]
    pub publish_down: Option<DateTime<Utc>>,

    /// Language tag for translated pages (e.g. `en_US`).
    #[serde(default)]
    pub language: Option<String>,

    /// Parent page when this page is an A/B test child variant.
    #[serde(default)]
    pub variant_parent: Option<PageId>,

    /// Configured traffic share for a child variant, in percent (0–100).
    #[serde(default)]
    pub variant_weight: u8,

    /// Observed variant hit count.
    #[serde(default)]
    pub variant_hits: u64,

    /// Parent page when this page is a translation of another.
    #[serde(default)]
    pub translation_parent: Option<PageId>,

    /// HTTP status code to redirect with when the page is unpublished.
    #[serde(default)]
    pub redirect_type: Option<u16>,

    /// Destination to redirect to when the page is unpublished.
    #[serde(default)]
    pub redirect_url: Option<String>,

    /// Ask crawlers not to index this page.
    #[serde(default)]
    pub no_index: bool,

    /// Preference center pages are never served or tracked publicly.
    #[serde(default)]
    pub preference_center: bool,
}

impl Page {
    /// Creates a published page with the given identity and no variant,
    /// translation, or redirect wiring.
    pub fn new<I>(id: I, title: &str, alias: &str) -> Self
    where
        I: Into<PageId>,
    {
        Page {
            id: id.into(),
            title: title.to_string(),
            alias: alias.to_string(),
            is_published: true,
            ..Default::default()
        }
    }

    /// Whether the page is published at the given instant, taking the
    /// publish-up/publish-down window into account.
    pub fn published_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_published {
            return false;
        }

        if let Some(up) = self.publish_up {
            if now < up {
                return false;
            }
        }

        if let Some(down) = self.publish_down {
            if now >= down {
                return false;
            }
        }

        true
    }

    /// Whether the page is published right now.
    pub fn is_published_now(&self) -> bool {
        self.published_at(Utc::now())
    }

    /// The canonical path this page should be served under.
    pub fn canonical_path(&self) -> String {
        format!("/{}", self.alias)
    }

    /// Whether this page is a child variant of another page.
    pub fn is_variant_child(&self) -> bool {
        self.variant_parent.is_some()
    }

    /// Whether this page is a translation of another page.
    pub fn is_translation(&self) -> bool {
        self.translation_parent.is_some()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_publication_window() {
        let mut page = Page::new(1, "Landing", "landing");
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert!(page.published_at(now));

        page.publish_up = Some(Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap());
        assert!(!page.published_at(now));

        page.publish_up = Some(Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap());
        page.publish_down = Some(Utc.with_ymd_and_hms(2026, 2, 15, 0, 0, 0).unwrap());
        assert!(!page.published_at(now));

        page.publish_down = Some(Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
        assert!(page.published_at(now));

        page.is_published = false;
        assert!(!page.published_at(now));
    }

    #[test]
    fn test_canonical_path() {
        let page = Page::new(7, "Landing", "spring-offer");
        assert_eq!(page.canonical_path(), "/spring-offer");
    }
}
