//! Storage capabilities.
//!
//! Persistence is supplied to the rest of the crate as a set of narrow
//! traits, one per concern, so the serve flow, the selector, and the
//! maintenance operations never touch a concrete backend. [`memory`]
//! provides the in-process implementation of all of them, and [`snapshot`]
//! is the JSON file format the command line tool loads and persists.

use chrono::Duration;

use crate::admin::ApiClient;
use crate::admin::User;
use crate::page::Page;
use crate::page::PageId;
use crate::redirect::Redirect;
use crate::track::hit::Hit;

pub mod memory;
pub mod snapshot;

/// How long a visitor stays bound to the variant first shown to them.
pub const ASSIGNMENT_TTL_DAYS: i64 = 14;

/// The sticky-assignment retention window as a duration.
pub fn assignment_ttl() -> Duration {
    Duration::days(ASSIGNMENT_TTL_DAYS)
}

/// The conventional cookie name a transport should carry a group's
/// assignment under.
pub fn assignment_cookie_name(group: PageId) -> String {
    format!("splitpage_page_{}", group)
}

/// Read access to pages and their relationships.
///
/// Implementations hand out owned value snapshots; callers never hold live
/// references into the store.
pub trait PageStore {
    /// Fetches a page by id.
    fn page(&self, id: PageId) -> Option<Page>;

    /// Fetches a page by its URL alias.
    fn page_by_alias(&self, alias: &str) -> Option<Page>;

    /// All child variants of the given parent, published or not.
    fn variant_children(&self, parent: PageId) -> Vec<Page>;

    /// All translations of the given page, published or not.
    fn translations(&self, parent: PageId) -> Vec<Page>;
}

/// Append access for visit tracking.
pub trait HitRecorder {
    /// Records a hit. A 200-coded hit against a page also bumps that page's
    /// variant hit counter.
    fn record(&mut self, hit: Hit);
}

/// Sticky visitor-to-variant assignments.
pub trait AssignmentStore {
    /// The variant previously assigned to the visitor for the given group,
    /// if the assignment has not expired.
    fn assignment(&self, visitor: &str, group: PageId) -> Option<PageId>;

    /// Binds the visitor to a variant for the given retention window.
    fn assign(&mut self, visitor: &str, group: PageId, variant: PageId, ttl: Duration);
}

/// Read and bump access to tracked redirect links.
pub trait RedirectStore {
    /// Fetches a redirect by its tracking token.
    fn redirect_by_token(&self, token: &str) -> Option<Redirect>;

    /// Increments the click counter of a redirect.
    fn bump_redirect(&mut self, token: &str);
}

/// Read and write access to user accounts.
pub trait UserStore {
    /// Fetches a user by id.
    fn user(&self, id: u64) -> Option<User>;

    /// Fetches a user by login name.
    fn user_by_login(&self, login: &str) -> Option<User>;

    /// Saves a user record, replacing any record with the same id.
    fn save_user(&mut self, user: User);
}

/// Read and write access to API client credentials.
pub trait ClientStore {
    /// All stored API clients.
    fn clients(&self) -> Vec<ApiClient>;

    /// Saves a client record, replacing any record with the same id.
    fn save_client(&mut self, client: ApiClient);
}
