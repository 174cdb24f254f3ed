//! The in-process store backing both the command line tool and the tests.

use std::collections::HashMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use indexmap::IndexMap;

use crate::admin::ApiClient;
use crate::admin::User;
use crate::page::Page;
use crate::page::PageId;
use crate::redirect::Redirect;
use crate::store::snapshot::AssignmentRecord;
use crate::store::snapshot::Snapshot;
use crate::store::AssignmentStore;
use crate::store::ClientStore;
use crate::store::HitRecorder;
use crate::store::PageStore;
use crate::store::RedirectStore;
use crate::store::UserStore;
use crate::track::hit::Hit;

#[derive(Clone, Debug)]
struct Assignment {
    variant: PageId,
    expires_at: DateTime<Utc>,
}

/// An in-memory implementation of every storage capability.
///
/// Collections preserve insertion order so listings come out the way the
/// snapshot laid them out.
#[derive(Default)]
pub struct MemoryStore {
    pages: IndexMap<PageId, Page>,
    redirects: IndexMap<String, Redirect>,
    users: IndexMap<u64, User>,
    clients: IndexMap<u64, ApiClient>,
    hits: Vec<Hit>,
    assignments: HashMap<(String, PageId), Assignment>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Builds a store from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut store = MemoryStore::new();

        for page in snapshot.pages {
            store.pages.insert(page.id, page);
        }
        for redirect in snapshot.redirects {
            store.redirects.insert(redirect.token.clone(), redirect);
        }
        for user in snapshot.users {
            store.users.insert(user.id, user);
        }
        for client in snapshot.clients {
            store.clients.insert(client.id, client);
        }
        store.hits = snapshot.hits;
        for record in snapshot.assignments {
            store.assignments.insert(
                (record.visitor, record.group),
                Assignment {
                    variant: record.variant,
                    expires_at: record.expires_at,
                },
            );
        }

        store
    }

    /// Renders the store back into a snapshot for persistence.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            pages: self.pages.values().cloned().collect(),
            redirects: self.redirects.values().cloned().collect(),
            users: self.users.values().cloned().collect(),
            clients: self.clients.values().cloned().collect(),
            hits: self.hits.clone(),
            assignments: self
                .assignments
                .iter()
                .map(|((visitor, group), assignment)| AssignmentRecord {
                    visitor: visitor.clone(),
                    group: *group,
                    variant: assignment.variant,
                    expires_at: assignment.expires_at,
                })
                .collect(),
        }
    }

    /// Inserts or replaces a page.
    pub fn upsert_page(&mut self, page: Page) {
        self.pages.insert(page.id, page);
    }

    /// Inserts or replaces a redirect.
    pub fn upsert_redirect(&mut self, redirect: Redirect) {
        self.redirects.insert(redirect.token.clone(), redirect);
    }

    /// The recorded hits, oldest first.
    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    fn assignment_at(&self, visitor: &str, group: PageId, now: DateTime<Utc>) -> Option<PageId> {
        let assignment = self.assignments.get(&(visitor.to_string(), group))?;

        if assignment.expires_at <= now {
            return None;
        }

        Some(assignment.variant)
    }
}

impl PageStore for MemoryStore {
    fn page(&self, id: PageId) -> Option<Page> {
        self.pages.get(&id).cloned()
    }

    fn page_by_alias(&self, alias: &str) -> Option<Page> {
        self.pages.values().find(|p| p.alias == alias).cloned()
    }

    fn variant_children(&self, parent: PageId) -> Vec<Page> {
        self.pages
            .values()
            .filter(|p| p.variant_parent == Some(parent))
            .cloned()
            .collect()
    }

    fn translations(&self, parent: PageId) -> Vec<Page> {
        self.pages
            .values()
            .filter(|p| p.translation_parent == Some(parent))
            .cloned()
            .collect()
    }
}

impl HitRecorder for MemoryStore {
    fn record(&mut self, hit: Hit) {
        if hit.code == 200 {
            if let Some(page) = hit.page.and_then(|id| self.pages.get_mut(&id)) {
                page.variant_hits += 1;
            }
        }

        self.hits.push(hit);
    }
}

impl AssignmentStore for MemoryStore {
    fn assignment(&self, visitor: &str, group: PageId) -> Option<PageId> {
        self.assignment_at(visitor, group, Utc::now())
    }

    fn assign(&mut self, visitor: &str, group: PageId, variant: PageId, ttl: Duration) {
        self.assignments.insert(
            (visitor.to_string(), group),
            Assignment {
                variant,
                expires_at: Utc::now() + ttl,
            },
        );
    }
}

impl RedirectStore for MemoryStore {
    fn redirect_by_token(&self, token: &str) -> Option<Redirect> {
        self.redirects.get(token).cloned()
    }

    fn bump_redirect(&mut self, token: &str) {
        if let Some(redirect) = self.redirects.get_mut(token) {
            redirect.hits += 1;
        }
    }
}

impl UserStore for MemoryStore {
    fn user(&self, id: u64) -> Option<User> {
        self.users.get(&id).cloned()
    }

    fn user_by_login(&self, login: &str) -> Option<User> {
        self.users.values().find(|u| u.login == login).cloned()
    }

    fn save_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }
}

impl ClientStore for MemoryStore {
    fn clients(&self) -> Vec<ApiClient> {
        self.clients.values().cloned().collect()
    }

    fn save_client(&mut self, client: ApiClient) {
        self.clients.insert(client.id, client);
    }
}
