//! Module holding the logic for handling a public page request.
//!
//! The flow mirrors what a landing-page front controller does, minus the
//! transport: resolve the slug, honor publication state, canonicalize the
//! URL, run variant selection with sticky assignments, offer a translation
//! redirect, and finally render, recording a hit at every exit.

use tracing::debug;
use tracing::warn;

use crate::page::translation;
use crate::page::variant::VariantGroup;
use crate::page::Page;
use crate::page::PageId;
use crate::select;
use crate::serve::results::Outcome;
use crate::store::assignment_ttl;
use crate::store::AssignmentStore;
use crate::store::HitRecorder;
use crate::store::PageStore;
use crate::track::hit::Hit;
use crate::track::token;

/// A page request, decoupled from any transport.
#[derive(Clone, Debug, Default)]
pub struct PageRequest {
    /// The slug the visitor asked for.
    pub slug: String,

    /// The anonymous visitor key (what a cookie would carry).
    pub visitor: String,

    /// The path the request arrived on, for canonical-URL enforcement.
    pub path: Option<String>,

    /// The visitor's preferred locale, if known.
    pub locale: Option<String>,

    /// A clickthrough token for contact attribution, if present.
    pub clickthrough: Option<String>,

    /// Suppress the translation redirect (the visitor explicitly asked for
    /// this language version).
    pub no_translation_redirect: bool,

    /// Skip canonical-path enforcement.
    pub ignore_path_mismatch: bool,

    /// An analytics snippet to splice in before `</head>`.
    pub analytics: Option<String>,
}

/// Handles page requests against a store.
pub struct PageServer<S> {
    store: S,
}

impl<S> PageServer<S>
where
    S: PageStore + HitRecorder + AssignmentStore,
{
    /// Creates a server over the given store.
    pub fn new(store: S) -> Self {
        PageServer { store }
    }

    /// Consumes the server, handing the store back for persistence.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Handles one page request.
    ///
    /// Every exit records a hit with the status code the visitor effectively
    /// received. A malformed clickthrough token only drops attribution; the
    /// primary response always completes.
    pub fn handle(&mut self, request: &PageRequest) -> Outcome {
        let contact = resolve_contact(request);

        let Some(page) = self.store.page_by_alias(&request.slug) else {
            self.hit(None, 404, request, contact);
            return Outcome::NotFound;
        };

        if page.preference_center {
            self.hit(Some(page.id), 404, request, contact);
            return Outcome::NotFound;
        }

        if !page.is_published_now() {
            if let (Some(code), Some(url)) = (page.redirect_type, page.redirect_url.clone()) {
                self.hit(Some(page.id), code, request, contact);
                return Outcome::Redirect { url, code };
            }

            self.hit(Some(page.id), 401, request, contact);
            return Outcome::AccessDenied;
        }

        if !request.ignore_path_mismatch {
            if let Some(path) = &request.path {
                let canonical = page.canonical_path();
                if *path != canonical {
                    self.hit(Some(page.id), 301, request, contact);
                    return Outcome::Redirect {
                        url: canonical,
                        code: 301,
                    };
                }
            }
        }

        // A child variant reached directly is always served under its
        // parent's URL.
        if let Some(parent_id) = page.variant_parent {
            if let Some(parent) = self.store.page(parent_id) {
                self.hit(Some(page.id), 301, request, contact);
                return Outcome::Redirect {
                    url: parent.canonical_path(),
                    code: 301,
                };
            }
        }

        let shown = self.pick_variant(&page, request);

        if !request.no_translation_redirect {
            if let Some(locale) = &request.locale {
                if let Some(target) = self.pick_translation(&shown, locale) {
                    self.hit(Some(shown.id), 302, request, contact);
                    return Outcome::Redirect {
                        url: target.canonical_path(),
                        code: 302,
                    };
                }
            }
        }

        let content = render_content(&shown, request.analytics.as_deref());
        self.hit(Some(shown.id), 200, request, contact);

        Outcome::Render {
            page: shown.id,
            content,
        }
    }

    fn pick_variant(&mut self, page: &Page, request: &PageRequest) -> Page {
        let children = self.store.variant_children(page.id);

        let mut translations = self.store.translations(page.id);
        for child in &children {
            translations.extend(self.store.translations(child.id));
        }

        let group = VariantGroup::assemble(page, &children, &translations);
        if !group.has_children() {
            return page.clone();
        }

        let prior = self.store.assignment(&request.visitor, page.id);
        let selection = select::compute::select(&group, prior);

        debug!(
            "Visitor '{}' resolved to variant {} for page {} (sticky: {}).",
            request.visitor, selection.chosen, page.id, selection.sticky
        );

        if !selection.sticky {
            self.store.assign(
                &request.visitor,
                page.id,
                selection.chosen,
                assignment_ttl(),
            );
        }

        if selection.chosen == page.id {
            return page.clone();
        }

        match self.store.page(selection.chosen) {
            Some(variant) => variant,
            None => page.clone(),
        }
    }

    fn pick_translation(&self, shown: &Page, locale: &str) -> Option<Page> {
        let group_parent = shown.translation_parent.unwrap_or(shown.id);

        let mut members = Vec::new();
        if let Some(parent) = self.store.page(group_parent) {
            members.push(parent);
        }
        members.extend(self.store.translations(group_parent));

        let target = translation::resolve(shown, &members, locale)?;
        members.into_iter().find(|m| m.id == target)
    }

    fn hit(&mut self, page: Option<PageId>, code: u16, request: &PageRequest, contact: Option<u64>) {
        self.store.record(
            Hit::new(page, code)
                .with_visitor(request.visitor.clone())
                .with_contact(contact),
        );
    }
}

fn resolve_contact(request: &PageRequest) -> Option<u64> {
    let raw = request.clickthrough.as_deref()?;

    match token::decode(raw) {
        Ok(clickthrough) => clickthrough.contact,
        Err(e) => {
            warn!("Invalid clickthrough value '{}': {}", raw, e);
            None
        }
    }
}

fn render_content(page: &Page, analytics: Option<&str>) -> String {
    let mut content = page.custom_html.clone().unwrap_or_default();

    if let Some(snippet) = analytics {
        content = content.replace("</head>", &format!("{}\n</head>", snippet));
    }

    if page.no_index {
        content = content.replace(
            "</head>",
            "<meta name=\"robots\" content=\"noindex\">\n</head>",
        );
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::track::token::Clickthrough;

    fn request(slug: &str, visitor: &str) -> PageRequest {
        PageRequest {
            slug: slug.to_string(),
            visitor: visitor.to_string(),
            ..Default::default()
        }
    }

    fn page_with_html(id: u64, alias: &str, html: &str) -> Page {
        let mut page = Page::new(id, "Landing", alias);
        page.custom_html = Some(html.to_string());
        page
    }

    fn child(id: u64, parent: u64, alias: &str, weight: u8) -> Page {
        let mut page = Page::new(id, "Variant", alias);
        page.variant_parent = Some(PageId(parent));
        page.variant_weight = weight;
        page
    }

    #[test]
    fn test_unknown_slug_is_not_found_and_recorded() {
        let mut server = PageServer::new(MemoryStore::new());

        let outcome = server.handle(&request("missing", "v1"));

        assert_eq!(outcome, Outcome::NotFound);
        let store = server.into_store();
        assert_eq!(store.hits().len(), 1);
        assert_eq!(store.hits()[0].code, 404);
        assert_eq!(store.hits()[0].page, None);
    }

    #[test]
    fn test_preference_center_pages_are_never_served() {
        let mut store = MemoryStore::new();
        let mut page = Page::new(1, "Prefs", "prefs");
        page.preference_center = true;
        store.upsert_page(page);
        let mut server = PageServer::new(store);

        assert_eq!(server.handle(&request("prefs", "v1")), Outcome::NotFound);
    }

    #[test]
    fn test_unpublished_page_with_redirect_fallback() {
        let mut store = MemoryStore::new();
        let mut page = Page::new(1, "Old", "old");
        page.is_published = false;
        page.redirect_type = Some(301);
        page.redirect_url = Some("https://example.com/new".to_string());
        store.upsert_page(page);
        let mut server = PageServer::new(store);

        let outcome = server.handle(&request("old", "v1"));

        assert_eq!(
            outcome,
            Outcome::Redirect {
                url: "https://example.com/new".to_string(),
                code: 301
            }
        );
    }

    #[test]
    fn test_unpublished_page_without_fallback_is_denied() {
        let mut store = MemoryStore::new();
        let mut page = Page::new(1, "Old", "old");
        page.is_published = false;
        store.upsert_page(page);
        let mut server = PageServer::new(store);

        let outcome = server.handle(&request("old", "v1"));

        assert_eq!(outcome, Outcome::AccessDenied);
        let store = server.into_store();
        assert_eq!(store.hits()[0].code, 401);
    }

    #[test]
    fn test_path_mismatch_redirects_to_canonical() {
        let mut store = MemoryStore::new();
        store.upsert_page(Page::new(1, "Landing", "landing"));
        let mut server = PageServer::new(store);

        let mut req = request("landing", "v1");
        req.path = Some("/landing-old".to_string());

        let outcome = server.handle(&req);

        assert_eq!(
            outcome,
            Outcome::Redirect {
                url: "/landing".to_string(),
                code: 301
            }
        );
    }

    #[test]
    fn test_child_variant_redirects_to_parent() {
        let mut store = MemoryStore::new();
        store.upsert_page(Page::new(1, "Landing", "landing"));
        store.upsert_page(child(2, 1, "landing-b", 50));
        let mut server = PageServer::new(store);

        let outcome = server.handle(&request("landing-b", "v1"));

        assert_eq!(
            outcome,
            Outcome::Redirect {
                url: "/landing".to_string(),
                code: 301
            }
        );
    }

    #[test]
    fn test_plain_page_renders_and_counts() {
        let mut store = MemoryStore::new();
        store.upsert_page(page_with_html(1, "landing", "<html></html>"));
        let mut server = PageServer::new(store);

        let outcome = server.handle(&request("landing", "v1"));

        assert_eq!(
            outcome,
            Outcome::Render {
                page: PageId(1),
                content: "<html></html>".to_string()
            }
        );
        let store = server.into_store();
        assert_eq!(store.page(PageId(1)).unwrap().variant_hits, 1);
    }

    #[test]
    fn test_variant_selection_is_sticky_across_requests() {
        let mut store = MemoryStore::new();
        store.upsert_page(Page::new(1, "Landing", "landing"));
        store.upsert_page(child(2, 1, "landing-b", 50));
        store.upsert_page(child(3, 1, "landing-c", 50));
        let mut server = PageServer::new(store);

        let first = server.handle(&request("landing", "v1"));
        let Outcome::Render { page: first_page, .. } = first else {
            panic!("expected a render, got {:?}", first);
        };

        for _ in 0..5 {
            let outcome = server.handle(&request("landing", "v1"));
            let Outcome::Render { page, .. } = outcome else {
                panic!("expected a render");
            };
            assert_eq!(page, first_page);
        }
    }

    #[test]
    fn test_different_visitors_spread_across_variants() {
        let mut store = MemoryStore::new();
        store.upsert_page(Page::new(1, "Landing", "landing"));
        store.upsert_page(child(2, 1, "landing-b", 50));
        store.upsert_page(child(3, 1, "landing-c", 50));
        let mut server = PageServer::new(store);

        for i in 0..20 {
            server.handle(&request("landing", &format!("v{}", i)));
        }

        let store = server.into_store();
        // The parent is configured at 0%, so the children split the
        // traffic evenly. The parent can pick up a stray view early on
        // while every deficit sits at zero, but no more than that.
        let parent_hits = store.page(PageId(1)).unwrap().variant_hits;
        let b_hits = store.page(PageId(2)).unwrap().variant_hits;
        let c_hits = store.page(PageId(3)).unwrap().variant_hits;

        assert!(parent_hits <= 1);
        assert_eq!(parent_hits + b_hits + c_hits, 20);
        assert!(b_hits.abs_diff(c_hits) <= 1);
    }

    #[test]
    fn test_translation_redirect_for_matching_locale() {
        let mut store = MemoryStore::new();
        store.upsert_page(Page::new(1, "Landing", "landing"));
        let mut translated = Page::new(2, "Landing (fr)", "landing-fr");
        translated.translation_parent = Some(PageId(1));
        translated.language = Some("fr_FR".to_string());
        store.upsert_page(translated);
        let mut server = PageServer::new(store);

        let mut req = request("landing", "v1");
        req.locale = Some("fr_FR".to_string());

        let outcome = server.handle(&req);

        assert_eq!(
            outcome,
            Outcome::Redirect {
                url: "/landing-fr".to_string(),
                code: 302
            }
        );
    }

    #[test]
    fn test_translation_redirect_can_be_suppressed() {
        let mut store = MemoryStore::new();
        store.upsert_page(Page::new(1, "Landing", "landing"));
        let mut translated = Page::new(2, "Landing (fr)", "landing-fr");
        translated.translation_parent = Some(PageId(1));
        translated.language = Some("fr_FR".to_string());
        store.upsert_page(translated);
        let mut server = PageServer::new(store);

        let mut req = request("landing", "v1");
        req.locale = Some("fr_FR".to_string());
        req.no_translation_redirect = true;

        assert!(matches!(server.handle(&req), Outcome::Render { .. }));
    }

    #[test]
    fn test_analytics_and_noindex_are_spliced_in() {
        let mut store = MemoryStore::new();
        let mut page = page_with_html(1, "landing", "<html><head></head></html>");
        page.no_index = true;
        store.upsert_page(page);
        let mut server = PageServer::new(store);

        let mut req = request("landing", "v1");
        req.analytics = Some("<script>track()</script>".to_string());

        let Outcome::Render { content, .. } = server.handle(&req) else {
            panic!("expected a render");
        };

        assert!(content.contains("<script>track()</script>\n"));
        assert!(content.contains("<meta name=\"robots\" content=\"noindex\">\n</head>"));
    }

    #[test]
    fn test_malformed_clickthrough_still_renders() {
        let mut store = MemoryStore::new();
        store.upsert_page(page_with_html(1, "landing", "<html></html>"));
        let mut server = PageServer::new(store);

        let mut req = request("landing", "v1");
        req.clickthrough = Some("!!garbage!!".to_string());

        assert!(matches!(server.handle(&req), Outcome::Render { .. }));
        let store = server.into_store();
        assert_eq!(store.hits()[0].contact, None);
    }

    #[test]
    fn test_valid_clickthrough_attributes_the_hit() {
        let mut store = MemoryStore::new();
        store.upsert_page(page_with_html(1, "landing", "<html></html>"));
        let mut server = PageServer::new(store);

        let mut req = request("landing", "v1");
        req.clickthrough = Some(token::encode(&Clickthrough {
            contact: Some(99),
            ..Default::default()
        }));

        server.handle(&req);
        let store = server.into_store();
        assert_eq!(store.hits()[0].contact, Some(99));
    }
}
