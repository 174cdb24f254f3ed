//! Variant (A/B test) groups.
//!
//! A [`VariantGroup`] is derived, never persisted: it is the parent page plus
//! its currently published child variants, each reduced to the two numbers
//! the selector cares about: a configured traffic share as a fraction and an
//! observed hit count. Hit counts fold in the hits of each member's published
//! translations, since a page and its translations share exposure accounting.

use indexmap::IndexMap;
use tracing::warn;

use crate::page::Page;
use crate::page::PageId;

/// A member of a [`VariantGroup`] as seen by the selector.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// The page this candidate stands for.
    pub id: PageId,

    /// Configured share of traffic as a fraction in `[0.0, 1.0]`.
    pub weight: f64,

    /// Observed hits, with published-translation hits folded in.
    pub hits: u64,
}

/// The parent page and its published child variants.
#[derive(Clone, Debug)]
pub struct VariantGroup {
    parent: PageId,
    candidates: IndexMap<PageId, Candidate>,
}

impl VariantGroup {
    /// Assembles a variant group from value snapshots.
    ///
    /// Unpublished children are skipped. The parent always becomes a
    /// candidate and receives the residual weight `1 − Σ child_weight/100`.
    /// A configuration whose child weights sum past 100 clamps the residual
    /// to zero rather than failing, since the selector must never raise.
    ///
    /// `translations` may contain translations for any member; each one's
    /// hits are folded into the member it translates, provided it is
    /// published.
    pub fn assemble(parent: &Page, children: &[Page], translations: &[Page]) -> Self {
        let mut candidates = IndexMap::new();
        let mut child_weight_total: u32 = 0;

        let mut published_children = Vec::new();
        for child in children {
            if !child.is_published_now() {
                continue;
            }

            child_weight_total += u32::from(child.variant_weight);
            published_children.push(child);
        }

        if child_weight_total > 100 {
            warn!(
                "Child variant weights for page {} sum to {}%; the parent receives no traffic.",
                parent.id, child_weight_total
            );
        }

        let residual = 100u32.saturating_sub(child_weight_total);
        candidates.insert(
            parent.id,
            Candidate {
                id: parent.id,
                weight: f64::from(residual) / 100.0,
                hits: folded_hits(parent, translations),
            },
        );

        for child in published_children {
            candidates.insert(
                child.id,
                Candidate {
                    id: child.id,
                    weight: f64::from(child.variant_weight) / 100.0,
                    hits: folded_hits(child, translations),
                },
            );
        }

        VariantGroup {
            parent: parent.id,
            candidates,
        }
    }

    /// The parent page of this group.
    pub fn parent(&self) -> PageId {
        self.parent
    }

    /// Whether the given page is currently a member of this group.
    pub fn contains(&self, id: PageId) -> bool {
        self.candidates.contains_key(&id)
    }

    /// Looks up a candidate by page id.
    pub fn get(&self, id: PageId) -> Option<&Candidate> {
        self.candidates.get(&id)
    }

    /// Iterates the candidates in insertion order (parent first).
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
    }

    /// Number of candidates, parent included.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the group holds no candidates at all. In practice assembly
    /// always inserts the parent, so this only occurs for hand-built groups.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Whether any published child variants exist alongside the parent.
    pub fn has_children(&self) -> bool {
        self.candidates.len() > 1
    }
}

fn folded_hits(page: &Page, translations: &[Page]) -> u64 {
    let translated: u64 = translations
        .iter()
        .filter(|t| t.translation_parent == Some(page.id) && t.is_published_now())
        .map(|t| t.variant_hits)
        .sum();

    page.variant_hits + translated
}
