//! Resolution of a visitor's preferred locale against a translation group.
//!
//! Matching is exact on the full tag first (`en_US` against `en_US`), then
//! falls back to the bare language prefix (`en` matches `en_US`). The first
//! published member that matches, in group order, wins.

use crate::page::Page;
use crate::page::PageId;

/// Picks the member of a translation group that best matches the visitor's
/// preferred locale. Returns `None` when nothing matches or when the best
/// match is the page already being shown.
pub fn resolve(current: &Page, members: &[Page], locale: &str) -> Option<PageId> {
    let exact = members
        .iter()
        .filter(|m| m.is_published_now())
        .find(|m| matches_tag(m, locale, false));

    let chosen = match exact {
        Some(member) => Some(member),
        None => members
            .iter()
            .filter(|m| m.is_published_now())
            .find(|m| matches_tag(m, locale, true)),
    }?;

    if chosen.id == current.id {
        return None;
    }

    Some(chosen.id)
}

fn matches_tag(member: &Page, locale: &str, prefix_only: bool) -> bool {
    let Some(language) = member.language.as_deref() else {
        return false;
    };

    if prefix_only {
        language_prefix(language).eq_ignore_ascii_case(language_prefix(locale))
    } else {
        language.eq_ignore_ascii_case(locale)
    }
}

fn language_prefix(tag: &str) -> &str {
    tag.split(['_', '-']).next().unwrap_or(tag)
}
