//! Module holding the logic for choosing a variant from a group.
//!
//! Selection is sticky per visitor: a prior assignment that still refers to
//! a current group member is reused as-is. Otherwise candidates are ranked
//! by *weight deficit*, the gap between the share of traffic a candidate is
//! configured to receive and the share it has actually received, so that the
//! most under-exposed candidate is shown next and observed proportions
//! converge toward the configured weights as hits accumulate.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::page::variant::VariantGroup;
use crate::page::PageId;
use crate::select::results::CandidateStanding;
use crate::select::results::Selection;

/// Chooses the group member an anonymous visitor should see.
///
/// `prior` is the visitor's previously assigned variant, if any. A prior
/// that no longer refers to a group member (the variant was unpublished or
/// deleted since) is discarded and a fresh selection is computed.
///
/// Ranking: deficit descending, then ascending hit count, then ascending
/// page id. With no recorded hits the deficit degenerates to the configured
/// weight, so a cold start is decided purely by weight. This function never
/// fails; a group holding only the parent always selects the parent.
pub fn select(group: &VariantGroup, prior: Option<PageId>) -> Selection {
    if let Some(id) = prior {
        if group.contains(id) {
            return Selection::from_prior(id, group.parent());
        }
    }

    let total_hits: u64 = group.candidates().map(|c| c.hits).sum();

    let standings: Vec<CandidateStanding> = group
        .candidates()
        .map(|candidate| {
            let deficit = match total_hits {
                0 => candidate.weight,
                total => candidate.weight - (candidate.hits as f64 / total as f64),
            };

            CandidateStanding {
                id: candidate.id,
                weight: candidate.weight,
                hits: candidate.hits,
                deficit,
            }
        })
        .sorted_by(|a, b| {
            b.deficit
                .partial_cmp(&a.deficit)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.hits.cmp(&b.hits))
                .then_with(|| a.id.cmp(&b.id))
        })
        .collect();

    let chosen = standings
        .first()
        .map(|standing| standing.id)
        .unwrap_or_else(|| group.parent());

    Selection {
        chosen,
        parent: group.parent(),
        sticky: false,
        total_hits,
        standings,
    }
}
