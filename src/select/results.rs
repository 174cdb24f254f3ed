//! Results related to the selection of a variant for a visitor.

use serde::Deserialize;
use serde::Serialize;

use crate::page::PageId;

/// The standing of a single candidate at selection time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateStanding {
    /// The page this candidate stands for.
    pub id: PageId,

    /// Configured share of traffic as a fraction in `[0.0, 1.0]`.
    pub weight: f64,

    /// Observed hits, translations folded in.
    pub hits: u64,

    /// `weight − hits/total_hits`, or `weight` on a cold start. The most
    /// under-exposed candidate has the largest deficit.
    pub deficit: f64,
}

/// The outcome of a variant selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Selection {
    /// The page the visitor should see.
    pub chosen: PageId,

    /// The parent page of the group the selection was made within.
    pub parent: PageId,

    /// Whether the choice came from a prior assignment rather than being
    /// computed fresh.
    pub sticky: bool,

    /// Total hits across all candidates at selection time. Zero for sticky
    /// selections, where no ranking takes place.
    pub total_hits: u64,

    /// Per-candidate diagnostics, ranked best first. Empty for sticky
    /// selections.
    pub standings: Vec<CandidateStanding>,
}

impl Selection {
    /// Creates a selection that reuses a visitor's prior assignment.
    pub fn from_prior(chosen: PageId, parent: PageId) -> Self {
        Selection {
            chosen,
            parent,
            sticky: true,
            total_hits: 0,
            standings: Vec::new(),
        }
    }

    /// Whether the parent itself was chosen.
    pub fn is_parent(&self) -> bool {
        self.chosen == self.parent
    }
}
