//! Ranked output records and the deterministic sort orders.
//!
//! ## People
//! Each [`RankingPolicy`] is a total order over [`RankedProfile`]s; ties fall
//! through to the next key and finally to pool order (stable sort).
//!
//! ## Content
//! Content always applies a fixed priority before dates and scores:
//! 1. Already engaged first
//! 2. Member-created before AI-generated (configurable)
//! 3. Authored by the viewer first
//! 4. Soonest start first
//! 5. Higher feedback score first

use crate::compatibility::{CompatibilityScore, CompatibilityScorer};
use crate::feedback::FeedbackScorer;
use crate::location::{current_location, distance};
use crate::policy::RankingPolicy;
use data_loader::{ContentItem, InteractionRecord, Profile};
use rayon::prelude::*;
use serde::Serialize;
use sources::{ContentCandidate, extract_signals, signals::normalize_token};
use std::cmp::Ordering;
use std::collections::HashSet;

// =============================================================================
// People
// =============================================================================

/// A person-candidate annotated with everything the sort orders need.
#[derive(Debug, Clone, Serialize)]
pub struct RankedProfile {
    pub profile: Profile,
    pub compatibility: CompatibilityScore,
    /// Categorical distance between the two current locations
    pub distance: u8,
    /// Only set once the candidate has been enriched
    pub mutual_connections: Option<u32>,
    pub travel_experience: usize,
}

/// Trip count plus distinct countries across travel destinations.
pub fn travel_experience(profile: &Profile) -> usize {
    let countries: HashSet<String> = profile
        .travel_windows
        .iter()
        .filter_map(|window| normalize_token(window.destination.country.as_deref()))
        .collect();
    profile.travel_windows.len() + countries.len()
}

/// Score a people pool against the viewer, keeping pool order.
pub fn build_ranked_profiles(
    viewer: &Profile,
    pool: Vec<Profile>,
    scorer: &CompatibilityScorer,
) -> Vec<RankedProfile> {
    let scores = scorer.score_all(viewer, &pool);
    let viewer_location = current_location(viewer);

    pool.into_iter()
        .zip(scores)
        .map(|(profile, compatibility)| RankedProfile {
            distance: distance(viewer_location, current_location(&profile)),
            travel_experience: travel_experience(&profile),
            mutual_connections: None,
            compatibility,
            profile,
        })
        .collect()
}

/// Sort a people list under `policy`. Stable.
pub fn sort_profiles(ranked: &mut [RankedProfile], policy: RankingPolicy) {
    match policy {
        RankingPolicy::Compatibility => ranked.sort_by(by_compatibility),
        RankingPolicy::ClosestNearby => ranked.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| by_compatibility(a, b))
        }),
        RankingPolicy::TravelExperience => {
            ranked.sort_by(|a, b| b.travel_experience.cmp(&a.travel_experience))
        }
        RankingPolicy::MutualConnections => ranked.sort_by(|a, b| {
            let mutual_a = a.mutual_connections.unwrap_or(0);
            let mutual_b = b.mutual_connections.unwrap_or(0);
            mutual_b.cmp(&mutual_a).then_with(|| by_compatibility(a, b))
        }),
        // None sorts below every timestamp
        RankingPolicy::Recent => {
            ranked.sort_by(|a, b| b.profile.last_active.cmp(&a.profile.last_active))
        }
    }
}

fn by_compatibility(a: &RankedProfile, b: &RankedProfile) -> Ordering {
    b.compatibility.score.cmp(&a.compatibility.score)
}

// =============================================================================
// Content
// =============================================================================

/// A content candidate annotated for the content sort order.
#[derive(Debug, Clone, Serialize)]
pub struct RankedContent {
    pub item: ContentItem,
    pub is_engaged: bool,
    pub authored_by_viewer: bool,
    pub feedback_score: f64,
    /// Discovery location label the item was first found under
    pub found_at: String,
}

/// Score merged content candidates from the viewer's history, keeping order.
pub fn build_ranked_content(
    viewer: &Profile,
    candidates: Vec<ContentCandidate>,
    history: &[InteractionRecord],
    scorer: &FeedbackScorer,
) -> Vec<RankedContent> {
    let interests = extract_signals(viewer).interests;

    candidates
        .into_par_iter()
        .map(|candidate| RankedContent {
            feedback_score: scorer.score(&candidate.item, &interests, history),
            authored_by_viewer: candidate.item.organizer_id.as_deref() == Some(viewer.id.as_str()),
            is_engaged: candidate.is_engaged,
            found_at: candidate.found_at,
            item: candidate.item,
        })
        .collect()
}

/// Fixed priority tiers applied to content before dates and scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentPriority {
    /// Member-created items outrank AI-generated ones in the same tier
    pub member_content_first: bool,
}

impl Default for ContentPriority {
    fn default() -> Self {
        Self {
            member_content_first: true,
        }
    }
}

impl ContentPriority {
    pub fn new(member_content_first: bool) -> Self {
        Self {
            member_content_first,
        }
    }

    /// Sort content in place. Stable.
    pub fn sort(&self, ranked: &mut [RankedContent]) {
        ranked.sort_by(|a, b| self.compare(a, b));
    }

    fn compare(&self, a: &RankedContent, b: &RankedContent) -> Ordering {
        b.is_engaged
            .cmp(&a.is_engaged)
            .then_with(|| {
                if self.member_content_first {
                    a.item.ai_generated.cmp(&b.item.ai_generated)
                } else {
                    Ordering::Equal
                }
            })
            .then_with(|| b.authored_by_viewer.cmp(&a.authored_by_viewer))
            .then_with(|| a.item.starts_at.cmp(&b.item.starts_at))
            .then_with(|| b.feedback_score.total_cmp(&a.feedback_score))
    }
}

/// Sort content with the default priority tiers.
pub fn sort_content(ranked: &mut [RankedContent]) {
    ContentPriority::default().sort(ranked);
}
