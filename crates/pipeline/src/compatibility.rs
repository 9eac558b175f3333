//! Pairwise compatibility scoring between a viewer and a person-candidate.
//!
//! The score is a fixed, inspectable weighted sum:
//! - +10 per shared interest
//! - +8 per shared activity
//! - `max(0, 20 - |age difference|)` when both ages are known
//! - +15 when both travel styles are present and equal
//! - +5 when the candidate is verified
//!
//! Reasons list shared interests first and shared activities second, then
//! the style, age and verification terms by contribution; at most three.
//!
//! Facets (location overlap, date overlap, style overlap, user-type
//! compatibility) are surfaced for badges but not weighted into the score.

use data_loader::{Profile, UserType};
use rayon::prelude::*;
use serde::Serialize;
use sources::{SignalSet, extract_signals};
use std::cmp::Reverse;

pub const INTEREST_WEIGHT: u32 = 10;
pub const ACTIVITY_WEIGHT: u32 = 8;
pub const AGE_WINDOW: u32 = 20;
pub const STYLE_BONUS: u32 = 15;
pub const VERIFIED_BONUS: u32 = 5;

/// Scores at or above this are `High`.
pub const HIGH_THRESHOLD: u32 = 40;
/// Scores at or above this (and below `HIGH_THRESHOLD`) are `Medium`.
pub const MEDIUM_THRESHOLD: u32 = 15;

const MAX_REASONS: usize = 3;
const INTERESTS_IN_REASON: usize = 3;
const ACTIVITIES_IN_REASON: usize = 2;

/// Discrete compatibility tier, monotonic in the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityTier {
    Low,
    Medium,
    High,
}

impl CompatibilityTier {
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_THRESHOLD {
            CompatibilityTier::High
        } else if score >= MEDIUM_THRESHOLD {
            CompatibilityTier::Medium
        } else {
            CompatibilityTier::Low
        }
    }
}

/// Badge facets of a pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompatibilityFacets {
    /// One side's current trip is the other's home city or current trip
    pub location_overlap: bool,
    /// The two travel plans share at least one day
    pub date_overlap: bool,
    /// Both travel styles present and equal
    pub style_overlap: bool,
    pub user_type_compatible: bool,
}

/// Score of a (viewer, candidate) pair. Created per query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityScore {
    pub score: u32,
    pub tier: CompatibilityTier,
    /// Most significant first, at most three
    pub reasons: Vec<String>,
    pub facets: CompatibilityFacets,
    pub shared_interests: Vec<String>,
    pub shared_activities: Vec<String>,
}

/// Computes compatibility scores.
///
/// Stateless; a single instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilityScorer;

impl CompatibilityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a viewer against a pool of candidates in parallel.
    ///
    /// Returns one score per candidate, in the same order.
    pub fn score_all(&self, viewer: &Profile, candidates: &[Profile]) -> Vec<CompatibilityScore> {
        let viewer_signals = extract_signals(viewer);
        candidates
            .par_iter()
            .map(|candidate| self.score(&viewer_signals, &extract_signals(candidate)))
            .collect()
    }

    /// Score one pair. Absent data contributes zero; never fails.
    pub fn score(&self, viewer: &SignalSet, candidate: &SignalSet) -> CompatibilityScore {
        let shared_interests: Vec<String> = viewer
            .interests
            .iter()
            .filter(|interest| candidate.has_interest(interest))
            .cloned()
            .collect();
        let shared_activities: Vec<String> = viewer
            .activities
            .iter()
            .filter(|activity| candidate.has_activity(activity))
            .cloned()
            .collect();

        let interest_term = INTEREST_WEIGHT * shared_interests.len() as u32;
        let activity_term = ACTIVITY_WEIGHT * shared_activities.len() as u32;
        let age_term = match (viewer.age, candidate.age) {
            (Some(a), Some(b)) => AGE_WINDOW.saturating_sub(a.abs_diff(b)),
            _ => 0,
        };
        let shared_style = match (&viewer.travel_style, &candidate.travel_style) {
            (Some(a), Some(b)) if a == b => Some(a.clone()),
            _ => None,
        };
        let style_term = if shared_style.is_some() { STYLE_BONUS } else { 0 };
        let verified_term = if candidate.verified { VERIFIED_BONUS } else { 0 };

        let score = interest_term + activity_term + age_term + style_term + verified_term;

        // Shared interests then shared activities always lead; the remaining
        // terms follow by contribution, ties kept in style, age, verified order
        let mut reasons: Vec<String> = Vec::with_capacity(MAX_REASONS);
        if interest_term > 0 {
            reasons.push(format!(
                "Shared interests: {}",
                render_list(&shared_interests, INTERESTS_IN_REASON)
            ));
        }
        if activity_term > 0 {
            reasons.push(format!(
                "Shared activities: {}",
                render_list(&shared_activities, ACTIVITIES_IN_REASON)
            ));
        }
        let mut secondary: Vec<(u32, String)> = Vec::with_capacity(3);
        if let Some(style) = &shared_style {
            secondary.push((style_term, format!("Same travel style: {}", style)));
        }
        if age_term > 0 {
            secondary.push((age_term, "Close in age".to_string()));
        }
        if verified_term > 0 {
            secondary.push((verified_term, "Verified member".to_string()));
        }
        secondary.sort_by_key(|(contribution, _)| Reverse(*contribution));
        reasons.extend(secondary.into_iter().map(|(_, reason)| reason));
        reasons.truncate(MAX_REASONS);

        CompatibilityScore {
            score,
            tier: CompatibilityTier::from_score(score),
            reasons,
            facets: CompatibilityFacets {
                location_overlap: location_overlap(viewer, candidate),
                date_overlap: date_overlap(viewer, candidate),
                style_overlap: shared_style.is_some(),
                user_type_compatible: user_types_compatible(viewer.user_type, candidate.user_type),
            },
            shared_interests,
            shared_activities,
        }
    }
}

/// Fixed compatibility table: any pairing of known types works except two
/// business accounts. Unknown types are never compatible.
pub fn user_types_compatible(a: Option<UserType>, b: Option<UserType>) -> bool {
    match (a, b) {
        (Some(UserType::Business), Some(UserType::Business)) => false,
        (Some(_), Some(_)) => true,
        _ => false,
    }
}

fn location_overlap(a: &SignalSet, b: &SignalSet) -> bool {
    let trip_meets = |traveler: &SignalSet, other: &SignalSet| {
        let Some(destination) = traveler.active_destination.as_ref().and_then(|d| d.search_key()) else {
            return false;
        };
        let home_city = other.home.city.as_deref();
        let other_trip = other.active_destination.as_ref().and_then(|d| d.search_key());
        home_city == Some(destination) || other_trip == Some(destination)
    };
    trip_meets(a, b) || trip_meets(b, a)
}

fn date_overlap(a: &SignalSet, b: &SignalSet) -> bool {
    a.travel_windows
        .iter()
        .any(|left| b.travel_windows.iter().any(|right| left.overlaps(right)))
}

fn render_list(items: &[String], limit: usize) -> String {
    let shown = items[..items.len().min(limit)].join(", ");
    if items.len() > limit {
        format!("{} (+{} more)", shown, items.len() - limit)
    } else {
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use data_loader::{Location, TravelWindow};

    fn profile(id: &str, interests: &[&str]) -> Profile {
        let mut profile = Profile::new(id);
        profile.interests = interests.iter().map(|s| s.to_string()).collect();
        profile
    }

    fn score(a: &Profile, b: &Profile) -> CompatibilityScore {
        CompatibilityScorer::new().score(&extract_signals(a), &extract_signals(b))
    }

    fn window(city: &str, start: (i32, u32, u32), end: Option<(i32, u32, u32)>) -> TravelWindow {
        let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        TravelWindow::new(Location::city(city), date(start), end.map(date))
    }

    #[test]
    fn test_shared_interests_scenario() {
        let viewer = profile("viewer", &["hiking", "photography"]);
        let a = profile("a", &["hiking", "coffee"]);
        let b = profile("b", &["Photography", "hiking"]);

        assert_eq!(score(&viewer, &a).score, 10);
        assert_eq!(score(&viewer, &b).score, 20);
    }

    #[test]
    fn test_all_terms() {
        let mut viewer = profile("viewer", &["hiking"]);
        viewer.activities = vec!["surfing".to_string(), "diving".to_string()];
        viewer.age = Some(30);
        viewer.travel_style = Some("Backpacker".to_string());

        let mut candidate = profile("c", &["hiking"]);
        candidate.activities = vec!["diving".to_string(), "surfing".to_string()];
        candidate.age = Some(34);
        candidate.travel_style = Some("backpacker".to_string());
        candidate.verified = true;

        let result = score(&viewer, &candidate);

        // 10 + 16 + 16 + 15 + 5
        assert_eq!(result.score, 62);
        assert_eq!(result.tier, CompatibilityTier::High);
        assert!(result.facets.style_overlap);
        assert_eq!(result.reasons.len(), 3);
        assert_eq!(result.reasons[0], "Shared interests: hiking");
        assert_eq!(result.reasons[1], "Shared activities: surfing, diving");
        // Age (16) outweighs style (15)
        assert_eq!(result.reasons[2], "Close in age");
    }

    #[test]
    fn test_shared_interests_lead_larger_terms() {
        let mut viewer = profile("viewer", &["hiking"]);
        viewer.age = Some(30);
        viewer.travel_style = Some("slow".to_string());
        let mut candidate = profile("c", &["hiking"]);
        candidate.age = Some(30);
        candidate.travel_style = Some("slow".to_string());
        candidate.verified = true;

        let result = score(&viewer, &candidate);

        // Age (20) and style (15) both outweigh one shared interest (10)
        assert_eq!(
            result.reasons,
            vec![
                "Shared interests: hiking".to_string(),
                "Close in age".to_string(),
                "Same travel style: slow".to_string(),
            ]
        );
    }

    #[test]
    fn test_age_term_floors_at_zero() {
        let mut a = Profile::new("a");
        a.age = Some(20);
        let mut b = Profile::new("b");
        b.age = Some(55);

        assert_eq!(score(&a, &b).score, 0);

        b.age = None;
        assert_eq!(score(&a, &b).score, 0);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(CompatibilityTier::from_score(14), CompatibilityTier::Low);
        assert_eq!(CompatibilityTier::from_score(15), CompatibilityTier::Medium);
        assert_eq!(CompatibilityTier::from_score(39), CompatibilityTier::Medium);
        assert_eq!(CompatibilityTier::from_score(40), CompatibilityTier::High);
    }

    #[test]
    fn test_tier_is_monotonic() {
        let mut previous = CompatibilityTier::from_score(0);
        for score in 1..200 {
            let tier = CompatibilityTier::from_score(score);
            assert!(tier >= previous);
            previous = tier;
        }
    }

    #[test]
    fn test_symmetric_inputs_score_identically() {
        let mut a = profile("a", &["hiking", "food", "art"]);
        a.activities = vec!["surfing".to_string()];
        a.age = Some(28);
        a.verified = true;
        a.travel_style = Some("slow".to_string());
        let mut b = profile("b", &["art", "hiking", "music"]);
        b.activities = vec!["surfing".to_string(), "yoga".to_string()];
        b.age = Some(31);
        b.verified = true;
        b.travel_style = Some("slow".to_string());

        assert_eq!(score(&a, &b).score, score(&b, &a).score);
    }

    #[test]
    fn test_verification_is_candidate_side() {
        let viewer = Profile::new("viewer");
        let mut candidate = Profile::new("c");
        candidate.verified = true;

        assert_eq!(score(&viewer, &candidate).score, VERIFIED_BONUS);
        assert_eq!(score(&candidate, &viewer).score, 0);
    }

    #[test]
    fn test_reason_lists_are_truncated() {
        let viewer = profile("v", &["a", "b", "c", "d", "e"]);
        let candidate = profile("c", &["a", "b", "c", "d", "e"]);

        let result = score(&viewer, &candidate);

        assert_eq!(result.reasons[0], "Shared interests: a, b, c (+2 more)");
        assert_eq!(result.shared_interests.len(), 5);
    }

    #[test]
    fn test_empty_profiles_have_no_reasons() {
        let result = score(&Profile::new("a"), &Profile::new("b"));
        assert_eq!(result.score, 0);
        assert_eq!(result.tier, CompatibilityTier::Low);
        assert!(result.reasons.is_empty());
        assert_eq!(result.facets, CompatibilityFacets::default());
    }

    #[test]
    fn test_location_overlap() {
        let mut visitor = Profile::new("visitor");
        visitor.travel_windows = vec![window("Lisbon", (2025, 6, 1), Some((2025, 6, 10))).active()];
        let mut local = Profile::new("local");
        local.home = Location::city("lisbon");
        let mut elsewhere = Profile::new("elsewhere");
        elsewhere.home = Location::city("Porto");

        assert!(score(&visitor, &local).facets.location_overlap);
        assert!(score(&local, &visitor).facets.location_overlap);
        assert!(!score(&visitor, &elsewhere).facets.location_overlap);
    }

    #[test]
    fn test_date_overlap_with_open_ended_window() {
        let mut a = Profile::new("a");
        a.travel_windows = vec![window("Rome", (2025, 6, 1), None)];
        let mut b = Profile::new("b");
        b.travel_windows = vec![window("Oslo", (2030, 1, 1), Some((2030, 1, 5)))];
        let mut c = Profile::new("c");
        c.travel_windows = vec![window("Oslo", (2025, 1, 1), Some((2025, 5, 31)))];

        assert!(score(&a, &b).facets.date_overlap);
        assert!(!score(&a, &c).facets.date_overlap);
    }

    #[test]
    fn test_user_type_table() {
        use UserType::*;
        assert!(user_types_compatible(Some(Traveler), Some(Local)));
        assert!(user_types_compatible(Some(Traveler), Some(Traveler)));
        assert!(user_types_compatible(Some(Business), Some(Traveler)));
        assert!(!user_types_compatible(Some(Business), Some(Business)));
        assert!(!user_types_compatible(None, Some(Local)));
    }

    #[test]
    fn test_score_all_keeps_order() {
        let viewer = profile("viewer", &["hiking", "photography"]);
        let pool = vec![
            profile("a", &["hiking"]),
            profile("b", &["hiking", "photography"]),
            profile("c", &[]),
        ];

        let scores: Vec<u32> = CompatibilityScorer::new()
            .score_all(&viewer, &pool)
            .into_iter()
            .map(|s| s.score)
            .collect();

        assert_eq!(scores, vec![10, 20, 0]);
    }
}
