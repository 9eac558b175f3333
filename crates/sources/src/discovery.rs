//! Discovery locations.
//!
//! A viewer's content is searched at every place they are associated with:
//! home, the trip they are on now, and every planned trip.

use data_loader::Profile;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryKind {
    Home,
    ActiveTrip,
    PlannedTrip,
}

/// One fan-out key for content search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryLocation {
    /// Human-readable label ("Home", "Current trip", "Trip to Rome")
    pub label: String,
    /// Location string passed to the content source
    pub location: String,
    pub kind: DiscoveryKind,
}

/// Derive the discovery locations of a profile.
///
/// ## Algorithm
/// 1. Home, if any location level is set
/// 2. The active trip's destination, if the viewer is traveling now
/// 3. One entry per distinct planned-trip destination that is not the
///    active trip's destination (compared case-insensitively)
///
/// The derivation is deterministic: planned trips keep their order on the
/// profile.
pub fn discovery_locations(profile: &Profile) -> Vec<DiscoveryLocation> {
    let mut locations = Vec::new();

    if let Some(home) = profile.home.search_key() {
        locations.push(DiscoveryLocation {
            label: "Home".to_string(),
            location: home.to_string(),
            kind: DiscoveryKind::Home,
        });
    }

    let active = profile
        .active_trip()
        .and_then(|trip| trip.destination.search_key());
    if let Some(active) = active {
        locations.push(DiscoveryLocation {
            label: "Current trip".to_string(),
            location: active.to_string(),
            kind: DiscoveryKind::ActiveTrip,
        });
    }

    let mut seen: HashSet<String> = active.map(str::to_lowercase).into_iter().collect();
    for trip in profile.planned_trips() {
        let Some(destination) = trip.destination.search_key() else {
            continue;
        };
        if seen.insert(destination.to_lowercase()) {
            locations.push(DiscoveryLocation {
                label: format!("Trip to {}", destination),
                location: destination.to_string(),
                kind: DiscoveryKind::PlannedTrip,
            });
        }
    }

    locations
}
