//! Coarse categorical distance between two locations.

use data_loader::{Location, Profile};

/// Distance when both cities match.
pub const SAME_CITY: u8 = 0;
/// Distance when both regions match.
pub const SAME_REGION: u8 = 1;
/// Distance when both countries match.
pub const SAME_COUNTRY: u8 = 2;
/// Distance when nothing matches.
pub const ELSEWHERE: u8 = 3;

/// Categorical distance: 0 same city, 1 same region, 2 same country, 3 other.
///
/// A level only matches when it is present on both sides; absent levels
/// fall through to the next coarser comparison. Case-insensitive.
pub fn distance(a: &Location, b: &Location) -> u8 {
    if level_matches(&a.city, &b.city) {
        SAME_CITY
    } else if level_matches(&a.region, &b.region) {
        SAME_REGION
    } else if level_matches(&a.country, &b.country) {
        SAME_COUNTRY
    } else {
        ELSEWHERE
    }
}

/// Where a member is right now: the active trip destination, else home.
pub fn current_location(profile: &Profile) -> &Location {
    profile
        .active_trip()
        .map(|window| &window.destination)
        .unwrap_or(&profile.home)
}

fn level_matches(a: &Option<String>, b: &Option<String>) -> bool {
    match (a.as_deref().map(str::trim), b.as_deref().map(str::trim)) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
            a.to_lowercase() == b.to_lowercase()
        }
        _ => false,
    }
}
