//! Signal extraction.
//!
//! Turns raw profile and content records into normalized signal sets:
//! token lists are trimmed, case-folded and deduplicated, blank fields
//! become `None`. Nothing here can fail; malformed values are treated as
//! absent.

use data_loader::{ContentItem, Location, Profile, TravelWindow, UserType};
use std::collections::HashSet;

/// Normalized view of a profile used by the scorers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalSet {
    /// Case-folded interests, first occurrence order, no duplicates
    pub interests: Vec<String>,
    /// Case-folded activities, first occurrence order, no duplicates
    pub activities: Vec<String>,
    pub travel_style: Option<String>,
    pub age: Option<u32>,
    pub verified: bool,
    pub user_type: Option<UserType>,
    pub home: Location,
    pub active_destination: Option<Location>,
    pub travel_windows: Vec<TravelWindow>,
}

impl SignalSet {
    pub fn has_interest(&self, token: &str) -> bool {
        self.interests.iter().any(|interest| interest == token)
    }

    pub fn has_activity(&self, token: &str) -> bool {
        self.activities.iter().any(|activity| activity == token)
    }
}

/// Normalized view of a content item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentSignals {
    pub category: Option<String>,
    pub tags: Vec<String>,
}

/// Extract the signal set of a profile.
pub fn extract_signals(profile: &Profile) -> SignalSet {
    SignalSet {
        interests: normalize_tokens(&profile.interests),
        activities: normalize_tokens(&profile.activities),
        travel_style: normalize_token(profile.travel_style.as_deref()),
        age: profile.age.filter(|&age| age > 0),
        verified: profile.verified,
        user_type: profile.user_type,
        home: normalize_location(&profile.home),
        active_destination: profile
            .active_trip()
            .map(|trip| normalize_location(&trip.destination))
            .filter(|location| !location.is_empty()),
        travel_windows: profile.travel_windows.clone(),
    }
}

/// Extract the signals of a content item.
pub fn extract_content_signals(item: &ContentItem) -> ContentSignals {
    ContentSignals {
        category: normalize_token(Some(item.category.as_str())),
        tags: normalize_tokens(&item.tags),
    }
}

/// Trim, case-fold and deduplicate a token list, keeping first occurrences.
pub fn normalize_tokens(tokens: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .iter()
        .filter_map(|token| normalize_token(Some(token.as_str())))
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Trim and case-fold a single token; blank becomes `None`.
pub fn normalize_token(token: Option<&str>) -> Option<String> {
    token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn normalize_location(location: &Location) -> Location {
    Location {
        city: normalize_token(location.city.as_deref()),
        region: normalize_token(location.region.as_deref()),
        country: normalize_token(location.country.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_tokens_are_deduplicated_and_case_folded() {
        let mut profile = Profile::new("ana");
        profile.interests = vec![
            "Hiking".to_string(),
            " hiking ".to_string(),
            "Photography".to_string(),
            "".to_string(),
        ];

        let signals = extract_signals(&profile);

        assert_eq!(signals.interests, vec!["hiking", "photography"]);
    }

    #[test]
    fn test_absent_fields_become_empty() {
        let mut profile = Profile::new("ana");
        profile.travel_style = Some("   ".to_string());
        profile.age = Some(0);

        let signals = extract_signals(&profile);

        assert!(signals.interests.is_empty());
        assert!(signals.activities.is_empty());
        assert_eq!(signals.travel_style, None);
        assert_eq!(signals.age, None);
        assert!(signals.home.is_empty());
        assert_eq!(signals.active_destination, None);
    }

    #[test]
    fn test_active_destination_is_normalized() {
        let mut profile = Profile::new("ana");
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        profile.travel_windows = vec![
            TravelWindow::new(Location::city("Rome"), start, None),
            TravelWindow::new(Location::city(" Lisbon "), start, None).active(),
        ];

        let signals = extract_signals(&profile);

        assert_eq!(signals.active_destination, Some(Location::city("lisbon")));
        assert_eq!(signals.travel_windows.len(), 2);
    }

    #[test]
    fn test_content_signals() {
        let mut item = ContentItem::new("e1", "Fado", Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap());
        item.category = " Music ".to_string();
        item.tags = vec!["Live".to_string(), "live".to_string()];

        let signals = extract_content_signals(&item);

        assert_eq!(signals.category.as_deref(), Some("music"));
        assert_eq!(signals.tags, vec!["live"]);
    }
}
