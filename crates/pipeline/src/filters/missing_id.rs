//! Filter to reject malformed records.
//!
//! A candidate without an identifier cannot be deduplicated, engaged with
//! or rated, so it is dropped before scoring instead of being scored
//! silently.

use crate::traits::Filter;
use data_loader::{Identified, Profile};
use tracing::warn;

/// Removes candidates whose identifier is empty or blank.
pub struct MissingIdFilter;

impl<T: Identified> Filter<T> for MissingIdFilter {
    fn name(&self) -> &str {
        "MissingIdFilter"
    }

    fn apply(&self, candidates: Vec<T>, _viewer: &Profile) -> Vec<T> {
        let input_len = candidates.len();
        let kept: Vec<T> = candidates
            .into_iter()
            .filter(|candidate| candidate.has_identifier())
            .collect();
        if kept.len() < input_len {
            warn!("Rejected {} records without an identifier", input_len - kept.len());
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use data_loader::ContentItem;

    #[test]
    fn test_missing_id_profiles() {
        let viewer = Profile::new("ana");
        let candidates = vec![Profile::new("bo"), Profile::new(""), Profile::new("   ")];

        let kept = MissingIdFilter.apply(candidates, &viewer);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "bo");
    }

    #[test]
    fn test_missing_id_content() {
        let viewer = Profile::new("ana");
        let candidates = vec![
            ContentItem::new("", "No id", Utc::now()),
            ContentItem::new("e1", "Has id", Utc::now()),
        ];

        let kept = MissingIdFilter.apply(candidates, &viewer);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "e1");
    }
}
