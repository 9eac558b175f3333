//! Optional filter for content that is already over.

use crate::traits::Filter;
use chrono::{DateTime, Utc};
use data_loader::Profile;
use sources::ContentCandidate;

/// Drops content whose end (or start, when it has no end) is before a
/// reference instant.
pub struct UpcomingFilter {
    now: DateTime<Utc>,
}

impl UpcomingFilter {
    /// # Arguments
    /// * `now` - Reference instant; content still running at `now` is kept
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Filter<ContentCandidate> for UpcomingFilter {
    fn name(&self) -> &str {
        "UpcomingFilter"
    }

    fn apply(&self, candidates: Vec<ContentCandidate>, _viewer: &Profile) -> Vec<ContentCandidate> {
        candidates
            .into_iter()
            .filter(|candidate| candidate.item.last_instant() >= self.now)
            .collect()
    }
}
