//! Filter to enforce identifier uniqueness in a candidate pool.

use crate::traits::Filter;
use data_loader::{Identified, Profile};
use std::collections::HashSet;

/// Keeps the first candidate per identifier.
///
/// ## Algorithm
/// Uses a HashSet of seen identifiers; later duplicates are dropped, so
/// the pool order of the survivors is unchanged.
pub struct DuplicateIdFilter;

impl<T: Identified> Filter<T> for DuplicateIdFilter {
    fn name(&self) -> &str {
        "DuplicateIdFilter"
    }

    fn apply(&self, candidates: Vec<T>, _viewer: &Profile) -> Vec<T> {
        let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
        candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.id().to_string()))
            .collect()
    }
}
