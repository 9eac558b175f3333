//! Filter to remove the viewer from their own discovery pool.

use crate::traits::Filter;
use data_loader::Profile;

/// Removes the viewer's own profile from a people pool.
pub struct ExcludeViewerFilter;

impl Filter<Profile> for ExcludeViewerFilter {
    fn name(&self) -> &str {
        "ExcludeViewerFilter"
    }

    fn apply(&self, candidates: Vec<Profile>, viewer: &Profile) -> Vec<Profile> {
        candidates
            .into_iter()
            .filter(|candidate| candidate.id != viewer.id)
            .collect()
    }
}
