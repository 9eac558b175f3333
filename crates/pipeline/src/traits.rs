//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable boundary
//! filters to be applied to candidate pools of any record type.

use data_loader::Profile;

/// Core trait for filtering candidates.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared by concurrent requests
/// - Filters take ownership of the Vec and return the kept records
/// - Filtering never fails: a dropped record is simply not returned
pub trait Filter<T>: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `viewer` - The profile the candidates are being ranked for
    fn apply(&self, candidates: Vec<T>, viewer: &Profile) -> Vec<T>;
}
