//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the FilterPipeline struct that chains filters
//! together using the builder pattern.

use crate::traits::Filter;
use data_loader::Profile;
use tracing;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(MissingIdFilter)
///     .add_filter(DuplicateIdFilter)
///     .add_filter(ExcludeViewerFilter);
///
/// let kept = pipeline.apply(pool, &viewer);
/// ```
pub struct FilterPipeline<T> {
    filters: Vec<Box<dyn Filter<T>>>,
}

impl<T> FilterPipeline<T> {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter<T> + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the configured filters, in order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// ## Algorithm
    /// 1. Start with the input candidates
    /// 2. For each filter in order, log the input count, apply it and
    ///    log the output count
    /// 3. Return the final set
    pub fn apply(&self, candidates: Vec<T>, viewer: &Profile) -> Vec<T> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, viewer);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

impl<T> Default for FilterPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}
