//! Filter implementations for the candidate pipeline.
//!
//! This module contains the boundary filters that can be composed into a
//! FilterPipeline before anything is scored.

pub mod duplicate_id;
pub mod exclude_viewer;
pub mod missing_id;
pub mod upcoming;

// Re-export for convenience
pub use duplicate_id::DuplicateIdFilter;
pub use exclude_viewer::ExcludeViewerFilter;
pub use missing_id::MissingIdFilter;
pub use upcoming::UpcomingFilter;
