//! Scoring, filtering and ordering of ranking candidates.
//!
//! This crate provides:
//! - Location distance heuristic and pairwise compatibility scoring
//! - Interaction feedback scoring for content
//! - Filter trait, boundary filters and FilterPipeline for composing them
//! - Ranking policies and the deterministic sort orders
//!
//! ## Architecture
//! Candidates are processed in stages:
//! 1. Filters drop malformed or irrelevant records (missing id, duplicates,
//!    the viewer themself, past content)
//! 2. Scorers annotate the survivors (compatibility for people, feedback for content)
//! 3. The selected policy sorts the annotated list
//!
//! Everything here is synchronous and free of I/O; async enrichment lives
//! in the server crate.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::filters::*;
//! use pipeline::{CompatibilityScorer, FilterPipeline, RankingPolicy};
//!
//! let filters = FilterPipeline::new()
//!     .add_filter(MissingIdFilter)
//!     .add_filter(DuplicateIdFilter)
//!     .add_filter(ExcludeViewerFilter);
//!
//! let pool = filters.apply(pool, &viewer);
//! let mut ranked = build_ranked_profiles(&viewer, pool, &CompatibilityScorer::new());
//! sort_profiles(&mut ranked, RankingPolicy::ClosestNearby);
//! ```

pub mod compatibility;
pub mod feedback;
pub mod filter_pipeline;
pub mod filters;
pub mod location;
pub mod policy;
pub mod ranking;
pub mod traits;

// Re-export main types
pub use compatibility::{
    CompatibilityFacets, CompatibilityScore, CompatibilityScorer, CompatibilityTier,
};
pub use feedback::{FeedbackScorer, category_matches_interest, recompute_entity_rating};
pub use filter_pipeline::FilterPipeline;
pub use location::{current_location, distance};
pub use policy::RankingPolicy;
pub use ranking::{
    ContentPriority, RankedContent, RankedProfile, build_ranked_content, build_ranked_profiles,
    sort_content, sort_profiles, travel_experience,
};
pub use traits::Filter;
