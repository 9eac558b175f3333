//! # Sources Crate
//!
//! Candidate sources for the travel ranking engine.
//!
//! ## Components
//!
//! ### Collaborator interfaces
//! Async traits for the stores the engine reads from and writes to:
//! content search, profiles, interactions and the connections graph.
//!
//! ### Signals
//! Normalized interest/activity/style/age/location signals per profile.
//!
//! ### Multi-location aggregation
//! Content is searched at home, on the current trip and on every planned
//! trip concurrently; results are merged, recurring series are collapsed
//! and engaged items are flagged.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{IndexStore, MultiLocationAggregator, ProfileStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(IndexStore::new(index));
//! let viewer = store.fetch_viewer_profile("ana").await?;
//! let engaged = store.fetch_engaged_ids("ana").await?;
//!
//! let aggregator = MultiLocationAggregator::new(store.clone());
//! let candidates = aggregator.aggregate(&viewer, &engaged).await;
//! ```

pub mod aggregator;
pub mod dedup;
pub mod discovery;
pub mod error;
pub mod index_store;
pub mod signals;
pub mod traits;

pub use aggregator::{ContentCandidate, MultiLocationAggregator};
pub use dedup::{SeriesDeduplicator, SeriesKey};
pub use discovery::{DiscoveryKind, DiscoveryLocation, discovery_locations};
pub use error::SourceError;
pub use index_store::IndexStore;
pub use signals::{ContentSignals, SignalSet, extract_content_signals, extract_signals};
pub use traits::{ConnectionGraph, ContentSource, InteractionStore, ProfileStore};
