//! Collaborator interfaces the ranking engine is backed by.
//!
//! The engine owns none of these stores. Every call may fail independently;
//! callers decide how a failure degrades (usually to an empty result).

use crate::error::Result;
use async_trait::async_trait;
use data_loader::{ContentItem, EntityRating, InteractionRecord, ItemId, Profile};
use std::collections::HashSet;

/// Search backend for events and recommendations.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Candidates published under a location string.
    async fn fetch_candidates_for_location(&self, location: &str) -> Result<Vec<ContentItem>>;
}

/// Read access to the profile store.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_viewer_profile(&self, id: &str) -> Result<Profile>;

    /// People the viewer may be shown in discovery mode.
    async fn fetch_candidate_pool(&self, viewer_id: &str) -> Result<Vec<Profile>>;

    /// Content the viewer has already joined or saved.
    async fn fetch_engaged_ids(&self, viewer_id: &str) -> Result<HashSet<ItemId>>;
}

/// Read/append access to the interaction store.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn fetch_interaction_history(&self, viewer_id: &str) -> Result<Vec<InteractionRecord>>;

    async fn append_interaction(&self, record: InteractionRecord) -> Result<()>;

    /// Every rating value recorded against an entity, across all viewers.
    async fn fetch_entity_ratings(&self, entity_id: &str) -> Result<Vec<u8>>;

    async fn persist_entity_rating(&self, entity_id: &str, rating: EntityRating) -> Result<()>;
}

/// Read access to the connections graph.
#[async_trait]
pub trait ConnectionGraph: Send + Sync {
    async fn fetch_mutual_connection_count(&self, viewer_id: &str, candidate_id: &str) -> Result<u32>;
}
