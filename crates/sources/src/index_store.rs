//! `DataIndex`-backed implementation of every collaborator interface.
//!
//! Used by the CLI and by end-to-end tests. Specific locations can be told
//! to fail so the partial-failure paths can be exercised against real data.

use crate::error::{Result, SourceError};
use crate::traits::{ConnectionGraph, ContentSource, InteractionStore, ProfileStore};
use async_trait::async_trait;
use data_loader::{ContentItem, DataIndex, EntityRating, InteractionRecord, ItemId, Profile};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared, lockable view over a `DataIndex`.
#[derive(Clone)]
pub struct IndexStore {
    index: Arc<RwLock<DataIndex>>,
    /// Lower-cased location strings whose content fetch always fails
    failing_locations: HashSet<String>,
}

impl IndexStore {
    pub fn new(index: DataIndex) -> Self {
        Self::from_shared(Arc::new(RwLock::new(index)))
    }

    pub fn from_shared(index: Arc<RwLock<DataIndex>>) -> Self {
        Self {
            index,
            failing_locations: HashSet::new(),
        }
    }

    /// Make content fetches for a location fail (case-insensitive).
    pub fn with_failing_location(mut self, location: &str) -> Self {
        self.failing_locations.insert(location.trim().to_lowercase());
        self
    }

    /// The underlying index, for read-only reporting.
    pub fn shared_index(&self) -> Arc<RwLock<DataIndex>> {
        self.index.clone()
    }
}

#[async_trait]
impl ContentSource for IndexStore {
    async fn fetch_candidates_for_location(&self, location: &str) -> Result<Vec<ContentItem>> {
        if self.failing_locations.contains(&location.trim().to_lowercase()) {
            return Err(SourceError::Unavailable(format!(
                "content search failed for {}",
                location
            )));
        }
        let index = self.index.read().await;
        Ok(index
            .content_at_location(location)
            .into_iter()
            .map(|item| {
                let mut item = item.clone();
                // The persisted rolling average supersedes the declared rating
                if let Some(rating) = index.get_entity_rating(&item.id) {
                    item.rating = Some(rating.average);
                }
                item
            })
            .collect())
    }
}

#[async_trait]
impl ProfileStore for IndexStore {
    async fn fetch_viewer_profile(&self, id: &str) -> Result<Profile> {
        let index = self.index.read().await;
        index
            .get_profile(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                entity: "Profile",
                id: id.to_string(),
            })
    }

    /// Every known profile; removing the viewer is the caller's job.
    async fn fetch_candidate_pool(&self, _viewer_id: &str) -> Result<Vec<Profile>> {
        let index = self.index.read().await;
        Ok(index.profiles().cloned().collect())
    }

    async fn fetch_engaged_ids(&self, viewer_id: &str) -> Result<HashSet<ItemId>> {
        let index = self.index.read().await;
        Ok(index.engaged_ids(viewer_id))
    }
}

#[async_trait]
impl InteractionStore for IndexStore {
    async fn fetch_interaction_history(&self, viewer_id: &str) -> Result<Vec<InteractionRecord>> {
        let index = self.index.read().await;
        Ok(index.get_viewer_interactions(viewer_id).to_vec())
    }

    async fn append_interaction(&self, record: InteractionRecord) -> Result<()> {
        let mut index = self.index.write().await;
        if index.get_profile(&record.viewer_id).is_none() {
            return Err(SourceError::NotFound {
                entity: "Profile",
                id: record.viewer_id,
            });
        }
        debug!(
            "Appending {:?} interaction by {} on {}",
            record.kind, record.viewer_id, record.entity_id
        );
        index.insert_interaction(record);
        Ok(())
    }

    async fn fetch_entity_ratings(&self, entity_id: &str) -> Result<Vec<u8>> {
        let index = self.index.read().await;
        Ok(index.get_entity_rating_log(entity_id).to_vec())
    }

    async fn persist_entity_rating(&self, entity_id: &str, rating: EntityRating) -> Result<()> {
        let mut index = self.index.write().await;
        index.set_entity_rating(entity_id, rating);
        Ok(())
    }
}

#[async_trait]
impl ConnectionGraph for IndexStore {
    async fn fetch_mutual_connection_count(&self, viewer_id: &str, candidate_id: &str) -> Result<u32> {
        let index = self.index.read().await;
        Ok(index.mutual_connection_count(viewer_id, candidate_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use data_loader::InteractionKind;

    fn store() -> IndexStore {
        let mut index = DataIndex::new();
        index.insert_profile(Profile::new("ana"));
        index.insert_profile(Profile::new("bo"));
        let mut item = ContentItem::new("e1", "Fado", Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap());
        item.location = "Lisbon".to_string();
        index.insert_content(item);
        index.insert_engagement("ana", "e1");
        IndexStore::new(index)
    }

    #[tokio::test]
    async fn test_content_by_location() {
        let store = store();
        assert_eq!(store.fetch_candidates_for_location("lisbon").await.unwrap().len(), 1);
        assert!(store.fetch_candidates_for_location("Rome").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_location() {
        let store = store().with_failing_location("Lisbon");
        assert!(store.fetch_candidates_for_location("LISBON").await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_viewer() {
        let result = store().fetch_viewer_profile("ghost").await;
        assert!(matches!(result, Err(SourceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_append_and_read_back_ratings() {
        let store = store();
        let record = InteractionRecord::new("bo", "e1", InteractionKind::Rating, Utc::now()).with_rating(4);

        store.append_interaction(record).await.unwrap();

        assert_eq!(store.fetch_entity_ratings("e1").await.unwrap(), vec![4]);
        assert_eq!(store.fetch_interaction_history("bo").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_persisted_rating_overrides_declared() {
        let store = store();
        assert_eq!(store.fetch_candidates_for_location("Lisbon").await.unwrap()[0].rating, None);

        store
            .persist_entity_rating("e1", EntityRating { average: 1.5, count: 2 })
            .await
            .unwrap();

        let items = store.fetch_candidates_for_location("Lisbon").await.unwrap();
        assert_eq!(items[0].rating, Some(1.5));
    }

    #[tokio::test]
    async fn test_append_fills_category_from_content() {
        let store = store();
        {
            let index = store.shared_index();
            let mut index = index.write().await;
            let mut item = ContentItem::new("e2", "Market", Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());
            item.category = "Food".to_string();
            index.insert_content(item);
        }

        store
            .append_interaction(InteractionRecord::new("ana", "e2", InteractionKind::Like, Utc::now()))
            .await
            .unwrap();
        store
            .append_interaction(InteractionRecord::new("ana", "ghost", InteractionKind::Like, Utc::now()))
            .await
            .unwrap();

        let history = store.fetch_interaction_history("ana").await.unwrap();
        assert_eq!(history[0].category.as_deref(), Some("Food"));
        assert_eq!(history[1].category, None);
    }

    #[tokio::test]
    async fn test_engaged_ids() {
        let engaged = store().fetch_engaged_ids("ana").await.unwrap();
        assert!(engaged.contains("e1"));
    }
}
