//! Multi-location aggregation of content candidates.
//!
//! Fans one content search out per discovery location, merges what comes
//! back and collapses duplicates.
//!
//! ## Algorithm
//! 1. Derive the viewer's discovery locations
//! 2. Fetch every location concurrently; a failed location contributes
//!    nothing and is logged
//! 3. Concatenate successful results in discovery-location order
//! 4. Drop records without an identifier
//! 5. Remove exact duplicates by identifier (first occurrence wins)
//! 6. Collapse recurring series
//! 7. Mark the candidates the viewer is already engaged with

use crate::dedup::SeriesDeduplicator;
use crate::discovery::{DiscoveryLocation, discovery_locations};
use crate::traits::ContentSource;
use data_loader::{ContentItem, Identified, ItemId, Profile};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A merged content candidate, annotated for ranking.
#[derive(Debug, Clone)]
pub struct ContentCandidate {
    pub item: ContentItem,
    /// The viewer has already joined or saved this item
    pub is_engaged: bool,
    /// Label of the discovery location the item was first found under
    pub found_at: String,
}

impl Identified for ContentCandidate {
    fn id(&self) -> &str {
        &self.item.id
    }
}

/// Aggregates content from every discovery location of a viewer.
#[derive(Clone)]
pub struct MultiLocationAggregator {
    source: Arc<dyn ContentSource>,
    dedup: SeriesDeduplicator,
}

impl MultiLocationAggregator {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            dedup: SeriesDeduplicator::new(),
        }
    }

    /// Configure the series deduplicator (default: composite keys enabled)
    pub fn with_deduplicator(mut self, dedup: SeriesDeduplicator) -> Self {
        self.dedup = dedup;
        self
    }

    /// Gather, merge and annotate content for a viewer.
    ///
    /// Never fails: if every location fails the result is empty. Dropping
    /// the returned future cancels all in-flight fetches.
    #[instrument(skip(self, viewer, engaged), fields(viewer_id = %viewer.id))]
    pub async fn aggregate(
        &self,
        viewer: &Profile,
        engaged: &HashSet<ItemId>,
    ) -> Vec<ContentCandidate> {
        let locations = discovery_locations(viewer);
        debug!("Fetching content for {} discovery locations", locations.len());

        let fetched = self.fetch_all(&locations).await;

        // Concatenate, remembering where each id was first found
        let mut found_at: HashMap<ItemId, String> = HashMap::new();
        let mut merged: Vec<ContentItem> = Vec::new();
        let mut rejected = 0usize;
        for (location, items) in locations.iter().zip(fetched) {
            for item in items {
                if !item.has_identifier() {
                    rejected += 1;
                    continue;
                }
                if found_at.contains_key(&item.id) {
                    continue;
                }
                found_at.insert(item.id.clone(), location.label.clone());
                merged.push(item);
            }
        }
        if rejected > 0 {
            warn!("Dropped {} content records without an identifier", rejected);
        }

        let unique = merged.len();
        let deduped = self.dedup.dedup(merged);

        let candidates: Vec<ContentCandidate> = deduped
            .into_iter()
            .map(|item| {
                let found_at = found_at.remove(&item.id).unwrap_or_default();
                ContentCandidate {
                    is_engaged: engaged.contains(&item.id),
                    item,
                    found_at,
                }
            })
            .collect();

        info!(
            "Aggregated content: locations={}, unique={}, after_series_dedup={}",
            locations.len(),
            unique,
            candidates.len()
        );
        candidates
    }

    /// Fetch every location concurrently.
    ///
    /// Results come back in location order whatever order the fetches
    /// complete in; a failed fetch yields an empty list.
    async fn fetch_all(&self, locations: &[DiscoveryLocation]) -> Vec<Vec<ContentItem>> {
        let fetches = locations.iter().map(|location| async move {
            match self
                .source
                .fetch_candidates_for_location(&location.location)
                .await
            {
                Ok(items) => {
                    debug!(
                        "Location '{}' ({}) returned {} items",
                        location.location,
                        location.label,
                        items.len()
                    );
                    items
                }
                Err(e) => {
                    warn!(
                        "Content fetch failed for location '{}' ({}): {}",
                        location.location, location.label, e
                    );
                    Vec::new()
                }
            }
        });

        join_all(fetches).await
    }
}
