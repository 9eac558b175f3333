//! # Ranking Orchestrator
//!
//! This module coordinates the ranking engine end to end.
//!
//! People discovery:
//! 1. Fetch the viewer profile
//! 2. Fetch the candidate pool (failure yields an empty result)
//! 3. Apply boundary filters
//! 4. Score compatibility, distance and travel experience
//! 5. Sort under the selected policy, enriching the top of the list with
//!    mutual-connection counts when the policy needs them
//! 6. Return the top N
//!
//! Content:
//! 1. Fetch the viewer, their engaged ids and interaction history
//! 2. Aggregate content across every discovery location (the aggregator
//!    drops id-less and duplicate records)
//! 3. Optionally drop past content
//! 4. Score from interaction feedback
//! 5. Sort by the fixed content priority and return the top N
//!
//! Interaction recording validates and appends a record and, for ratings,
//! recomputes and persists the entity's rolling average. Once the append
//! succeeds the call succeeds; a failed recompute is only logged.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use data_loader::{EntityRating, InteractionKind, InteractionRecord, ItemId, Profile};
use pipeline::feedback::is_rating_record;
use pipeline::filters::{DuplicateIdFilter, ExcludeViewerFilter, MissingIdFilter, UpcomingFilter};
use pipeline::{
    CompatibilityScorer, ContentPriority, FeedbackScorer, Filter, FilterPipeline, RankedContent,
    RankedProfile, RankingPolicy, build_ranked_content, build_ranked_profiles,
    recompute_entity_rating, sort_profiles,
};
use sources::{
    ConnectionGraph, ContentSource, IndexStore, InteractionStore,
    MultiLocationAggregator, ProfileStore, SeriesDeduplicator, SourceError,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// Main orchestrator that coordinates the ranking engine.
#[derive(Clone)]
pub struct RankingOrchestrator {
    profiles: Arc<dyn ProfileStore>,
    interactions: Arc<dyn InteractionStore>,
    connections: Arc<dyn ConnectionGraph>,
    aggregator: MultiLocationAggregator,
    people_filters: Arc<FilterPipeline<Profile>>,
    compatibility: CompatibilityScorer,
    feedback: FeedbackScorer,
    priority: ContentPriority,
    config: EngineConfig,
    /// Fixed "now" for the upcoming filter; the wall clock when unset
    reference_time: Option<DateTime<Utc>>,
}

impl RankingOrchestrator {
    /// Create a new orchestrator over the given collaborators.
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        content: Arc<dyn ContentSource>,
        interactions: Arc<dyn InteractionStore>,
        connections: Arc<dyn ConnectionGraph>,
        config: EngineConfig,
    ) -> Self {
        let aggregator = MultiLocationAggregator::new(content).with_deduplicator(
            SeriesDeduplicator::new().with_composite_keys(config.composite_series_keys),
        );
        let people_filters = Arc::new(
            FilterPipeline::new()
                .add_filter(MissingIdFilter)
                .add_filter(DuplicateIdFilter)
                .add_filter(ExcludeViewerFilter),
        );

        Self {
            profiles,
            interactions,
            connections,
            aggregator,
            people_filters,
            compatibility: CompatibilityScorer::new(),
            feedback: FeedbackScorer::new(),
            priority: ContentPriority::new(config.member_content_first),
            config,
            reference_time: None,
        }
    }

    /// Orchestrator backed by a single in-memory store for every collaborator.
    pub fn from_store(store: Arc<IndexStore>, config: EngineConfig) -> Self {
        Self::new(store.clone(), store.clone(), store.clone(), store, config)
    }

    /// Pin the instant the upcoming filter compares against.
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank people for a viewer under `policy`.
    ///
    /// # Arguments
    /// * `viewer_id` - The viewer to rank for
    /// * `policy` - Sort order to apply
    /// * `limit` - Number of results; the configured default when `None`
    ///
    /// # Errors
    /// Only when the viewer cannot be loaded. Pool and enrichment failures
    /// degrade to fewer or zero-count results.
    pub async fn rank_people(
        &self,
        viewer_id: &str,
        policy: RankingPolicy,
        limit: Option<usize>,
    ) -> Result<Vec<RankedProfile>> {
        let start_time = Instant::now();
        let limit = limit.unwrap_or(self.config.default_limit);

        let viewer = self.fetch_viewer(viewer_id).await?;

        let pool = match self.profiles.fetch_candidate_pool(viewer_id).await {
            Ok(pool) => pool,
            Err(e) => {
                warn!("Candidate pool unavailable for viewer {}: {}", viewer_id, e);
                Vec::new()
            }
        };
        let pool_len = pool.len();

        let pool = self.people_filters.apply(pool, &viewer);
        info!(
            "Filtered people pool for viewer {}: {} -> {}",
            viewer_id,
            pool_len,
            pool.len()
        );

        let mut ranked = {
            let scorer = self.compatibility;
            let viewer = viewer.clone();
            tokio::task::spawn_blocking(move || build_ranked_profiles(&viewer, pool, &scorer))
                .await?
        };

        if policy.needs_enrichment() {
            // Pre-rank so the lookups are bounded to the head of the list
            sort_profiles(&mut ranked, RankingPolicy::Compatibility);
            ranked.truncate(self.config.enrichment_window_for(limit));
            self.enrich_mutual_connections(viewer_id, &mut ranked).await;
        }
        sort_profiles(&mut ranked, policy);
        ranked.truncate(limit);

        info!(
            "Ranked {} people for viewer {} by {} in {:.2?}",
            ranked.len(),
            viewer_id,
            policy,
            start_time.elapsed()
        );
        Ok(ranked)
    }

    /// Rank events and recommendations for a viewer.
    ///
    /// # Errors
    /// Only when the viewer cannot be loaded. Every other failure degrades
    /// to fewer results.
    pub async fn rank_content(
        &self,
        viewer_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<RankedContent>> {
        let start_time = Instant::now();
        let limit = limit.unwrap_or(self.config.default_limit);

        let viewer = self.fetch_viewer(viewer_id).await?;

        let (engaged, history) = tokio::join!(
            self.profiles.fetch_engaged_ids(viewer_id),
            self.interactions.fetch_interaction_history(viewer_id)
        );
        let engaged: HashSet<ItemId> = engaged.unwrap_or_else(|e| {
            warn!("Engaged ids unavailable for viewer {}: {}", viewer_id, e);
            HashSet::new()
        });
        let history: Vec<InteractionRecord> = history.unwrap_or_else(|e| {
            warn!("Interaction history unavailable for viewer {}: {}", viewer_id, e);
            Vec::new()
        });

        let mut candidates = self.aggregator.aggregate(&viewer, &engaged).await;
        if self.config.upcoming_only {
            let now = self.reference_time.unwrap_or_else(Utc::now);
            candidates = UpcomingFilter::new(now).apply(candidates, &viewer);
        }
        debug!("{} content candidates left after filtering", candidates.len());

        let mut ranked = {
            let scorer = self.feedback;
            let viewer = viewer.clone();
            tokio::task::spawn_blocking(move || {
                build_ranked_content(&viewer, candidates, &history, &scorer)
            })
            .await?
        };
        self.priority.sort(&mut ranked);
        ranked.truncate(limit);

        info!(
            "Ranked {} content items for viewer {} in {:.2?}",
            ranked.len(),
            viewer_id,
            start_time.elapsed()
        );
        Ok(ranked)
    }

    /// Validate and append an interaction record.
    ///
    /// For rating records, the entity's rolling average is recomputed over
    /// every rating it has received and persisted; the new value is returned.
    ///
    /// # Errors
    /// Only when validation or the append fails. After the append, a failure
    /// to read or persist the average is logged and yields `Ok(None)`; the
    /// next rating of the entity recomputes it from the full log.
    pub async fn record_interaction(
        &self,
        record: InteractionRecord,
    ) -> Result<Option<EntityRating>> {
        validate_interaction(&record)?;

        let viewer_id = record.viewer_id.clone();
        let entity_id = record.entity_id.clone();
        let is_rating = is_rating_record(&record);

        self.interactions
            .append_interaction(record)
            .await
            .map_err(|e| viewer_error(&viewer_id, e))?;
        debug!("Recorded interaction by {} on {}", viewer_id, entity_id);

        if !is_rating {
            return Ok(None);
        }

        let values = match self.interactions.fetch_entity_ratings(&entity_id).await {
            Ok(values) => values,
            Err(e) => {
                warn!("Rating on {} recorded, but its ratings could not be read: {}", entity_id, e);
                return Ok(None);
            }
        };
        let Some(rating) = recompute_entity_rating(&values) else {
            return Ok(None);
        };
        if let Err(e) = self
            .interactions
            .persist_entity_rating(&entity_id, rating)
            .await
        {
            warn!("Rating on {} recorded, but its average was not persisted: {}", entity_id, e);
            return Ok(None);
        }
        info!(
            "Entity {} rating is now {:.1} over {} ratings",
            entity_id, rating.average, rating.count
        );
        Ok(Some(rating))
    }

    async fn fetch_viewer(&self, viewer_id: &str) -> Result<Profile> {
        self.profiles
            .fetch_viewer_profile(viewer_id)
            .await
            .map_err(|e| viewer_error(viewer_id, e))
    }

    /// Fill in mutual-connection counts, one concurrent lookup per candidate.
    ///
    /// A failed lookup counts as zero and never fails the batch.
    async fn enrich_mutual_connections(&self, viewer_id: &str, ranked: &mut [RankedProfile]) {
        let start_time = Instant::now();

        let lookups = ranked.iter().map(|candidate| {
            self.connections
                .fetch_mutual_connection_count(viewer_id, &candidate.profile.id)
        });
        let results = join_all(lookups).await;

        let mut failed = 0usize;
        for (candidate, result) in ranked.iter_mut().zip(results) {
            let count = match result {
                Ok(count) => count,
                Err(e) => {
                    warn!(
                        "Mutual connection lookup failed for candidate {}: {}",
                        candidate.profile.id, e
                    );
                    failed += 1;
                    0
                }
            };
            candidate.mutual_connections = Some(count);
        }

        info!(
            "Enriched {} candidates with mutual connections ({} failed) in {:.2?}",
            ranked.len(),
            failed,
            start_time.elapsed()
        );
    }
}

fn viewer_error(viewer_id: &str, error: SourceError) -> EngineError {
    match error {
        SourceError::NotFound { .. } => EngineError::ViewerNotFound(viewer_id.to_string()),
        other => EngineError::Store(other),
    }
}

fn validate_interaction(record: &InteractionRecord) -> Result<()> {
    if record.viewer_id.trim().is_empty() {
        return Err(EngineError::InvalidInteraction("missing viewer id".to_string()));
    }
    if record.entity_id.trim().is_empty() {
        return Err(EngineError::InvalidInteraction("missing entity id".to_string()));
    }
    match (record.kind, record.rating) {
        (InteractionKind::Rating, Some(value)) if (1..=5).contains(&value) => Ok(()),
        (InteractionKind::Rating, Some(value)) => Err(EngineError::InvalidInteraction(format!(
            "rating {} is outside 1..=5",
            value
        ))),
        (InteractionKind::Rating, None) => Err(EngineError::InvalidInteraction(
            "rating record without a value".to_string(),
        )),
        (kind, Some(_)) => Err(EngineError::InvalidInteraction(format!(
            "{:?} record carries a rating value",
            kind
        ))),
        (_, None) => Ok(()),
    }
}
