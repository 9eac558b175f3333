//! DataIndex building and validation.
//!
//! This module builds the DataIndex from a dataset directory:
//! - Parse all dataset files in parallel
//! - Insert records into the primary and secondary indices
//! - Compute the rolling rating of every rated entity
//! - Validate references and rating ranges

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};

impl DataIndex {
    /// Load a dataset from a directory.
    ///
    /// Steps:
    /// 1. Parse profiles, content, interactions, connections and engagements
    /// 2. Build the indices
    /// 3. Compute entity ratings
    /// 4. Validate data integrity
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading dataset from {:?}", data_dir);

        let profiles_path = data_dir.join("profiles.json");
        let content_path = data_dir.join("content.json");
        let interactions_path = data_dir.join("interactions.json");
        let connections_path = data_dir.join("connections.json");
        let engagements_path = data_dir.join("engagements.json");

        // Nested joins give us parallel parsing of every file
        let ((profiles, content), (interactions, (connections, engagements))) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_profiles(&profiles_path),
                    || parser::parse_content(&content_path),
                )
            },
            || {
                rayon::join(
                    || parser::parse_interactions(&interactions_path),
                    || {
                        rayon::join(
                            || parser::parse_connections(&connections_path),
                            || parser::parse_engagements(&engagements_path),
                        )
                    },
                )
            },
        );

        let profiles = profiles?;
        let content = content?;
        let interactions = interactions?;
        let connections = connections?;
        let engagements = engagements?;

        info!(
            "Parsed {} profiles, {} content items, {} interactions, {} connections",
            profiles.len(),
            content.len(),
            interactions.len(),
            connections.len()
        );

        let mut index = DataIndex::new();

        for profile in profiles {
            index.insert_profile(profile);
        }
        for item in content {
            index.insert_content(item);
        }
        for record in interactions {
            index.insert_interaction(record);
        }
        for (a, b) in connections {
            index.insert_connection(&a, &b);
        }
        for (viewer_id, item_ids) in engagements {
            for item_id in item_ids {
                index.insert_engagement(&viewer_id, &item_id);
            }
        }

        index.compute_entity_ratings();
        index.validate()?;

        debug!("DataIndex built and validated");
        Ok(index)
    }

    /// Compute the rolling rating of every entity with at least one rating.
    pub fn compute_entity_ratings(&mut self) {
        self.entity_ratings = self
            .entity_rating_log
            .par_iter()
            .filter_map(|(entity_id, values)| {
                EntityRating::from_values(values).map(|rating| (entity_id.clone(), rating))
            })
            .collect();
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - every interaction and engagement belongs to a known viewer
    /// - every connection endpoint is a known profile
    /// - rating records carry a value in 1..=5
    pub fn validate(&self) -> Result<()> {
        for (viewer_id, records) in &self.viewer_interactions {
            if !self.profiles.contains_key(viewer_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "Profile".to_string(),
                    id: viewer_id.clone(),
                });
            }
            for record in records {
                if record.kind == InteractionKind::Rating {
                    match record.rating {
                        Some(value) if (1..=5).contains(&value) => {}
                        other => {
                            return Err(DataLoadError::InvalidValue {
                                field: "rating".to_string(),
                                value: format!("{:?}", other),
                            });
                        }
                    }
                }
            }
        }

        for profile_id in self.connections.keys().chain(self.engagements.keys()) {
            if !self.profiles.contains_key(profile_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "Profile".to_string(),
                    id: profile_id.clone(),
                });
            }
        }
        Ok(())
    }
}
