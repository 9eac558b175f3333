//! Core domain types for the travel ranking engine.
//!
//! This module defines the read-only snapshots the ranking engine consumes:
//! - Profiles (the viewer and every person-candidate)
//! - Content items (events and recommendations)
//! - Interaction records and the rolling entity rating
//! - The in-memory `DataIndex` that backs the default stores

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a member profile.
pub type ProfileId = String;

/// Identifier of a content item (event or recommendation).
pub type ItemId = String;

/// Anything that carries a record identifier.
///
/// Records without an identifier are malformed and get dropped at the
/// boundary before scoring.
pub trait Identified {
    fn id(&self) -> &str;

    fn has_identifier(&self) -> bool {
        !self.id().trim().is_empty()
    }
}

// =============================================================================
// Profile-related Types
// =============================================================================

/// A coarse location tuple. Any level may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Location {
    pub fn new(city: Option<&str>, region: Option<&str>, country: Option<&str>) -> Self {
        Self {
            city: city.map(str::to_string),
            region: region.map(str::to_string),
            country: country.map(str::to_string),
        }
    }

    /// A location that only knows its city.
    pub fn city(city: &str) -> Self {
        Self::new(Some(city), None, None)
    }

    /// The string used to query content for this location: the most
    /// specific non-blank level (city, then region, then country).
    pub fn search_key(&self) -> Option<&str> {
        [&self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|level| level.as_deref())
            .map(str::trim)
            .find(|level| !level.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.search_key().is_none()
    }
}

/// One trip on a member's travel plan.
///
/// Dates are whole days; a missing end date means the trip is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelWindow {
    pub destination: Location,
    pub start: NaiveDate,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    /// True while the member is currently on this trip
    #[serde(default)]
    pub is_active: bool,
}

impl TravelWindow {
    pub fn new(destination: Location, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            destination,
            start,
            end,
            is_active: false,
        }
    }

    pub fn active(mut self) -> Self {
        self.is_active = true;
        self
    }

    /// Inclusive interval intersection; open-ended windows extend forever.
    pub fn overlaps(&self, other: &TravelWindow) -> bool {
        let self_end = self.end.unwrap_or(NaiveDate::MAX);
        let other_end = other.end.unwrap_or(NaiveDate::MAX);
        self.start <= other_end && other.start <= self_end
    }
}

/// Account type used by the user-type compatibility table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Traveler,
    Local,
    Business,
}

/// A member profile snapshot. Owned and mutated by the external profile store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: ProfileId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub travel_style: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub user_type: Option<UserType>,
    #[serde(default)]
    pub home: Location,
    #[serde(default)]
    pub travel_windows: Vec<TravelWindow>,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new(id: impl Into<ProfileId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// The trip the member is on right now, if any.
    pub fn active_trip(&self) -> Option<&TravelWindow> {
        self.travel_windows.iter().find(|window| window.is_active)
    }

    /// Trips that are planned but not currently underway.
    pub fn planned_trips(&self) -> impl Iterator<Item = &TravelWindow> {
        self.travel_windows.iter().filter(|window| !window.is_active)
    }
}

impl Identified for Profile {
    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// Content-related Types
// =============================================================================

/// An event or recommendation surfaced in content mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default)]
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    /// Location string the item was published under (usually a city)
    #[serde(default)]
    pub location: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Shared identifier of a recurring series
    #[serde(default)]
    pub series_id: Option<String>,
    /// Recurring meetup without a shared series identifier
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub organizer_id: Option<ProfileId>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Generated by the recommendation assistant rather than a member
    #[serde(default)]
    pub ai_generated: bool,
    /// Declared rating (0-5), if the source publishes one
    #[serde(default)]
    pub rating: Option<f64>,
}

impl ContentItem {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, starts_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: String::new(),
            location: String::new(),
            starts_at,
            ends_at: None,
            series_id: None,
            recurring: false,
            organizer_id: None,
            tags: Vec::new(),
            ai_generated: false,
            rating: None,
        }
    }

    /// Latest instant the item is still relevant.
    pub fn last_instant(&self) -> DateTime<Utc> {
        self.ends_at.unwrap_or(self.starts_at)
    }
}

impl Identified for ContentItem {
    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// Interaction Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Like,
    Save,
    Visited,
    Rating,
}

/// A viewer's reaction to a content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub viewer_id: ProfileId,
    pub entity_id: ItemId,
    pub kind: InteractionKind,
    /// Star value (1-5), only present on rating records
    #[serde(default)]
    pub rating: Option<u8>,
    /// Category of the entity when the interaction happened
    #[serde(default)]
    pub category: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn new(
        viewer_id: impl Into<ProfileId>,
        entity_id: impl Into<ItemId>,
        kind: InteractionKind,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            viewer_id: viewer_id.into(),
            entity_id: entity_id.into(),
            kind,
            rating: None,
            category: None,
            timestamp,
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Persisted rolling average over all rating records for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityRating {
    /// Mean rating rounded to one decimal place
    pub average: f64,
    pub count: usize,
}

impl EntityRating {
    /// Arithmetic mean of all rating values, rounded to one decimal place.
    ///
    /// Returns `None` when nothing has been rated yet.
    pub fn from_values(values: &[u8]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let total: f64 = values.iter().map(|&v| f64::from(v)).sum();
        let mean = total / values.len() as f64;
        Some(Self {
            average: (mean * 10.0).round() / 10.0,
            count: values.len(),
        })
    }
}

// =============================================================================
// DataIndex - In-memory snapshot of the stores
// =============================================================================

/// Holds every record the default stores serve.
///
/// Profiles are kept in a `BTreeMap` so the candidate pool comes out in a
/// stable order, which the ranking relies on for its final tie-break.
#[derive(Debug)]
pub struct DataIndex {
    pub(crate) profiles: BTreeMap<ProfileId, Profile>,
    pub(crate) content: HashMap<ItemId, ContentItem>,

    /// Interaction history per viewer, in append order
    pub(crate) viewer_interactions: HashMap<ProfileId, Vec<InteractionRecord>>,
    /// Every rating value ever recorded against an entity
    pub(crate) entity_rating_log: HashMap<ItemId, Vec<u8>>,
    /// Last persisted average per entity
    pub(crate) entity_ratings: HashMap<ItemId, EntityRating>,

    /// Content ids grouped by lower-cased location string, in insertion order
    pub(crate) location_index: HashMap<String, Vec<ItemId>>,
    /// Symmetric connection graph
    pub(crate) connections: HashMap<ProfileId, HashSet<ProfileId>>,
    /// Content each viewer has joined or saved
    pub(crate) engagements: HashMap<ProfileId, HashSet<ItemId>>,
}

impl DataIndex {
    pub fn new() -> Self {
        Self {
            profiles: BTreeMap::new(),
            content: HashMap::new(),
            viewer_interactions: HashMap::new(),
            entity_rating_log: HashMap::new(),
            entity_ratings: HashMap::new(),
            location_index: HashMap::new(),
            connections: HashMap::new(),
            engagements: HashMap::new(),
        }
    }

    // Getters

    pub fn get_profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    /// All profiles, ordered by identifier.
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    pub fn get_content(&self, id: &str) -> Option<&ContentItem> {
        self.content.get(id)
    }

    /// Content published under a location string (case-insensitive).
    pub fn content_at_location(&self, location: &str) -> Vec<&ContentItem> {
        self.location_index
            .get(&normalize_location(location))
            .map(|ids| ids.iter().filter_map(|id| self.content.get(id)).collect())
            .unwrap_or_default()
    }

    /// Interaction history of a viewer, oldest first.
    pub fn get_viewer_interactions(&self, viewer_id: &str) -> &[InteractionRecord] {
        self.viewer_interactions
            .get(viewer_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every rating value recorded against an entity.
    pub fn get_entity_rating_log(&self, entity_id: &str) -> &[u8] {
        self.entity_rating_log
            .get(entity_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_entity_rating(&self, entity_id: &str) -> Option<&EntityRating> {
        self.entity_ratings.get(entity_id)
    }

    pub fn engaged_ids(&self, viewer_id: &str) -> HashSet<ItemId> {
        self.engagements.get(viewer_id).cloned().unwrap_or_default()
    }

    pub fn connections_of(&self, profile_id: &str) -> Option<&HashSet<ProfileId>> {
        self.connections.get(profile_id)
    }

    /// Number of members connected to both profiles.
    pub fn mutual_connection_count(&self, a: &str, b: &str) -> u32 {
        match (self.connections.get(a), self.connections.get(b)) {
            (Some(left), Some(right)) => left.intersection(right).count() as u32,
            _ => 0,
        }
    }

    // Mutators

    pub fn insert_profile(&mut self, profile: Profile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    /// Insert a content item and index it under its location string.
    ///
    /// Re-inserting an id moves it out of its previous location's list.
    pub fn insert_content(&mut self, item: ContentItem) {
        let key = normalize_location(&item.location);
        if let Some(previous) = self.content.get(&item.id) {
            let previous_key = normalize_location(&previous.location);
            if previous_key != key {
                if let Some(ids) = self.location_index.get_mut(&previous_key) {
                    ids.retain(|id| id != &item.id);
                    if ids.is_empty() {
                        self.location_index.remove(&previous_key);
                    }
                }
            }
        }
        let ids = self.location_index.entry(key).or_default();
        if !ids.contains(&item.id) {
            ids.push(item.id.clone());
        }
        self.content.insert(item.id.clone(), item);
    }

    /// Append an interaction and update the rating log for rating records.
    ///
    /// A record without a category snapshot takes the category of the
    /// indexed content item it refers to.
    pub fn insert_interaction(&mut self, mut record: InteractionRecord) {
        if record.category.is_none() {
            record.category = self
                .content
                .get(&record.entity_id)
                .map(|item| item.category.trim())
                .filter(|category| !category.is_empty())
                .map(str::to_string);
        }
        if let (InteractionKind::Rating, Some(value)) = (record.kind, record.rating) {
            self.entity_rating_log
                .entry(record.entity_id.clone())
                .or_default()
                .push(value);
        }
        self.viewer_interactions
            .entry(record.viewer_id.clone())
            .or_default()
            .push(record);
    }

    /// Connect two members (both directions).
    pub fn insert_connection(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.connections
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.connections
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    pub fn insert_engagement(&mut self, viewer_id: &str, item_id: &str) {
        self.engagements
            .entry(viewer_id.to_string())
            .or_default()
            .insert(item_id.to_string());
    }

    pub fn set_entity_rating(&mut self, entity_id: &str, rating: EntityRating) {
        self.entity_ratings.insert(entity_id.to_string(), rating);
    }

    /// (profiles, content items, interaction records)
    pub fn counts(&self) -> (usize, usize, usize) {
        let interactions = self.viewer_interactions.values().map(|v| v.len()).sum();
        (self.profiles.len(), self.content.len(), interactions)
    }
}

impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn normalize_location(location: &str) -> String {
    location.trim().to_lowercase()
}
