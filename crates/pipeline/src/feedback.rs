//! Interaction feedback scoring for content candidates.
//!
//! Adjusts a content item's declared rating with the viewer's history:
//! - start from the declared rating (3 when absent)
//! - +1 when the category matches any of the viewer's interests
//! - +0.5 per earlier like of another item in the same category
//! - clamp to [0, 5]

use data_loader::{ContentItem, EntityRating, InteractionKind, InteractionRecord};
use sources::signals::normalize_token;

pub const DEFAULT_RATING: f64 = 3.0;
pub const INTEREST_MATCH_BONUS: f64 = 1.0;
pub const LIKE_BONUS: f64 = 0.5;
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 5.0;

/// Substring match in either direction, case-insensitive.
///
/// Blank values never match.
pub fn category_matches_interest(category: &str, interest: &str) -> bool {
    match (normalize_token(Some(category)), normalize_token(Some(interest))) {
        (Some(category), Some(interest)) => {
            category.contains(&interest) || interest.contains(&category)
        }
        _ => false,
    }
}

/// Scores content items from the viewer's interaction history.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackScorer;

impl FeedbackScorer {
    pub fn new() -> Self {
        Self
    }

    /// Adjusted score of `item` for a viewer.
    ///
    /// # Arguments
    /// * `item` - The candidate being scored
    /// * `interests` - The viewer's interest tokens
    /// * `history` - The viewer's interaction records
    pub fn score(&self, item: &ContentItem, interests: &[String], history: &[InteractionRecord]) -> f64 {
        let mut score = item
            .rating
            .filter(|rating| rating.is_finite())
            .unwrap_or(DEFAULT_RATING);

        if interests
            .iter()
            .any(|interest| category_matches_interest(&item.category, interest))
        {
            score += INTEREST_MATCH_BONUS;
        }

        let category = normalize_token(Some(item.category.as_str()));
        if let Some(category) = category {
            let likes = history
                .iter()
                .filter(|record| record.kind == InteractionKind::Like)
                .filter(|record| record.entity_id != item.id)
                .filter(|record| {
                    normalize_token(record.category.as_deref()).as_deref() == Some(category.as_str())
                })
                .count();
            score += LIKE_BONUS * likes as f64;
        }

        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}

/// Recompute an entity's rolling rating from all of its rating values.
///
/// Returns `None` when nothing has been rated yet.
pub fn recompute_entity_rating(values: &[u8]) -> Option<EntityRating> {
    EntityRating::from_values(values)
}

/// True for records that feed the rolling entity rating.
pub fn is_rating_record(record: &InteractionRecord) -> bool {
    record.kind == InteractionKind::Rating
}
