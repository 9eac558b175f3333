//! Recurring-series deduplication.
//!
//! Collapses every occurrence of a recurring series down to its earliest
//! occurrence. Three kinds of key are used:
//! - items with an explicit series identifier are keyed by that identifier
//! - recurring items without one are keyed by (title, organizer, location),
//!   which catches the same meetup published independently by two sources
//! - everything else is keyed by its own identifier, so one-off items with
//!   coincidentally identical titles are never merged

use data_loader::ContentItem;
use std::collections::HashMap;
use tracing::debug;

/// Key under which content items are collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SeriesKey {
    Series(String),
    Composite {
        title: String,
        organizer: Option<String>,
        location: String,
    },
    Item(String),
}

/// Removes duplicate occurrences of recurring series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesDeduplicator {
    /// Merge recurring items without a series id by (title, organizer, location)
    composite_keys: bool,
}

impl SeriesDeduplicator {
    pub fn new() -> Self {
        Self {
            composite_keys: true,
        }
    }

    /// Enable or disable composite-key merging (default: enabled)
    pub fn with_composite_keys(mut self, enabled: bool) -> Self {
        self.composite_keys = enabled;
        self
    }

    /// Series key of a single item.
    pub fn key_for(&self, item: &ContentItem) -> SeriesKey {
        if let Some(series) = item.series_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return SeriesKey::Series(series.to_string());
        }
        if item.recurring && self.composite_keys {
            return SeriesKey::Composite {
                title: fold(&item.title),
                organizer: item.organizer_id.as_deref().map(fold),
                location: fold(&item.location),
            };
        }
        SeriesKey::Item(item.id.clone())
    }

    /// Collapse duplicates, keeping the earliest-starting item per key.
    ///
    /// ## Algorithm
    /// The survivor of a key occupies the slot of the key's first
    /// appearance, so the output keeps discovery order. On equal start
    /// times the item seen first wins. Running this twice gives the same
    /// result as running it once.
    pub fn dedup(&self, items: Vec<ContentItem>) -> Vec<ContentItem> {
        let input_len = items.len();
        let mut slots: Vec<ContentItem> = Vec::with_capacity(input_len);
        let mut positions: HashMap<SeriesKey, usize> = HashMap::new();

        for item in items {
            let key = self.key_for(&item);
            match positions.get(&key) {
                Some(&position) => {
                    if item.starts_at < slots[position].starts_at {
                        slots[position] = item;
                    }
                }
                None => {
                    positions.insert(key, slots.len());
                    slots.push(item);
                }
            }
        }

        debug!(
            "Series dedup: {} items in, {} items out",
            input_len,
            slots.len()
        );
        slots
    }
}

impl Default for SeriesDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn item(id: &str, title: &str, starts_at: DateTime<Utc>) -> ContentItem {
        let mut item = ContentItem::new(id, title, starts_at);
        item.location = "Lisbon".to_string();
        item
    }

    fn in_series(id: &str, series: &str, starts_at: DateTime<Utc>) -> ContentItem {
        let mut item = item(id, "Sunset hike", starts_at);
        item.series_id = Some(series.to_string());
        item
    }

    fn recurring(id: &str, title: &str, organizer: &str, starts_at: DateTime<Utc>) -> ContentItem {
        let mut item = item(id, title, starts_at);
        item.recurring = true;
        item.organizer_id = Some(organizer.to_string());
        item
    }

    #[test]
    fn test_series_keeps_earliest() {
        let items = vec![
            in_series("b", "S1", day(2025, 7, 1)),
            in_series("a", "S1", day(2025, 6, 1)),
        ];

        let deduped = SeriesDeduplicator::new().dedup(items);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].id, "a");
        assert_eq!(deduped[0].starts_at, day(2025, 6, 1));
    }

    #[test]
    fn test_distinct_series_survive() {
        let items = vec![
            in_series("a", "S1", day(2025, 6, 1)),
            in_series("b", "S2", day(2025, 6, 1)),
        ];

        assert_eq!(SeriesDeduplicator::new().dedup(items).len(), 2);
    }

    #[test]
    fn test_one_off_items_with_same_title_are_not_merged() {
        let mut a = item("a", "Walking tour", day(2025, 6, 1));
        a.organizer_id = Some("org-1".to_string());
        let mut b = item("b", "Walking tour", day(2025, 6, 2));
        b.organizer_id = Some("org-1".to_string());

        assert_eq!(SeriesDeduplicator::new().dedup(vec![a, b]).len(), 2);
    }

    #[test]
    fn test_recurring_with_different_organizers_survive() {
        let items = vec![
            recurring("a", "Language exchange", "org-1", day(2025, 6, 1)),
            recurring("b", "Language exchange", "org-2", day(2025, 6, 8)),
        ];

        assert_eq!(SeriesDeduplicator::new().dedup(items).len(), 2);
    }

    #[test]
    fn test_recurring_composite_key_merges() {
        let items = vec![
            recurring("later", "Language Exchange", "org-1", day(2025, 6, 8)),
            recurring("sooner", " language exchange", "org-1", day(2025, 6, 1)),
        ];

        let deduped = SeriesDeduplicator::new().dedup(items);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].id, "sooner");
    }

    #[test]
    fn test_composite_keys_can_be_disabled() {
        let items = vec![
            recurring("a", "Language exchange", "org-1", day(2025, 6, 1)),
            recurring("b", "Language exchange", "org-1", day(2025, 6, 8)),
        ];

        let deduped = SeriesDeduplicator::new().with_composite_keys(false).dedup(items);

        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_series_id_wins_over_composite_key() {
        let mut a = recurring("a", "Language exchange", "org-1", day(2025, 6, 1));
        a.series_id = Some("S1".to_string());
        let b = recurring("b", "Language exchange", "org-1", day(2025, 6, 8));

        assert_eq!(SeriesDeduplicator::new().dedup(vec![a, b]).len(), 2);
    }

    #[test]
    fn test_survivor_keeps_first_slot() {
        let items = vec![
            in_series("s-late", "S1", day(2025, 7, 1)),
            item("x", "Other", day(2025, 5, 1)),
            in_series("s-early", "S1", day(2025, 6, 1)),
        ];

        let ids: Vec<_> = SeriesDeduplicator::new()
            .dedup(items)
            .into_iter()
            .map(|i| i.id)
            .collect();

        assert_eq!(ids, vec!["s-early", "x"]);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let items = vec![
            in_series("a", "S1", day(2025, 7, 1)),
            in_series("b", "S1", day(2025, 6, 1)),
            recurring("c", "Meetup", "org", day(2025, 6, 3)),
            recurring("d", "meetup", "org", day(2025, 6, 2)),
            item("e", "Meetup", day(2025, 6, 1)),
        ];
        let dedup = SeriesDeduplicator::new();

        let once = dedup.dedup(items);
        let twice = dedup.dedup(once.clone());

        let ids = |items: &[ContentItem]| items.iter().map(|i| i.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&once), ids(&twice));
        assert_eq!(ids(&once), vec!["b", "d", "e"]);
    }
}
