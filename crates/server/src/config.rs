//! Engine configuration.
//!
//! Every value has a default and can be overridden from the environment:
//!
//! | Variable | Default |
//! |---|---|
//! | `TRAVEL_RANK_LIMIT` | 6 |
//! | `TRAVEL_RANK_ENRICHMENT_WINDOW` | the requested limit |
//! | `TRAVEL_RANK_COMPOSITE_SERIES_KEY` | true |
//! | `TRAVEL_RANK_MEMBER_CONTENT_FIRST` | true |
//! | `TRAVEL_RANK_UPCOMING_ONLY` | false |

use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub const DEFAULT_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Results returned when the caller does not ask for a size
    pub default_limit: usize,
    /// How many pre-ranked candidates get a mutual-connection lookup.
    /// `None` means exactly the requested limit.
    pub enrichment_window: Option<usize>,
    /// Merge recurring items without a series id by title, organizer and location
    pub composite_series_keys: bool,
    /// Member-created content outranks AI-generated content
    pub member_content_first: bool,
    /// Drop content that has already ended
    pub upcoming_only: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            enrichment_window: None,
            composite_series_keys: true,
            member_content_first: true,
            upcoming_only: false,
        }
    }
}

impl EngineConfig {
    /// Load from `TRAVEL_RANK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary key lookup. Unset keys fall back to the
    /// default; unparsable ones fall back with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let config = Self {
            default_limit: try_load(&lookup, "TRAVEL_RANK_LIMIT", defaults.default_limit),
            enrichment_window: try_load_optional(&lookup, "TRAVEL_RANK_ENRICHMENT_WINDOW"),
            composite_series_keys: try_load(
                &lookup,
                "TRAVEL_RANK_COMPOSITE_SERIES_KEY",
                defaults.composite_series_keys,
            ),
            member_content_first: try_load(
                &lookup,
                "TRAVEL_RANK_MEMBER_CONTENT_FIRST",
                defaults.member_content_first,
            ),
            upcoming_only: try_load(&lookup, "TRAVEL_RANK_UPCOMING_ONLY", defaults.upcoming_only),
        };
        if config.default_limit == 0 {
            warn!("TRAVEL_RANK_LIMIT must be positive, using default: {DEFAULT_LIMIT}");
            return Self {
                default_limit: DEFAULT_LIMIT,
                ..config
            };
        }
        config
    }

    /// Size of the enrichment batch for a request returning `limit` results.
    pub fn enrichment_window_for(&self, limit: usize) -> usize {
        self.enrichment_window.unwrap_or(limit).max(limit)
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default
        }),
    }
}

fn try_load_optional<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Invalid {key} value '{raw}': {e}, ignoring");
            None
        }
    }
}
