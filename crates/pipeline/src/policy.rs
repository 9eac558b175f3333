//! Selectable ranking policies for people discovery.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordering applied to a people pool.
///
/// Every policy ends in a stable sort, so full ties keep pool order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Compatibility score, descending
    #[default]
    Compatibility,
    /// Location distance ascending, then compatibility descending
    ClosestNearby,
    /// Travel windows plus distinct countries, descending
    TravelExperience,
    /// Mutual connections descending, then compatibility descending
    MutualConnections,
    /// Last activity, most recent first
    Recent,
}

impl RankingPolicy {
    pub const ALL: [RankingPolicy; 5] = [
        RankingPolicy::Compatibility,
        RankingPolicy::ClosestNearby,
        RankingPolicy::TravelExperience,
        RankingPolicy::MutualConnections,
        RankingPolicy::Recent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingPolicy::Compatibility => "compatibility",
            RankingPolicy::ClosestNearby => "closest_nearby",
            RankingPolicy::TravelExperience => "travel_experience",
            RankingPolicy::MutualConnections => "mutual_connections",
            RankingPolicy::Recent => "recent",
        }
    }

    /// Whether ranking under this policy needs per-candidate connection lookups.
    pub fn needs_enrichment(&self) -> bool {
        matches!(self, RankingPolicy::MutualConnections)
    }
}

impl fmt::Display for RankingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match RankingPolicy::ALL
            .iter()
            .find(|policy| policy.as_str() == normalized)
        {
            Some(policy) => Ok(*policy),
            None => bail!(
                "unknown ranking policy '{}' (expected one of: compatibility, closest_nearby, travel_experience, mutual_connections, recent)",
                s
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!("compatibility".parse::<RankingPolicy>().unwrap(), RankingPolicy::Compatibility);
        assert_eq!("closest-nearby".parse::<RankingPolicy>().unwrap(), RankingPolicy::ClosestNearby);
        assert_eq!(" Mutual_Connections ".parse::<RankingPolicy>().unwrap(), RankingPolicy::MutualConnections);
        assert!("popularity".parse::<RankingPolicy>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for policy in RankingPolicy::ALL {
            assert_eq!(policy.to_string().parse::<RankingPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_default_and_enrichment() {
        assert_eq!(RankingPolicy::default(), RankingPolicy::Compatibility);
        assert!(RankingPolicy::MutualConnections.needs_enrichment());
        assert!(!RankingPolicy::Recent.needs_enrichment());
    }
}
