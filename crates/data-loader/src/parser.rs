//! Parser for the JSON dataset files.
//!
//! A dataset directory contains:
//! - profiles.json: array of `Profile`
//! - content.json: array of `ContentItem`
//! - interactions.json: array of `InteractionRecord`
//! - connections.json: array of `[profile_id, profile_id]` pairs
//! - engagements.json (optional): object mapping viewer id to joined item ids

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read and deserialize one JSON file.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|e| DataLoadError::ParseError {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Parse the profiles.json file
pub fn parse_profiles(path: &Path) -> Result<Vec<Profile>> {
    read_json(path)
}

/// Parse the content.json file
pub fn parse_content(path: &Path) -> Result<Vec<ContentItem>> {
    read_json(path)
}

/// Parse the interactions.json file
pub fn parse_interactions(path: &Path) -> Result<Vec<InteractionRecord>> {
    read_json(path)
}

/// Parse the connections.json file
pub fn parse_connections(path: &Path) -> Result<Vec<(ProfileId, ProfileId)>> {
    read_json(path)
}

/// Parse the optional engagements.json file.
///
/// A missing file means nobody has joined anything yet.
pub fn parse_engagements(path: &Path) -> Result<HashMap<ProfileId, Vec<ItemId>>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    read_json(path)
}
