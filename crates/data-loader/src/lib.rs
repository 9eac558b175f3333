//! # Data Loader Crate
//!
//! Domain records for the travel ranking engine and an in-memory index that
//! can be loaded from a JSON dataset directory.
//!
//! ## Main Components
//!
//! - **types**: Profiles, content items, interactions, `DataIndex`
//! - **parser**: Deserialize the dataset files
//! - **index**: Build and validate the `DataIndex`
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/sample"))?;
//! let viewer = index.get_profile("ana").unwrap();
//! let events = index.content_at_location("Lisbon");
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{DataLoadError, Result};
pub use types::{
    // Identifiers
    Identified,
    ItemId,
    ProfileId,
    // Records
    ContentItem,
    DataIndex,
    EntityRating,
    InteractionKind,
    InteractionRecord,
    Location,
    Profile,
    TravelWindow,
    UserType,
};
