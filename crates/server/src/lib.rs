//! Server crate for the travel ranking engine.
//!
//! This crate contains the orchestrator that coordinates every component
//! of the ranking engine, plus its configuration and error types.
//!
//! ## Example Usage
//! ```ignore
//! use server::{EngineConfig, RankingOrchestrator};
//! use pipeline::RankingPolicy;
//!
//! let store = Arc::new(IndexStore::new(DataIndex::load_from_files("data/sample")?));
//! let orchestrator = RankingOrchestrator::from_store(store, EngineConfig::from_env());
//!
//! let people = orchestrator.rank_people("ana", RankingPolicy::ClosestNearby, None).await?;
//! let events = orchestrator.rank_content("ana", Some(10)).await?;
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use orchestrator::RankingOrchestrator;
