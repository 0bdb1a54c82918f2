//! Thread-safe ordered container for linear access patterns
//!
//! This crate provides [`Linear`], a key-value container that can be used as:
//! - a stack ([`Linear::pop`] removes the newest entry)
//! - a queue ([`Linear::take`] removes the oldest entry)
//! - a map ([`Linear::get`], [`Linear::read`], [`Linear::update`])
//!
//! All entries share an estimated byte budget. When a push would exceed it the
//! container either evicts its oldest entries or refuses the write, depending
//! on how it was configured.

pub mod config;
pub mod errors;
pub mod index;
pub mod linear;
pub mod size;
pub mod stats;
pub mod store;

pub use config::{
    ConfigSource, LinearConfig, LinearConfigBuilder, LinearConfigLoader, ResolvedConfig,
};
pub use errors::{LinearError, Result};
pub use linear::{Entry, Linear};
pub use size::{estimate, EstimateSize, COMPOSITE_COST, ELEMENT_UNIT};
pub use stats::{LinearStats, LinearStatsSnapshot};
pub use store::ValueStore;
