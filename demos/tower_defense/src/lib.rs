//! Tower-defense gamemode configuration built on `poly_config`.
//!
//! The gamemode reads `config.yaml` from its data directory, overlays
//! `XP_TOWER_DEFENSE_*` environment variables and decodes the result into a
//! [`TowerConfig`]. Drop tables are tagged unions of [`TowerDrop`] variants;
//! item, unit and block names are resolved through a [`ContentCatalog`].

pub mod catalog;
pub mod cli;
pub mod config;
pub mod console;
pub mod drop;
pub mod error;
pub mod provider;
pub mod schema;

pub use catalog::{ContentCatalog, ContentKind, ContentLookup};
pub use config::{TowerConfig, UnitData};
pub use drop::{ItemSeq, TowerDrop};
pub use error::TowerError;
pub use provider::{TowerConfigProvider, install_default_config};
