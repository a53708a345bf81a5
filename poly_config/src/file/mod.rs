//! Parsing of configuration documents into [`ConfigNode`](crate::ConfigNode)
//! trees.

mod helpers;
mod loader;
mod raw;
#[cfg(feature = "toml")]
mod toml_loader;
#[cfg(feature = "yaml")]
mod yaml;

pub(crate) use helpers::read_optional;
pub use loader::{SourceLoader, default_loaders, loader_for};
#[cfg(feature = "toml")]
pub use toml_loader::TomlLoader;
#[cfg(feature = "yaml")]
pub use yaml::YamlLoader;
