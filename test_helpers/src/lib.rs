//! Test fixtures shared by the poly-config crates.
//!
//! - [`jail`] runs closures inside a [`figment::Jail`] and reports failures as
//!   `anyhow` errors.
//! - [`env`] sets prefixed environment variables behind a process-wide lock
//!   and restores them on drop.
//! - [`config_dir`] writes configuration documents into a temporary
//!   directory.

pub mod config_dir;
pub mod env;
pub mod jail;
