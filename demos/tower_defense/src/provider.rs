//! Loading the gamemode configuration from its directory and the
//! environment.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use poly_config::{ConfigProvider, EnvSource, FileSource, PolyResult, Snapshot, Sources};

use crate::catalog::ContentCatalog;
use crate::config::TowerConfig;
use crate::error::{Result, TowerError};
use crate::schema;

/// File name of the configuration document.
pub const CONFIG_FILE: &str = "config.yaml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "XP_TOWER_DEFENSE_";

/// Configuration shipped with the binary.
pub const DEFAULT_CONFIG: &str = include_str!("../resources/config.yaml");

/// `dir/config.yaml` overlaid with `XP_TOWER_DEFENSE_*` variables.
#[must_use]
pub fn sources(dir: &Utf8Path) -> Sources {
    Sources::new()
        .with(FileSource::new(dir.join(CONFIG_FILE)))
        .with(EnvSource::prefixed(ENV_PREFIX))
}

/// Copy [`DEFAULT_CONFIG`] to `dir/config.yaml` unless a file is already
/// there.
///
/// Returns whether the file was written.
///
/// # Errors
///
/// Returns [`TowerError::Bootstrap`] when the directory cannot be created or
/// the file cannot be written.
pub fn install_default_config(dir: &Utf8Path) -> Result<bool> {
    let target = dir.join(CONFIG_FILE);
    let bootstrap = |source| TowerError::Bootstrap {
        path: target.clone(),
        source,
    };
    Dir::create_ambient_dir_all(dir, ambient_authority()).map_err(bootstrap)?;
    let handle = Dir::open_ambient_dir(dir, ambient_authority()).map_err(bootstrap)?;
    if handle.exists(CONFIG_FILE) {
        return Ok(false);
    }
    handle.write(CONFIG_FILE, DEFAULT_CONFIG).map_err(bootstrap)?;
    tracing::info!(path = %target, "installed default configuration");
    Ok(true)
}

/// The gamemode configuration, reloadable at runtime.
#[derive(Debug)]
pub struct TowerConfigProvider {
    directory: Utf8PathBuf,
    inner: ConfigProvider<TowerConfig>,
}

impl TowerConfigProvider {
    /// Provider reading the [`sources`] of `dir`. Nothing is loaded until
    /// [`Self::reload`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`TowerError::Schema`] if the engine cannot be assembled.
    pub fn new(dir: impl Into<Utf8PathBuf>, content: &Arc<ContentCatalog>) -> Result<Self> {
        let directory = dir.into();
        let inner = ConfigProvider::new(schema::engine(content)?, sources(&directory));
        Ok(Self { directory, inner })
    }

    /// Install the default document if needed, then perform the first load.
    ///
    /// # Errors
    ///
    /// Returns [`TowerError::Bootstrap`] if the default document cannot be
    /// written and [`TowerError::Config`] if the first load is rejected.
    pub fn open(dir: impl Into<Utf8PathBuf>, content: &Arc<ContentCatalog>) -> Result<Self> {
        let provider = Self::new(dir, content)?;
        install_default_config(&provider.directory)?;
        provider.reload()?;
        Ok(provider)
    }

    /// Re-read every source and publish the result.
    ///
    /// # Errors
    ///
    /// Returns the rejection; the previous snapshot stays active.
    pub fn reload(&self) -> PolyResult<Arc<Snapshot<TowerConfig>>> {
        self.inner.reload()
    }

    /// Active configuration.
    ///
    /// # Errors
    ///
    /// Returns [`poly_config::PolyError::NotLoaded`] before the first
    /// successful load.
    pub fn get(&self) -> PolyResult<Arc<Snapshot<TowerConfig>>> {
        self.inner.get()
    }

    /// Call `listener` after every successful reload.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Arc<Snapshot<TowerConfig>>) + Send + Sync + 'static,
    {
        self.inner.subscribe(listener);
    }

    /// Directory holding the configuration document.
    #[must_use]
    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }
}
