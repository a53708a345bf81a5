//! Typed gamemode configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::drop::TowerDrop;

/// Settings of the tower-defense gamemode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TowerConfig {
    /// Health scaling applied to every enemy wave.
    pub health_multiplier: f64,
    /// Whether killed units split into weaker ones.
    pub mitosis: bool,
    /// Whether units downgrade instead of dying.
    pub downgrade: bool,
    /// Whether player units are bound to their spawner.
    pub unit_bind: bool,
    /// Blocks that may be built on the enemy path; `None` allows none.
    pub buildable_on_path: Option<BTreeSet<String>>,
    /// Named drop tables.
    pub drops: BTreeMap<String, Vec<TowerDrop>>,
    /// Per-unit settings.
    pub units: BTreeMap<String, UnitData>,
}

/// Settings of one enemy unit type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitData {
    /// Name of the drop table applied when the unit dies.
    pub drop: String,
    /// Unit spawned in its place when downgrading.
    pub downgrade: Option<String>,
}

impl TowerConfig {
    /// Drop table for `unit`, if the unit is configured.
    #[must_use]
    pub fn drops_for(&self, unit: &str) -> Option<&[TowerDrop]> {
        let data = self.units.get(unit)?;
        self.drops.get(&data.drop).map(Vec::as_slice)
    }

    /// Whether `block` may be placed on the enemy path.
    #[must_use]
    pub fn is_buildable_on_path(&self, block: &str) -> bool {
        self.buildable_on_path
            .as_ref()
            .is_some_and(|blocks| blocks.contains(block))
    }

    /// Unit replacing `unit` on downgrade, when downgrades are enabled.
    #[must_use]
    pub fn downgrade_of(&self, unit: &str) -> Option<&str> {
        if !self.downgrade {
            return None;
        }
        self.units.get(unit)?.downgrade.as_deref()
    }
}
