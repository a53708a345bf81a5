//! Item drops granted when an enemy unit dies.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a killed unit drops.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TowerDrop {
    /// A fixed amount of one item.
    Simple {
        /// Dropped item.
        item: String,
        /// Number of items, at least one.
        amount: u32,
    },
    /// One entry picked uniformly at random.
    Random {
        /// Candidate drops, never empty.
        items: Vec<TowerDrop>,
    },
}

impl TowerDrop {
    /// Add this drop to `items`.
    pub fn apply<R: Rng + ?Sized>(&self, items: &mut ItemSeq, rng: &mut R) {
        match self {
            Self::Simple { item, amount } => items.add(item, *amount),
            Self::Random { items: choices } => {
                if choices.is_empty() {
                    return;
                }
                let picked = rng.gen_range(0..choices.len());
                if let Some(choice) = choices.get(picked) {
                    choice.apply(items, rng);
                }
            }
        }
    }
}

/// Item totals accumulated from drops.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ItemSeq(BTreeMap<String, u64>);

impl ItemSeq {
    /// Empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` of `item`.
    pub fn add(&mut self, item: &str, amount: u32) {
        let total = self.0.entry(item.to_owned()).or_default();
        *total = total.saturating_add(u64::from(amount));
    }

    /// Amount of `item` held.
    #[must_use]
    pub fn get(&self, item: &str) -> u64 {
        self.0.get(item).copied().unwrap_or_default()
    }

    /// Sum over every item.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().fold(0, |sum, amount| sum.saturating_add(*amount))
    }

    /// Items and amounts, by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(item, amount)| (item.as_str(), *amount))
    }

    /// Whether nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
