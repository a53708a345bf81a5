//! Overlaying configuration trees.

use crate::node::{ConfigNode, MapNode};

/// Which side wins where both trees hold a non-mapping value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Precedence {
    /// The overlay replaces the base.
    #[default]
    OverlayWins,
    /// The base is kept.
    BaseWins,
}

/// Deep-merge `overlay` into `base`.
///
/// Mappings merge key by key. Where either side is a leaf or a sequence the
/// winner replaces the whole subtree, so a scalar overlay discards a base
/// mapping and a sequence is never merged element-wise. Keys present on only
/// one side are kept.
///
/// # Examples
///
/// ```
/// use poly_config::{ConfigNode, Precedence, merge};
///
/// let base = ConfigNode::map([("mitosis", ConfigNode::leaf("true"))]).expect("map");
/// let overlay = ConfigNode::map([("mitosis", ConfigNode::leaf("false"))]).expect("map");
/// let merged = merge(base, overlay, Precedence::OverlayWins);
/// assert_eq!(
///     merged.as_map().and_then(|m| m.get("mitosis")),
///     Some(&ConfigNode::leaf("false"))
/// );
/// ```
#[must_use]
pub fn merge(base: ConfigNode, overlay: ConfigNode, precedence: Precedence) -> ConfigNode {
    match (base, overlay) {
        (ConfigNode::Map(base), ConfigNode::Map(overlay)) => {
            let mut entries = base.into_entries();
            for (key, incoming) in overlay.into_entries() {
                let merged = match entries.remove(&key) {
                    Some(existing) => merge(existing, incoming, precedence),
                    None => incoming,
                };
                entries.insert(key, merged);
            }
            ConfigNode::Map(MapNode::from_canonical(entries))
        }
        (base, overlay) => match precedence {
            Precedence::OverlayWins => overlay,
            Precedence::BaseWins => base,
        },
    }
}
