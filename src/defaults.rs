//! Zeroed templates keyed by the fixed element list.
//!
//! New items and fresh aggregation passes start from these so every damage
//! type is present with a known empty value.

use crate::actor::{DamageEntry, DamageMap};
use crate::element::DamageType;
use crate::level_bonus::{DamageSplit, LevelBonusTotals};
use crate::mixed::MixedValue;
use std::collections::BTreeMap;

/// A damage map with every damage type present and disabled.
///
/// # Examples
///
/// ```rust
/// use bnbstat::defaults::default_damage_map;
///
/// let map = default_damage_map();
/// assert_eq!(map.len(), 7);
/// assert!(map.values().all(|e| e.active().is_none()));
/// ```
pub fn default_damage_map() -> DamageMap {
    DamageType::ALL
        .into_iter()
        .map(|t| (t, DamageEntry::default()))
        .collect()
}

/// One empty accumulator per damage type.
pub fn default_element_totals() -> BTreeMap<DamageType, MixedValue> {
    DamageType::ALL
        .into_iter()
        .map(|t| (t, MixedValue::default()))
        .collect()
}

/// An empty kinetic/elemental split.
pub fn default_bonus_split() -> DamageSplit {
    DamageSplit::default()
}

/// Empty level bonus totals, ready for a fresh aggregation pass.
pub fn default_level_totals() -> LevelBonusTotals {
    LevelBonusTotals::default()
}
