//! Actor and item snapshots.
//!
//! These mirror the host's document schema. Every struct is
//! `#[serde(default)]` so partially filled documents load with zeroed or
//! empty fields instead of failing. Fields go through the lenient loaders
//! below, so a `null` or a value of the wrong type falls back to the
//! default and numeric strings are read as numbers. Only malformed JSON or
//! a document that is not an object is an error.

use crate::config::Resource;
use crate::damage::DamageBonus;
use crate::element::{DamageType, StatKind, WeaponType};
use crate::error::RulesError;
use crate::level_bonus::LevelReward;
use crate::mixed::BonusTerm;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One value per core stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned + Default"))]
pub struct StatBlock<T> {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub acc: T,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub dmg: T,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub spd: T,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub mst: T,
}

impl<T> StatBlock<T> {
    pub fn get(&self, stat: StatKind) -> &T {
        match stat {
            StatKind::Accuracy => &self.acc,
            StatKind::Damage => &self.dmg,
            StatKind::Speed => &self.spd,
            StatKind::Mastery => &self.mst,
        }
    }

    pub fn get_mut(&mut self, stat: StatKind) -> &mut T {
        match stat {
            StatKind::Accuracy => &mut self.acc,
            StatKind::Damage => &mut self.dmg,
            StatKind::Speed => &mut self.spd,
            StatKind::Mastery => &mut self.mst,
        }
    }

    /// Build a block by evaluating `f` for each stat.
    pub fn from_fn(mut f: impl FnMut(StatKind) -> T) -> Self {
        Self {
            acc: f(StatKind::Accuracy),
            dmg: f(StatKind::Damage),
            spd: f(StatKind::Speed),
            mst: f(StatKind::Mastery),
        }
    }
}

impl StatBlock<i64> {
    pub fn add_assign(&mut self, other: &StatBlock<i64>) {
        for stat in StatKind::ALL {
            *self.get_mut(stat) += *other.get(stat);
        }
    }
}

/// The two effect bonus channels on a stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatEffects {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub value: i64,
    #[serde(rename = "mod", deserialize_with = "deserialize_lenient")]
    pub modifier: i64,
}

/// Raw, player-editable part of a stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatInput {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub misc: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub mod_bonus: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub effects: StatEffects,
}

/// Badass rank and tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BadassData {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub rank: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub tokens: i64,
    /// When set, checks use the full stat value rather than the modifier.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub rolls_enabled: bool,
}

/// A source of base stats (an archetype or the class).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatSourceData {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub base_stats: StatBlock<i64>,
}

/// Which kind of attack a combat check rolls for.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    Melee,
    Shooting,
    Throw,
}

/// Raw check definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckInput {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub stat: StatKind,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub base: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub gear: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub misc: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub uses_badass_rank: bool,
    /// Set on combat checks.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub attack: Option<AttackKind>,
}

impl Default for CheckInput {
    fn default() -> Self {
        Self {
            stat: StatKind::Accuracy,
            base: 0,
            gear: 0,
            misc: 0,
            uses_badass_rank: false,
            attack: None,
        }
    }
}

/// A resource pool's stored numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePool {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub value: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub base: i64,
}

/// Tags that make an attack favored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FavoredTags {
    #[serde(deserialize_with = "deserialize_lenient_list")]
    pub weapon_types: BTreeSet<WeaponType>,
    #[serde(deserialize_with = "deserialize_lenient_list")]
    pub elements: BTreeSet<DamageType>,
}

/// Accuracy bonuses granted by active effects to combat checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatAccuracy {
    /// Applies to every combat check.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub all: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub melee: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub shooting: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub throw: i64,
}

impl CombatAccuracy {
    pub fn for_attack(&self, kind: AttackKind) -> i64 {
        match kind {
            AttackKind::Melee => self.melee,
            AttackKind::Shooting => self.shooting,
            AttackKind::Throw => self.throw,
        }
    }
}

/// Totals contributed by active effects, already summed by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectBonuses {
    /// Explicit per-check bonus, by check name.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub checks: BTreeMap<String, i64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub combat: CombatAccuracy,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub damage: DamageBonus,
}

/// Item categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Weapon,
    Shield,
    Grenade,
    Relic,
    ClassMod,
    Potion,
    LevelUp,
    #[default]
    #[serde(other)]
    Other,
}

/// One damage-type slot on an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DamageEntry {
    pub enabled: bool,
    pub damage: Option<BonusTerm>,
}

impl DamageEntry {
    pub fn new(damage: impl Into<BonusTerm>) -> Self {
        Self {
            enabled: true,
            damage: Some(damage.into()),
        }
    }

    /// The damage if this entry takes part in aggregation.
    pub fn active(&self) -> Option<&BonusTerm> {
        if self.enabled {
            self.damage.as_ref()
        } else {
            None
        }
    }
}

/// Load a field, falling back to its default on `null` or a value of the
/// wrong type.
///
/// Strings are also tried as JSON literals, so `"3"` loads into an `i64`
/// and `"true"` into a `bool`. Whole-valued floats load into integers.
pub fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(lenient_value(raw))
}

fn lenient_value<T: DeserializeOwned + Default>(raw: Value) -> T {
    if raw.is_null() {
        return T::default();
    }
    let retry = match &raw {
        Value::String(s) => serde_json::from_str::<Value>(s.trim()).ok(),
        Value::Number(n) if n.as_i64().is_none() => n
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| Value::from(f as i64)),
        _ => None,
    };
    match serde_json::from_value(raw) {
        Ok(value) => value,
        Err(err) => match retry.map(serde_json::from_value::<T>) {
            Some(Ok(value)) => value,
            _ => {
                tracing::debug!(error = %err, "using default for invalid field");
                T::default()
            }
        },
    }
}

/// Load a list or set, dropping entries that do not load. Anything other
/// than an array yields an empty collection.
pub fn deserialize_lenient_list<'de, D, C>(deserializer: D) -> Result<C, D::Error>
where
    D: Deserializer<'de>,
    C: IntoIterator + FromIterator<<C as IntoIterator>::Item>,
    C::Item: DeserializeOwned,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        Value::Null => Vec::new(),
        other => {
            tracing::debug!(value = %other, "expected a list, using empty");
            Vec::new()
        }
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::debug!(error = %err, "skipping invalid list entry");
                None
            }
        })
        .collect())
}

/// Damage-type keyed entries.
pub type DamageMap = BTreeMap<DamageType, DamageEntry>;

/// Lenient damage-map loader: unknown keys and malformed entries are
/// dropped rather than failing the whole document.
pub fn deserialize_damage_map<'de, D>(deserializer: D) -> Result<DamageMap, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(raw) = Value::deserialize(deserializer)? else {
        return Ok(DamageMap::new());
    };
    let mut map = DamageMap::new();
    for (key, value) in raw {
        let Some(damage_type) = DamageType::ALL.into_iter().find(|t| t.key() == key) else {
            tracing::debug!(key = %key, "skipping unknown damage type");
            continue;
        };
        let Some(obj) = value.as_object() else {
            tracing::debug!(key = %key, "skipping malformed damage entry");
            continue;
        };
        let enabled = obj.get("enabled").and_then(Value::as_bool).unwrap_or(false);
        let damage = obj.get("damage").and_then(BonusTerm::from_value);
        map.insert(damage_type, DamageEntry { enabled, damage });
    }
    Ok(map)
}

/// Hit and crit counts for one accuracy band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitsCrits {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub hits: u32,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub crits: u32,
}

/// A weapon's accuracy table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccuracyTable {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub low: HitsCrits,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub mid: HitsCrits,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub high: HitsCrits,
}

/// An owned item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemData {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "deserialize_lenient")]
    pub kind: ItemKind,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub equipped: bool,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub in_hand: bool,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub weapon_type: Option<WeaponType>,
    /// Second category for weapons that count as either of two types.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub alt_weapon_type: Option<WeaponType>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub gear_bonus: StatBlock<i64>,
    /// Per-hit damage.
    #[serde(deserialize_with = "deserialize_damage_map")]
    pub damage: DamageMap,
    /// Per-crit damage.
    #[serde(deserialize_with = "deserialize_damage_map")]
    pub crit_damage: DamageMap,
    /// Once-per-attack bonus damage.
    #[serde(deserialize_with = "deserialize_damage_map")]
    pub bonus_damage: DamageMap,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub accuracy: AccuracyTable,
    /// Reward payload for level-up items.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub level_up: LevelReward,
}

impl ItemData {
    pub fn is_weapon(&self) -> bool {
        self.kind == ItemKind::Weapon
    }

    /// Weapons contribute gear bonuses only while equipped and in hand.
    pub fn contributes_gear(&self) -> bool {
        self.is_weapon() && self.equipped && self.in_hand
    }
}

/// A full actor snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActorData {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub level: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub badass: BadassData,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub stats: StatBlock<StatInput>,
    #[serde(deserialize_with = "deserialize_lenient_list")]
    pub archetypes: Vec<StatSourceData>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub class: Option<StatSourceData>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub checks: BTreeMap<String, CheckInput>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub resources: BTreeMap<Resource, ResourcePool>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub favored: FavoredTags,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub effect_bonuses: EffectBonuses,
    #[serde(deserialize_with = "deserialize_lenient_list")]
    pub items: Vec<ItemData>,
}

impl ActorData {
    /// Parse a snapshot document.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, RulesError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Level-up reward items the actor holds, in document order.
    pub fn level_rewards(&self) -> impl Iterator<Item = &LevelReward> {
        self.items
            .iter()
            .filter(|i| i.kind == ItemKind::LevelUp)
            .map(|i| &i.level_up)
    }

    pub fn item(&self, name: &str) -> Option<&ItemData> {
        self.items.iter().find(|i| i.name == name)
    }
}
