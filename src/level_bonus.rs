//! Level-up reward aggregation.
//!
//! A character's level-up items each carry a reward payload. One pass folds
//! every held reward, in document order, into a `LevelBonusTotals`. Numeric
//! totals are order independent; the text channel of each accumulator keeps
//! the reward order, which only affects how formulas read.

use crate::actor::{deserialize_lenient, AttackKind, StatBlock};
use crate::config::Resource;
use crate::damage::DamageBonus;
use crate::element::DamageType;
use crate::mixed::{deserialize_bonus, BonusTerm, MixedValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Load a string-keyed map of raw bonuses, dropping unknown keys and
/// values that carry no bonus.
fn deserialize_keyed_bonuses<'de, D, K>(deserializer: D) -> Result<BTreeMap<K, BonusTerm>, D::Error>
where
    D: Deserializer<'de>,
    K: DeserializeOwned + Ord,
{
    let Value::Object(raw) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            let key = serde_json::from_value::<K>(Value::String(key)).ok()?;
            Some((key, BonusTerm::from_value(&value)?))
        })
        .collect())
}

/// Raw kinetic/elemental pair on a reward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSplit {
    #[serde(deserialize_with = "deserialize_bonus")]
    pub kinetic: Option<BonusTerm>,
    #[serde(deserialize_with = "deserialize_bonus")]
    pub elemental: Option<BonusTerm>,
}

/// Conditional bonus damage granted by one reward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewardBonusDamage {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub any_attack: RewardSplit,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub melee: RewardSplit,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub shooting: RewardSplit,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub grenade: RewardSplit,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub per_hit: RewardSplit,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub per_crit: RewardSplit,
    /// Once per attack that lands at least one hit.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub per_attack: RewardSplit,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub on_crit: RewardSplit,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub on_natural_20: RewardSplit,
    #[serde(deserialize_with = "deserialize_keyed_bonuses")]
    pub elements: BTreeMap<DamageType, BonusTerm>,
}

/// Reward payload on a level-up item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelReward {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub stats: StatBlock<i64>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub max: BTreeMap<Resource, i64>,
    #[serde(deserialize_with = "deserialize_keyed_bonuses")]
    pub regen: BTreeMap<Resource, BonusTerm>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub skill_points: i64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub bonus_damage: RewardBonusDamage,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub feat: String,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub bonus: String,
}

/// Accumulated kinetic/elemental pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSplit {
    pub kinetic: MixedValue,
    pub elemental: MixedValue,
}

impl DamageSplit {
    pub fn is_empty(&self) -> bool {
        self.kinetic.is_empty() && self.elemental.is_empty()
    }

    fn absorb(&mut self, raw: &RewardSplit) {
        self.kinetic.apply_opt(raw.kinetic.as_ref());
        self.elemental.apply_opt(raw.elemental.as_ref());
    }

    fn add_to(&self, bonus: &mut DamageBonus, times: u32) {
        for _ in 0..times {
            bonus.kinetic.merge(&self.kinetic);
            bonus.elemental.merge(&self.elemental);
        }
    }
}

/// Conditional bonus damage totals, one split per trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelBonusDamage {
    pub any_attack: DamageSplit,
    pub melee: DamageSplit,
    pub shooting: DamageSplit,
    pub grenade: DamageSplit,
    pub per_hit: DamageSplit,
    pub per_crit: DamageSplit,
    pub per_attack: DamageSplit,
    pub on_crit: DamageSplit,
    pub on_natural_20: DamageSplit,
    pub elements: BTreeMap<DamageType, MixedValue>,
}

/// What happened on the attack a bonus is being computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackContext {
    pub kind: AttackKind,
    pub hits: u32,
    pub crits: u32,
    pub natural_20: bool,
}

/// Cumulative bonuses from all held level-up rewards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelBonusTotals {
    pub stats: StatBlock<i64>,
    pub max: BTreeMap<Resource, i64>,
    pub regen: BTreeMap<Resource, MixedValue>,
    pub skill_points: i64,
    pub bonus_damage: LevelBonusDamage,
    pub feats: Vec<String>,
    pub bonuses: Vec<String>,
}

impl LevelBonusTotals {
    /// Fold rewards in order into fresh totals.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bnbstat::level_bonus::{LevelBonusTotals, LevelReward};
    ///
    /// let mut first = LevelReward::default();
    /// first.skill_points = 2;
    /// first.stats.dmg = 1;
    /// let mut second = LevelReward::default();
    /// second.skill_points = 1;
    ///
    /// let totals = LevelBonusTotals::aggregate([&first, &second]);
    /// assert_eq!(totals.skill_points, 3);
    /// assert_eq!(totals.stats.dmg, 1);
    /// ```
    pub fn aggregate<'a>(rewards: impl IntoIterator<Item = &'a LevelReward>) -> Self {
        let mut totals = Self::default();
        for reward in rewards {
            totals.absorb(reward);
        }
        totals
    }

    /// Add one reward.
    pub fn absorb(&mut self, reward: &LevelReward) {
        self.stats.add_assign(&reward.stats);
        for (resource, delta) in &reward.max {
            *self.max.entry(*resource).or_insert(0) += delta;
        }
        for (resource, term) in &reward.regen {
            self.regen.entry(*resource).or_default().apply_term(term);
        }
        self.skill_points += reward.skill_points;

        let raw = &reward.bonus_damage;
        let totals = &mut self.bonus_damage;
        totals.any_attack.absorb(&raw.any_attack);
        totals.melee.absorb(&raw.melee);
        totals.shooting.absorb(&raw.shooting);
        totals.grenade.absorb(&raw.grenade);
        totals.per_hit.absorb(&raw.per_hit);
        totals.per_crit.absorb(&raw.per_crit);
        totals.per_attack.absorb(&raw.per_attack);
        totals.on_crit.absorb(&raw.on_crit);
        totals.on_natural_20.absorb(&raw.on_natural_20);
        for (element, term) in &raw.elements {
            totals.elements.entry(*element).or_default().apply_term(term);
        }

        if !reward.feat.trim().is_empty() {
            self.feats.push(reward.feat.clone());
        }
        if !reward.bonus.trim().is_empty() {
            self.bonuses.push(reward.bonus.clone());
        }
    }

    pub fn max_bonus(&self, resource: Resource) -> i64 {
        self.max.get(&resource).copied().unwrap_or(0)
    }

    /// Collapse the trigger categories that fire on `attack` into one
    /// bucketed bonus.
    pub fn damage_bonus_for(&self, attack: &AttackContext) -> DamageBonus {
        let d = &self.bonus_damage;
        let mut bonus = DamageBonus::default();

        d.any_attack.add_to(&mut bonus, 1);
        let by_kind = match attack.kind {
            AttackKind::Melee => &d.melee,
            AttackKind::Shooting => &d.shooting,
            AttackKind::Throw => &d.grenade,
        };
        by_kind.add_to(&mut bonus, 1);
        d.per_hit.add_to(&mut bonus, attack.hits);
        d.per_crit.add_to(&mut bonus, attack.crits);
        if attack.hits > 0 {
            d.per_attack.add_to(&mut bonus, 1);
        }
        if attack.crits > 0 {
            d.on_crit.add_to(&mut bonus, 1);
        }
        if attack.natural_20 {
            d.on_natural_20.add_to(&mut bonus, 1);
        }
        for (element, mixed) in &d.elements {
            bonus.add_element(*element, mixed);
        }
        bonus
    }
}
