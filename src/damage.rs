//! Damage formula assembly.
//!
//! An attack's damage is built in three steps:
//!
//! ```text
//! [per-hit / per-crit / per-attack entries] → DamageSummary
//! [favored + level + effect DamageBonus]    → placed into buckets
//! DamageSummary                             → "(1d8 + 3)[Kinetic] + 1d6[Shock]"
//! ```
//!
//! Bonuses arrive split into kinetic, elemental, untyped and named-element
//! parts. Placement depends on which damage types the attack actually
//! deals, so a single-element weapon absorbs elemental bonuses into its one
//! element while a mixed weapon collects them in a shared bucket.

use crate::actor::DamageMap;
use crate::element::{BucketKey, DamageType};
use crate::error::RollWarning;
use crate::mixed::{MixedValue, NumberLocation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Formula used when nothing else produced damage.
pub const EMPTY_DAMAGE_FORMULA: &str = "0[Kinetic]";

/// Bonus damage split by placement rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageBonus {
    /// Goes to kinetic damage, if the attack deals any.
    pub kinetic: MixedValue,
    /// Goes to the attack's one element, or the shared elemental bucket.
    pub elemental: MixedValue,
    /// Goes to the attack's one damage type, or the shared damage bucket.
    pub untyped: MixedValue,
    /// Goes straight to the named element.
    pub elements: BTreeMap<DamageType, MixedValue>,
}

impl DamageBonus {
    pub fn is_empty(&self) -> bool {
        self.kinetic.is_empty()
            && self.elemental.is_empty()
            && self.untyped.is_empty()
            && self.elements.values().all(MixedValue::is_empty)
    }

    /// Add to a named damage type. Kinetic lands in the kinetic part.
    pub fn add_element(&mut self, element: DamageType, value: &MixedValue) {
        if element == DamageType::Kinetic {
            self.kinetic.merge(value);
        } else {
            self.elements.entry(element).or_default().merge(value);
        }
    }

    /// Merge another bonus source into this one.
    pub fn merge(&mut self, other: &DamageBonus) {
        self.kinetic.merge(&other.kinetic);
        self.elemental.merge(&other.elemental);
        self.untyped.merge(&other.untyped);
        for (element, value) in &other.elements {
            self.add_element(*element, value);
        }
    }

    /// Sum of the numeric channel across every part.
    pub fn numeric_total(&self) -> i64 {
        self.kinetic.num
            + self.elemental.num
            + self.untyped.num
            + self.elements.values().map(|m| m.num).sum::<i64>()
    }
}

/// The damage entries of one attack.
#[derive(Debug, Clone, Copy)]
pub struct DamageInputs<'a> {
    pub hits: u32,
    pub crits: u32,
    pub per_hit: &'a DamageMap,
    pub per_crit: &'a DamageMap,
    pub per_attack: &'a DamageMap,
}

/// Damage accumulated per bucket for one roll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DamageSummary {
    buckets: BTreeMap<BucketKey, MixedValue>,
    /// Damage types dealt by the attack's own entries.
    present: BTreeSet<DamageType>,
}

impl DamageSummary {
    /// Replay every enabled entry: per-hit entries once per hit, per-crit
    /// entries once per crit, per-attack entries once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bnbstat::actor::{DamageEntry, DamageMap};
    /// use bnbstat::damage::{DamageInputs, DamageSummary};
    /// use bnbstat::element::{BucketKey, DamageType};
    /// use bnbstat::NumberLocation;
    ///
    /// let per_hit = DamageMap::from([(DamageType::Kinetic, DamageEntry::new("1d8"))]);
    /// let per_crit = DamageMap::from([(DamageType::Kinetic, DamageEntry::new("1d12"))]);
    /// let none = DamageMap::new();
    ///
    /// let summary = DamageSummary::build(&DamageInputs {
    ///     hits: 2,
    ///     crits: 1,
    ///     per_hit: &per_hit,
    ///     per_crit: &per_crit,
    ///     per_attack: &none,
    /// });
    /// let kinetic = summary.get(BucketKey::Type(DamageType::Kinetic)).unwrap();
    /// assert_eq!(kinetic.to_formula(NumberLocation::End), "1d8 + 1d8 + 1d12");
    /// ```
    pub fn build(inputs: &DamageInputs<'_>) -> Self {
        let mut summary = Self::default();
        summary.replay(inputs.per_hit, inputs.hits);
        if inputs.crits > 0 {
            summary.replay(inputs.per_crit, inputs.crits);
        }
        summary.replay(inputs.per_attack, 1);
        summary
    }

    fn replay(&mut self, entries: &DamageMap, times: u32) {
        for (damage_type, entry) in entries {
            let Some(term) = entry.active() else {
                continue;
            };
            if times == 0 {
                continue;
            }
            let bucket = self.buckets.entry(BucketKey::Type(*damage_type)).or_default();
            for _ in 0..times {
                bucket.apply_term(term);
            }
            self.present.insert(*damage_type);
        }
    }

    pub fn get(&self, key: BucketKey) -> Option<&MixedValue> {
        self.buckets.get(&key)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&BucketKey, &MixedValue)> {
        self.buckets.iter()
    }

    /// Damage types the attack deals on its own, before bonuses.
    pub fn present_types(&self) -> &BTreeSet<DamageType> {
        &self.present
    }

    fn deposit(&mut self, key: BucketKey, value: &MixedValue) {
        if value.is_empty() {
            return;
        }
        self.buckets.entry(key).or_default().merge(value);
    }

    /// Place a bonus into buckets.
    ///
    /// Kinetic goes to kinetic only when kinetic damage is present. Untyped
    /// goes to the single damage type when there is exactly one, else the
    /// shared `Damage` bucket. Elemental goes to the single non-kinetic type
    /// when there is exactly one, else the shared `Elemental` bucket. Named
    /// elements go to their own bucket unconditionally.
    pub fn apply_bonus(&mut self, bonus: &DamageBonus) {
        let kinetic_present = self.present.contains(&DamageType::Kinetic);
        let single_type = single(self.present.iter().copied());
        let single_element = single(self.present.iter().copied().filter(|t| t.is_elemental()));

        if kinetic_present {
            self.deposit(BucketKey::Type(DamageType::Kinetic), &bonus.kinetic);
        } else if !bonus.kinetic.is_empty() {
            tracing::debug!("dropping kinetic bonus: attack deals no kinetic damage");
        }

        let untyped_key = single_type.map_or(BucketKey::Damage, BucketKey::Type);
        self.deposit(untyped_key, &bonus.untyped);

        let elemental_key = single_element.map_or(BucketKey::Elemental, BucketKey::Type);
        self.deposit(elemental_key, &bonus.elemental);

        for (element, value) in &bonus.elements {
            self.deposit(BucketKey::Type(*element), value);
        }
    }

    /// Render the dice formula.
    ///
    /// Buckets render numbers last, are parenthesized when they hold more
    /// than one term, optionally get a `2*` multiplier, and carry a
    /// bracketed damage label. An empty summary falls back to
    /// [`EMPTY_DAMAGE_FORMULA`] with a warning.
    pub fn to_formula(&self, double: bool) -> DamageFormula {
        let parts: Vec<String> = self
            .buckets
            .iter()
            .filter_map(|(key, value)| {
                let body = value.to_formula(NumberLocation::End);
                if body.is_empty() {
                    return None;
                }
                let body = if has_inner_operator(&body) {
                    format!("({})", body)
                } else {
                    body
                };
                let multiplier = if double { "2*" } else { "" };
                Some(format!("{}{}[{}]", multiplier, body, key.label()))
            })
            .collect();

        if parts.is_empty() {
            tracing::warn!("{}", RollWarning::NoDamageToRoll);
            return DamageFormula {
                formula: EMPTY_DAMAGE_FORMULA.to_string(),
                warning: Some(RollWarning::NoDamageToRoll),
            };
        }
        DamageFormula {
            formula: parts.join(" + "),
            warning: None,
        }
    }
}

fn single<T>(mut iter: impl Iterator<Item = T>) -> Option<T> {
    let first = iter.next()?;
    match iter.next() {
        None => Some(first),
        Some(_) => None,
    }
}

/// True if `+` or `-` appears past the first character.
fn has_inner_operator(formula: &str) -> bool {
    formula
        .char_indices()
        .any(|(i, c)| i > 0 && (c == '+' || c == '-'))
}

/// A rendered damage formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageFormula {
    pub formula: String,
    /// Set when the formula is the empty fallback.
    pub warning: Option<RollWarning>,
}

/// Build, bonus and render in one call.
pub fn assemble_damage(
    inputs: &DamageInputs<'_>,
    bonuses: &[&DamageBonus],
    double: bool,
) -> (DamageSummary, DamageFormula) {
    let mut summary = DamageSummary::build(inputs);
    let mut combined = DamageBonus::default();
    for bonus in bonuses {
        combined.merge(bonus);
    }
    summary.apply_bonus(&combined);
    let formula = summary.to_formula(double);
    (summary, formula)
}
