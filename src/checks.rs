//! Check totals.
//!
//! A check reads its stat's `modToUse` and adds flat bonuses. The effect
//! bonus is the explicit per-check bonus when one is set; otherwise combat
//! checks take the all-combat plus attack-type accuracy bonus. The two are
//! never summed.

use crate::actor::{CheckInput, EffectBonuses, StatBlock};
use crate::element::StatKind;
use crate::stats::Stat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A derived check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    pub stat: StatKind,
    pub base: i64,
    /// The stat's `modToUse`.
    pub value: i64,
    pub gear: i64,
    pub misc: i64,
    pub effects: i64,
    pub total: i64,
    pub uses_badass_rank: bool,
}

impl Check {
    /// d20 roll formula for this check.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bnbstat::checks::Check;
    /// use bnbstat::element::StatKind;
    ///
    /// let mut check = Check {
    ///     stat: StatKind::Speed,
    ///     base: 0, value: 0, gear: 0, misc: 0, effects: 0,
    ///     total: 5,
    ///     uses_badass_rank: false,
    /// };
    /// assert_eq!(check.roll_formula(), "1d20 + 5");
    /// check.total = -2;
    /// assert_eq!(check.roll_formula(), "1d20 - 2");
    /// ```
    pub fn roll_formula(&self) -> String {
        match self.total {
            0 => "1d20".to_string(),
            t if t > 0 => format!("1d20 + {}", t),
            t => format!("1d20 - {}", -t),
        }
    }
}

/// Resolve the effect bonus for a check.
pub fn effect_bonus(name: &str, input: &CheckInput, effects: &EffectBonuses) -> i64 {
    if let Some(explicit) = effects.checks.get(name) {
        return *explicit;
    }
    match input.attack {
        Some(kind) => effects.combat.all + effects.combat.for_attack(kind),
        None => 0,
    }
}

/// Derive one check.
pub fn derive_check(
    name: &str,
    input: &CheckInput,
    stats: &StatBlock<Stat>,
    badass_rank: i64,
    effects: &EffectBonuses,
) -> Check {
    let value = stats.get(input.stat).mod_to_use;
    let effects = effect_bonus(name, input, effects);
    let rank = if input.uses_badass_rank { badass_rank } else { 0 };
    Check {
        stat: input.stat,
        base: input.base,
        value,
        gear: input.gear,
        misc: input.misc,
        effects,
        total: rank + input.base + value + input.gear + input.misc + effects,
        uses_badass_rank: input.uses_badass_rank,
    }
}

/// Derive every check by name.
pub fn derive_checks(
    inputs: &BTreeMap<String, CheckInput>,
    stats: &StatBlock<Stat>,
    badass_rank: i64,
    effects: &EffectBonuses,
) -> BTreeMap<String, Check> {
    inputs
        .iter()
        .map(|(name, input)| {
            (
                name.clone(),
                derive_check(name, input, stats, badass_rank, effects),
            )
        })
        .collect()
}
