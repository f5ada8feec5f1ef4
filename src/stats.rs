//! Stat derivation.
//!
//! ```text
//! value     = archetypes + class + misc + effects.value + level-up
//! mod       = floor(value / 2) + modBonus + effects.mod
//! modToUse  = rollsEnabled ? value : mod
//! ```
//!
//! `base` records the archetype plus class part; `itemBonus` is the sum of
//! gear bonuses on weapons that are equipped and in hand. Neither is stored
//! independently of the inputs: everything is recomputed each pass.

use crate::actor::{ActorData, StatBlock, StatEffects, StatInput};
use crate::element::StatKind;
use crate::level_bonus::LevelBonusTotals;
use serde::{Deserialize, Serialize};

/// External contributions to one stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatContributions {
    pub archetype: i64,
    pub class: i64,
    pub level_up: i64,
    pub gear: i64,
}

/// A derived stat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub kind: StatKind,
    pub base: i64,
    pub misc: i64,
    pub mod_bonus: i64,
    pub item_bonus: i64,
    pub effects: StatEffects,
    pub value: i64,
    #[serde(rename = "mod")]
    pub modifier: i64,
    pub mod_to_use: i64,
    /// `(contribution, amount)` pairs that make up `value`, in the order
    /// they were summed.
    pub breakdown: Vec<(String, i64)>,
}

/// Derive one stat.
///
/// # Examples
///
/// ```rust
/// use bnbstat::actor::StatInput;
/// use bnbstat::element::StatKind;
/// use bnbstat::stats::{derive_stat, StatContributions};
///
/// let contributions = StatContributions { archetype: 2, class: 1, ..Default::default() };
/// let stat = derive_stat(StatKind::Damage, &StatInput::default(), &contributions, false);
///
/// assert_eq!(stat.value, 3);
/// assert_eq!(stat.modifier, 1);
/// assert_eq!(stat.mod_to_use, 1);
/// ```
pub fn derive_stat(
    kind: StatKind,
    input: &StatInput,
    contributions: &StatContributions,
    rolls_enabled: bool,
) -> Stat {
    let parts = [
        ("Archetypes", contributions.archetype),
        ("Class", contributions.class),
        ("Misc", input.misc),
        ("Effects", input.effects.value),
        ("Level Ups", contributions.level_up),
    ];
    let value: i64 = parts.iter().map(|(_, v)| v).sum();
    let modifier = value.div_euclid(2) + input.mod_bonus + input.effects.modifier;

    Stat {
        kind,
        base: contributions.archetype + contributions.class,
        misc: input.misc,
        mod_bonus: input.mod_bonus,
        item_bonus: contributions.gear,
        effects: input.effects,
        value,
        modifier,
        mod_to_use: if rolls_enabled { value } else { modifier },
        breakdown: parts
            .iter()
            .filter(|(_, v)| *v != 0)
            .map(|(name, v)| (name.to_string(), *v))
            .collect(),
    }
}

/// Per-stat contributions gathered from an actor's archetypes, class,
/// level-up totals and in-hand weapons.
pub fn gather_contributions(
    actor: &ActorData,
    level: &LevelBonusTotals,
) -> StatBlock<StatContributions> {
    StatBlock::from_fn(|kind| StatContributions {
        archetype: actor
            .archetypes
            .iter()
            .map(|a| *a.base_stats.get(kind))
            .sum(),
        class: actor
            .class
            .as_ref()
            .map_or(0, |c| *c.base_stats.get(kind)),
        level_up: *level.stats.get(kind),
        gear: actor
            .items
            .iter()
            .filter(|i| i.contributes_gear())
            .map(|i| *i.gear_bonus.get(kind))
            .sum(),
    })
}

/// Derive all four stats of an actor.
pub fn derive_stats(actor: &ActorData, level: &LevelBonusTotals) -> StatBlock<Stat> {
    let contributions = gather_contributions(actor, level);
    let rolls_enabled = actor.badass.rolls_enabled;
    StatBlock::from_fn(|kind| {
        derive_stat(
            kind,
            actor.stats.get(kind),
            contributions.get(kind),
            rolls_enabled,
        )
    })
}
