//! Derivation entry points.
//!
//! The host calls these on document preparation and user actions. Each
//! call reads a complete snapshot and returns fresh results; nothing is
//! cached between calls.
//!
//! ```text
//! ActorData ─► LevelBonusTotals ─► stats ─► checks ─► resources ─► roll data
//! ```

use crate::accuracy::AttackOutcome;
use crate::actor::{ActorData, AttackKind, ItemData, ItemKind, StatBlock};
use crate::checks::{derive_checks, Check};
use crate::config::{Resource, RulesConfig};
use crate::damage::{assemble_damage, DamageInputs, DamageSummary};
use crate::element::{StatKind, WeaponType};
use crate::error::{RollWarning, RulesError};
use crate::favored::FavoredBy;
use crate::level_bonus::{AttackContext, LevelBonusTotals};
use crate::mixed::BonusTerm;
use crate::stats::{derive_stats, Stat};
use serde::Serialize;
use std::collections::BTreeMap;

/// Flattened variable map consumed by the host dice evaluator.
pub type RollData = BTreeMap<String, i64>;

/// A resource pool after level bonuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DerivedResource {
    pub value: i64,
    pub base: i64,
    pub level_bonus: i64,
    pub max: i64,
}

/// Everything derived from one actor snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedActor {
    pub level: i64,
    pub badass_rank: i64,
    pub level_bonus: LevelBonusTotals,
    pub stats: StatBlock<Stat>,
    pub checks: BTreeMap<String, Check>,
    pub resources: BTreeMap<Resource, DerivedResource>,
}

/// Run a full derivation pass.
pub fn prepare_derived_data(actor: &ActorData, config: &RulesConfig) -> DerivedActor {
    let level_bonus = LevelBonusTotals::aggregate(actor.level_rewards());
    let stats = derive_stats(actor, &level_bonus);
    let checks = derive_checks(
        &actor.checks,
        &stats,
        actor.badass.rank,
        &actor.effect_bonuses,
    );

    let resources = config
        .active_resources()
        .into_iter()
        .map(|resource| {
            let pool = actor.resources.get(&resource).copied().unwrap_or_default();
            let level = level_bonus.max_bonus(resource);
            let derived = DerivedResource {
                value: pool.value,
                base: pool.base,
                level_bonus: level,
                max: pool.base + level,
            };
            (resource, derived)
        })
        .collect();

    tracing::debug!(
        actor = %actor.name,
        checks = checks.len(),
        rewards = actor.level_rewards().count(),
        "prepared derived data"
    );

    DerivedActor {
        level: actor.level,
        badass_rank: actor.badass.rank,
        level_bonus,
        stats,
        checks,
        resources,
    }
}

/// Flatten derived data into dice-evaluator variables.
///
/// Per stat `s`: `s` (modToUse), `sValue`, `sMod`, `sGear`. Every check
/// total under its name, plus `badassRank` and `level`. Stat and actor
/// keys win over a check with the same name.
pub fn get_roll_data(derived: &DerivedActor) -> RollData {
    let mut data = RollData::new();
    for (name, check) in &derived.checks {
        data.insert(name.clone(), check.total);
    }
    for kind in StatKind::ALL {
        let stat = derived.stats.get(kind);
        let abbr = kind.abbr();
        data.insert(abbr.to_string(), stat.mod_to_use);
        data.insert(format!("{}Value", abbr), stat.value);
        data.insert(format!("{}Mod", abbr), stat.modifier);
        data.insert(format!("{}Gear", abbr), stat.item_bonus);
    }
    data.insert("badassRank".to_string(), derived.badass_rank);
    data.insert("level".to_string(), derived.level);
    data
}

/// A rendered damage roll plus how it was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageRoll {
    pub formula: String,
    pub summary: DamageSummary,
    pub favored: FavoredBy,
    /// Set when there was no damage and the fallback formula is used.
    pub warning: Option<RollWarning>,
}

fn attack_kind(item: &ItemData) -> AttackKind {
    match (item.kind, item.weapon_type) {
        (ItemKind::Grenade, _) | (_, Some(WeaponType::Grenade)) => AttackKind::Throw,
        (_, Some(WeaponType::Melee)) => AttackKind::Melee,
        _ => AttackKind::Shooting,
    }
}

/// Assemble the damage formula for an attack with `item`.
///
/// Bonus sources are the favored bonus (the damage stat's `modToUse`),
/// level-up trigger bonuses for this outcome, and active-effect damage.
pub fn roll_weapon_damage(
    actor: &ActorData,
    derived: &DerivedActor,
    item: &ItemData,
    outcome: &AttackOutcome,
    double: bool,
) -> Result<DamageRoll, RollWarning> {
    if !matches!(item.kind, ItemKind::Weapon | ItemKind::Grenade) {
        tracing::warn!(item = %item.name, "damage roll requested for non-weapon");
        return Err(RollWarning::NotAWeapon(item.name.clone()));
    }

    let favored = FavoredBy::resolve(item, &actor.favored);
    let dmg = derived.stats.get(StatKind::Damage).mod_to_use;
    let favored_bonus = favored.bonus(&BonusTerm::Flat(dmg));

    let context = AttackContext {
        kind: attack_kind(item),
        hits: outcome.hits,
        crits: outcome.crits,
        natural_20: outcome.natural_20,
    };
    let level_bonus = derived.level_bonus.damage_bonus_for(&context);

    let inputs = DamageInputs {
        hits: outcome.hits,
        crits: outcome.crits,
        per_hit: &item.damage,
        per_crit: &item.crit_damage,
        per_attack: &item.bonus_damage,
    };
    let (summary, rendered) = assemble_damage(
        &inputs,
        &[&favored_bonus, &level_bonus, &actor.effect_bonuses.damage],
        double,
    );

    Ok(DamageRoll {
        formula: rendered.formula,
        summary,
        favored,
        warning: rendered.warning,
    })
}

/// Spend badass tokens. On failure the actor is left unchanged.
pub fn spend_badass_tokens(actor: &mut ActorData, cost: i64) -> Result<i64, RollWarning> {
    let available = actor.badass.tokens;
    if cost <= 0 {
        return Ok(available);
    }
    if cost > available {
        let warning = RollWarning::NotEnoughResource {
            resource: "badass tokens".to_string(),
            needed: cost,
            available,
        };
        tracing::warn!("{}", warning);
        return Err(warning);
    }
    actor.badass.tokens -= cost;
    Ok(actor.badass.tokens)
}

/// Spend from a resource pool. On failure the actor is left unchanged.
pub fn spend_resource(
    actor: &mut ActorData,
    resource: Resource,
    amount: i64,
) -> Result<i64, RollWarning> {
    let available = actor.resources.get(&resource).map_or(0, |p| p.value);
    if amount <= 0 {
        return Ok(available);
    }
    if amount > available {
        let warning = RollWarning::NotEnoughResource {
            resource: resource.key().to_string(),
            needed: amount,
            available,
        };
        tracing::warn!("{}", warning);
        return Err(warning);
    }
    let pool = actor.resources.entry(resource).or_default();
    pool.value -= amount;
    Ok(pool.value)
}

/// The interface a host document adapter exposes.
pub trait HostDocument {
    /// Called after raw data loads.
    fn prepare_derived_data(&self) -> DerivedActor;

    /// Variables for the dice evaluator.
    fn get_roll_data(&self) -> RollData {
        get_roll_data(&self.prepare_derived_data())
    }
}

/// Adapter between the host's actor document and the rules.
///
/// # Examples
///
/// ```rust
/// use bnbstat::{ActorAdapter, HostDocument, RulesConfig};
///
/// let json = r#"{
///     "name": "Brick",
///     "archetypes": [{ "name": "Brute", "baseStats": { "dmg": 4 } }],
///     "checks": { "athletics": { "stat": "dmg", "base": 1 } }
/// }"#;
/// let adapter = ActorAdapter::from_json(json, RulesConfig::default()).unwrap();
/// let roll_data = adapter.get_roll_data();
///
/// assert_eq!(roll_data["dmg"], 2);
/// assert_eq!(roll_data["athletics"], 3);
/// ```
#[derive(Debug, Clone)]
pub struct ActorAdapter {
    data: ActorData,
    config: RulesConfig,
}

impl ActorAdapter {
    pub fn new(data: ActorData, config: RulesConfig) -> Self {
        Self { data, config }
    }

    pub fn from_json(json: &str, config: RulesConfig) -> Result<Self, RulesError> {
        Ok(Self::new(ActorData::from_json(json)?, config))
    }

    pub fn data(&self) -> &ActorData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ActorData {
        &mut self.data
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Formula for a named check, if the actor has it.
    pub fn check_formula(&self, name: &str) -> Option<String> {
        self.prepare_derived_data()
            .checks
            .get(name)
            .map(Check::roll_formula)
    }

    /// Damage roll for a named item.
    pub fn roll_damage(
        &self,
        item_name: &str,
        outcome: &AttackOutcome,
        double: bool,
    ) -> Result<DamageRoll, RollWarning> {
        let item = self
            .data
            .item(item_name)
            .ok_or_else(|| RollWarning::NotAWeapon(item_name.to_string()))?;
        let derived = self.prepare_derived_data();
        roll_weapon_damage(&self.data, &derived, item, outcome, double)
    }

    pub fn spend_badass_tokens(&mut self, cost: i64) -> Result<i64, RollWarning> {
        spend_badass_tokens(&mut self.data, cost)
    }

    pub fn spend_resource(&mut self, resource: Resource, amount: i64) -> Result<i64, RollWarning> {
        spend_resource(&mut self.data, resource, amount)
    }
}

impl HostDocument for ActorAdapter {
    fn prepare_derived_data(&self) -> DerivedActor {
        prepare_derived_data(&self.data, &self.config)
    }
}
