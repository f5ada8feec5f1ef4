//! Tests for favored bonuses and damage formula assembly.
//!
//! These tests verify:
//! - Hit/crit replication of damage entries
//! - Favored bonus placement without double counting
//! - Level-up and effect bonuses flowing into formulas
//! - The empty-damage fallback

use bnbstat::accuracy::AttackOutcome;
use bnbstat::actor::{DamageEntry, DamageMap, FavoredTags, ItemKind};
use bnbstat::damage::{assemble_damage, DamageInputs, EMPTY_DAMAGE_FORMULA};
use bnbstat::favored::FavoredBy;
use bnbstat::*;
use serde_json::json;

fn weapon(value: serde_json::Value) -> ItemData {
    serde_json::from_value(value).unwrap()
}

fn outcome(hits: u32, crits: u32) -> AttackOutcome {
    AttackOutcome {
        hits,
        crits,
        natural_20: false,
    }
}

// ============================================================================
// Summary building
// ============================================================================

#[test]
fn test_hits_and_crits_replicate_entries() {
    let per_hit = DamageMap::from([(DamageType::Kinetic, DamageEntry::new("1d8"))]);
    let per_crit = DamageMap::from([(DamageType::Kinetic, DamageEntry::new("1d12"))]);
    let none = DamageMap::new();

    let (summary, formula) = assemble_damage(
        &DamageInputs {
            hits: 2,
            crits: 1,
            per_hit: &per_hit,
            per_crit: &per_crit,
            per_attack: &none,
        },
        &[],
        false,
    );

    let kinetic = summary.get(BucketKey::Type(DamageType::Kinetic)).unwrap();
    assert_eq!(kinetic.to_formula(NumberLocation::End), "1d8 + 1d8 + 1d12");
    assert_eq!(formula.formula, "(1d8 + 1d8 + 1d12)[Kinetic]");
}

#[test]
fn test_no_damage_falls_back_to_zero_kinetic() {
    let none = DamageMap::new();
    let (_, formula) = assemble_damage(
        &DamageInputs {
            hits: 1,
            crits: 1,
            per_hit: &none,
            per_crit: &none,
            per_attack: &none,
        },
        &[],
        false,
    );
    assert_eq!(formula.formula, EMPTY_DAMAGE_FORMULA);
    assert_eq!(formula.warning, Some(RollWarning::NoDamageToRoll));
}

// ============================================================================
// Favored placement
// ============================================================================

#[test]
fn test_two_favored_elements_share_one_bonus() {
    let item = weapon(json!({
        "type": "weapon",
        "weaponType": "smg",
        "damage": {
            "shock": { "enabled": true, "damage": "1d6" },
            "cryo": { "enabled": true, "damage": "1d6" }
        }
    }));
    let tags = FavoredTags {
        elements: [DamageType::Shock, DamageType::Cryo].into_iter().collect(),
        ..Default::default()
    };

    let favored = FavoredBy::resolve(&item, &tags);
    let bonus = favored.bonus(&BonusTerm::Flat(4));

    let (summary, formula) = assemble_damage(
        &DamageInputs {
            hits: 1,
            crits: 0,
            per_hit: &item.damage,
            per_crit: &item.crit_damage,
            per_attack: &item.bonus_damage,
        },
        &[&bonus],
        false,
    );

    let numeric: i64 = summary.buckets().map(|(_, m)| m.num).sum();
    assert_eq!(numeric, 4);
    assert_eq!(summary.get(BucketKey::Elemental).unwrap().num, 4);
    assert_eq!(
        formula.formula,
        "1d6[Shock] + 1d6[Cryo] + 4[Elemental]"
    );
}

#[test]
fn test_favored_weapon_type_end_to_end() {
    let hunter = ActorData::from_value(json!({
        "archetypes": [{ "baseStats": { "dmg": 6 } }],
        "favored": { "weaponTypes": ["cr"] },
        "items": [{
            "name": "Vladof Rifle",
            "type": "weapon",
            "weaponType": "cr",
            "damage": { "kinetic": { "enabled": true, "damage": "1d10" } }
        }]
    }))
    .unwrap();
    let derived = prepare_derived_data(&hunter, &RulesConfig::default());
    assert_eq!(derived.stats.get(StatKind::Damage).mod_to_use, 3);

    let item = hunter.item("Vladof Rifle").unwrap();
    let roll = roll_weapon_damage(&hunter, &derived, item, &outcome(1, 0), false).unwrap();

    let kinetic = roll.summary.get(BucketKey::Type(DamageType::Kinetic)).unwrap();
    assert_eq!(kinetic.num, 3);
    assert_eq!(roll.formula, "(1d10 + 3)[Kinetic]");
}

#[test]
fn test_single_favored_element_on_mixed_weapon() {
    let hunter = ActorData::from_value(json!({
        "archetypes": [{ "baseStats": { "dmg": 4 } }],
        "favored": { "elements": ["incendiary"] },
        "items": [{
            "name": "Torgue Launcher",
            "type": "weapon",
            "weaponType": "rl",
            "damage": {
                "kinetic": { "enabled": true, "damage": "1d10" },
                "incendiary": { "enabled": true, "damage": "1d6" }
            }
        }]
    }))
    .unwrap();
    let derived = prepare_derived_data(&hunter, &RulesConfig::default());
    let item = hunter.item("Torgue Launcher").unwrap();
    let roll = roll_weapon_damage(&hunter, &derived, item, &outcome(1, 0), true).unwrap();

    assert_eq!(
        roll.formula,
        "2*1d10[Kinetic] + 2*(1d6 + 2)[Incendiary]"
    );
}

#[test]
fn test_favored_grenade_item_without_weapon_type() {
    let hunter = ActorData::from_value(json!({
        "archetypes": [{ "baseStats": { "dmg": 4 } }],
        "favored": { "weaponTypes": ["grenade"] },
        "items": [{
            "name": "Bouncing Betty",
            "type": "grenade",
            "damage": { "explosive": { "enabled": true, "damage": "2d6" } }
        }]
    }))
    .unwrap();
    let derived = prepare_derived_data(&hunter, &RulesConfig::default());
    let item = hunter.item("Bouncing Betty").unwrap();
    assert!(item.weapon_type.is_none());

    let roll = roll_weapon_damage(&hunter, &derived, item, &outcome(1, 0), false).unwrap();

    assert!(roll.favored.is_favored());
    let explosive = roll.summary.get(BucketKey::Type(DamageType::Explosive)).unwrap();
    assert_eq!(explosive.num, 2);
    assert_eq!(roll.formula, "(2d6 + 2)[Explosive]");
}

// ============================================================================
// Level-up and effect bonuses
// ============================================================================

#[test]
fn test_level_and_effect_bonuses_reach_formula() {
    let hunter = ActorData::from_value(json!({
        "effectBonuses": {
            "damage": { "untyped": { "num": 1, "texts": [] } }
        },
        "items": [
            {
                "type": "levelUp",
                "levelUp": {
                    "bonusDamage": {
                        "perHit": { "kinetic": 1 },
                        "onNatural20": { "elemental": "1d8" }
                    }
                }
            },
            {
                "name": "Grenade",
                "type": "grenade",
                "damage": { "explosive": { "enabled": true, "damage": "2d6" } }
            }
        ]
    }))
    .unwrap();
    let derived = prepare_derived_data(&hunter, &RulesConfig::default());
    let item = hunter.item("Grenade").unwrap();

    let nat20 = AttackOutcome {
        hits: 1,
        crits: 1,
        natural_20: true,
    };
    let roll = roll_weapon_damage(&hunter, &derived, item, &nat20, false).unwrap();

    // kinetic per-hit is dropped (no kinetic damage); elemental and untyped
    // both land on the only type present
    assert_eq!(roll.formula, "(2d6 + 1d8 + 1)[Explosive]");
    assert!(roll.summary.get(BucketKey::Type(DamageType::Kinetic)).is_none());
}

#[test]
fn test_non_weapon_item_is_rejected() {
    let hunter = ActorData::default();
    let derived = prepare_derived_data(&hunter, &RulesConfig::default());
    let shield = ItemData {
        name: "Shield".into(),
        kind: ItemKind::Shield,
        ..Default::default()
    };
    assert!(roll_weapon_damage(&hunter, &derived, &shield, &outcome(1, 0), false).is_err());
}
