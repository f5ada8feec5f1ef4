use bnbstat::config::SHOW_ARMOR_POOL;
use bnbstat::*;
use serde_json::{json, Value};

fn actor(value: Value) -> ActorData {
    ActorData::from_value(value).unwrap()
}

/// A level 3 character with two archetypes, a class, checks, gear and
/// level-up rewards.
fn vault_hunter() -> ActorData {
    actor(json!({
        "name": "Moxxi",
        "level": 3,
        "badass": { "rank": 2, "tokens": 3 },
        "stats": {
            "acc": { "misc": 1 },
            "mst": { "modBonus": 1, "effects": { "value": 1, "mod": 1 } }
        },
        "archetypes": [
            { "name": "Sniper", "baseStats": { "acc": 4, "spd": 2 } },
            { "name": "Brute", "baseStats": { "dmg": 3 } }
        ],
        "class": { "name": "Gunzerker", "baseStats": { "dmg": 1, "mst": 2 } },
        "checks": {
            "shooting": { "stat": "acc", "attack": "shooting", "usesBadassRank": true },
            "sneak": { "stat": "spd", "base": 1 },
            "talk": { "stat": "mst", "misc": 2 }
        },
        "resources": {
            "health": { "value": 20, "base": 25 },
            "shield": { "value": 5, "base": 10 },
            "armor": { "value": 0, "base": 5 }
        },
        "effectBonuses": {
            "combat": { "all": 1, "shooting": 1 }
        },
        "items": [
            {
                "name": "Level 2",
                "type": "levelUp",
                "levelUp": {
                    "stats": { "acc": 1 },
                    "max": { "health": 5 },
                    "skillPoints": 1,
                    "feat": "Steady Hands"
                }
            },
            {
                "name": "Level 3",
                "type": "levelUp",
                "levelUp": {
                    "max": { "health": 5, "shield": 2 },
                    "regen": { "shield": "1d4" },
                    "skillPoints": 1
                }
            },
            {
                "name": "Hyperion SMG",
                "type": "weapon",
                "equipped": true,
                "inHand": true,
                "gearBonus": { "acc": 2 }
            },
            {
                "name": "Spare Shotgun",
                "type": "weapon",
                "equipped": true,
                "gearBonus": { "acc": 5 }
            }
        ]
    }))
}

#[test]
fn test_full_derivation_pass() {
    let derived = prepare_derived_data(&vault_hunter(), &RulesConfig::default());

    // acc: 4 archetype + 1 misc + 1 level up
    let acc = derived.stats.get(StatKind::Accuracy);
    assert_eq!(acc.value, 6);
    assert_eq!(acc.modifier, 3);
    assert_eq!(acc.item_bonus, 2);

    // dmg: 3 archetype + 1 class
    assert_eq!(derived.stats.get(StatKind::Damage).value, 4);

    // mst: 2 class + 1 effect value; mod 1 + 1 bonus + 1 effect
    let mst = derived.stats.get(StatKind::Mastery);
    assert_eq!(mst.value, 3);
    assert_eq!(mst.modifier, 3);

    // shooting: rank 2 + acc mod 3 + combat 1 + shooting 1
    assert_eq!(derived.checks["shooting"].total, 7);
    assert_eq!(derived.checks["sneak"].total, 2);
    assert_eq!(derived.checks["talk"].total, 5);

    assert_eq!(derived.level_bonus.skill_points, 2);
    assert_eq!(derived.level_bonus.feats, vec!["Steady Hands"]);
    assert_eq!(derived.resources[&Resource::Health].max, 35);
    assert_eq!(derived.resources[&Resource::Shield].max, 12);
    assert_eq!(derived.resources[&Resource::Armor].max, 5);
}

#[test]
fn test_roll_data_reflects_derivation() {
    let derived = prepare_derived_data(&vault_hunter(), &RulesConfig::default());
    let data = get_roll_data(&derived);

    assert_eq!(data["acc"], 3);
    assert_eq!(data["accValue"], 6);
    assert_eq!(data["accGear"], 2);
    assert_eq!(data["shooting"], 7);
    assert_eq!(data["badassRank"], 2);
    assert_eq!(data["level"], 3);
}

#[test]
fn test_rolls_enabled_switches_checks_to_value() {
    let mut hunter = vault_hunter();
    hunter.badass.rolls_enabled = true;
    let derived = prepare_derived_data(&hunter, &RulesConfig::default());

    assert_eq!(derived.stats.get(StatKind::Accuracy).mod_to_use, 6);
    assert_eq!(derived.checks["shooting"].total, 2 + 6 + 2);
}

#[test]
fn test_derivation_is_idempotent() {
    let hunter = vault_hunter();
    let config = RulesConfig::default();
    let first = prepare_derived_data(&hunter, &config);
    let second = prepare_derived_data(&hunter, &config);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_settings_drive_resources() {
    let mut store = SettingsStore::new();
    store.set(SHOW_ARMOR_POOL, false).unwrap();
    let config = RulesConfig::from_store(&store).unwrap();

    let derived = prepare_derived_data(&vault_hunter(), &config);
    assert!(!derived.resources.contains_key(&Resource::Armor));
}

#[test]
fn test_adapter_host_interface() {
    let mut adapter = ActorAdapter::new(vault_hunter(), RulesConfig::default());

    assert_eq!(adapter.check_formula("sneak").as_deref(), Some("1d20 + 2"));
    assert_eq!(adapter.check_formula("missing"), None);
    assert_eq!(adapter.get_roll_data()["talk"], 5);

    assert_eq!(adapter.spend_badass_tokens(2), Ok(1));
    assert!(adapter.spend_badass_tokens(2).is_err());
    assert_eq!(adapter.data().badass.tokens, 1);
}

#[test]
fn test_empty_document_derives_zeroes() {
    let derived = prepare_derived_data(&actor(json!({})), &RulesConfig::default());
    for kind in StatKind::ALL {
        let stat = derived.stats.get(kind);
        assert_eq!(stat.value, 0);
        assert_eq!(stat.mod_to_use, 0);
    }
    assert!(derived.checks.is_empty());
}

#[test]
fn test_null_fields_still_derive() {
    let adapter = ActorAdapter::from_json(
        r#"{
            "level": null,
            "stats": { "acc": { "misc": null } },
            "archetypes": [{ "baseStats": { "acc": "4", "dmg": null } }],
            "checks": { "aim": { "stat": "acc", "base": "abc", "misc": 1 } },
            "items": [
                { "name": "Gun", "type": "weapon", "equipped": null, "gearBonus": { "acc": 3 } },
                { "type": "levelUp", "levelUp": { "skillPoints": null, "stats": { "acc": 2 } } }
            ]
        }"#,
        RulesConfig::default(),
    )
    .unwrap();
    let derived = adapter.prepare_derived_data();

    assert_eq!(derived.level, 0);
    assert_eq!(derived.stats.get(StatKind::Accuracy).value, 6);
    assert_eq!(derived.stats.get(StatKind::Accuracy).item_bonus, 0);
    assert_eq!(derived.level_bonus.skill_points, 0);
    assert_eq!(derived.checks["aim"].total, 4);
}

#[test]
fn test_bad_json_is_rejected() {
    assert!(ActorAdapter::from_json("not json", RulesConfig::default()).is_err());
}

#[test]
fn test_damage_roll_through_adapter() {
    let mut hunter = vault_hunter();
    hunter.items.push(
        serde_json::from_value(json!({
            "name": "Maliwan Shotgun",
            "type": "weapon",
            "weaponType": "sg",
            "damage": {
                "kinetic": { "enabled": true, "damage": "2d6" },
                "corrosive": { "enabled": true, "damage": "1d6" }
            },
            "accuracy": {
                "low": { "hits": 1 },
                "mid": { "hits": 2 },
                "high": { "hits": 2, "crits": 1 }
            }
        }))
        .unwrap(),
    );
    let adapter = ActorAdapter::new(hunter, RulesConfig::default());
    let item = adapter.data().item("Maliwan Shotgun").unwrap();
    let outcome = item.accuracy.resolve(12, 10);

    let roll = adapter.roll_damage("Maliwan Shotgun", &outcome, false).unwrap();
    assert_eq!(roll.formula, "(2d6 + 2d6)[Kinetic] + (1d6 + 1d6)[Corrosive]");
    assert!(roll.warning.is_none());
    assert!(!roll.favored.is_favored());

    let missing = adapter.roll_damage("Nope", &outcome, false);
    assert!(missing.is_err());
}
