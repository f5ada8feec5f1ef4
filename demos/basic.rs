//! Basic example: derive a character sheet and roll weapon damage
//!
//! This example demonstrates:
//! - Loading an actor snapshot from JSON
//! - Deriving stats and checks through `ActorAdapter`
//! - Reading dice-evaluator variables
//! - Assembling a damage formula for a favored weapon

use bnbstat::*;

fn main() -> Result<(), RulesError> {
    let json = r#"{
        "name": "Mordecai",
        "level": 2,
        "badass": { "rank": 1, "tokens": 2 },
        "archetypes": [{ "name": "Sniper", "baseStats": { "acc": 5, "dmg": 4 } }],
        "class": { "name": "Hunter", "baseStats": { "spd": 2 } },
        "checks": {
            "shooting": { "stat": "acc", "attack": "shooting", "usesBadassRank": true },
            "sneak": { "stat": "spd", "base": 1 }
        },
        "favored": { "weaponTypes": ["sr"] },
        "items": [
            {
                "name": "Level 2",
                "type": "levelUp",
                "levelUp": { "stats": { "acc": 1 }, "skillPoints": 1 }
            },
            {
                "name": "Jakobs Sniper",
                "type": "weapon",
                "weaponType": "sr",
                "equipped": true,
                "inHand": true,
                "gearBonus": { "acc": 1 },
                "damage": { "kinetic": { "enabled": true, "damage": "1d12" } },
                "accuracy": {
                    "low": { "hits": 1 },
                    "mid": { "hits": 1, "crits": 1 },
                    "high": { "hits": 2, "crits": 1 }
                }
            }
        ]
    }"#;

    // Load the snapshot
    let adapter = ActorAdapter::from_json(json, RulesConfig::default())?;
    let derived = adapter.prepare_derived_data();

    println!("=== {} ===", adapter.data().name);
    for kind in StatKind::ALL {
        let stat = derived.stats.get(kind);
        println!(
            "{}: value {}, mod {}, gear {}",
            kind.abbr(),
            stat.value,
            stat.modifier,
            stat.item_bonus
        );
    }

    println!("\nChecks:");
    for name in derived.checks.keys() {
        if let Some(formula) = adapter.check_formula(name) {
            println!("  {}: {}", name, formula);
        }
    }

    println!("\nRoll data:");
    for (key, value) in adapter.get_roll_data() {
        println!("  {} = {}", key, value);
    }

    // Roll a 14 on the d20 with a check total of 9
    let Some(weapon) = adapter.data().item("Jakobs Sniper") else {
        return Ok(());
    };
    let outcome = weapon.accuracy.resolve(14, 9);
    println!(
        "\nAttack: {} hit(s), {} crit(s)",
        outcome.hits, outcome.crits
    );

    match adapter.roll_damage("Jakobs Sniper", &outcome, false) {
        Ok(roll) => println!("Damage: {}", roll.formula),
        Err(warning) => println!("Warning: {}", warning),
    }

    Ok(())
}
