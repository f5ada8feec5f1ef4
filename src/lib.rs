//! # bnbstat - Bunkers & Badasses Rules Calculations
//!
//! Derived stats, check totals, level-up bonuses and damage formulas for
//! Bunkers & Badasses characters. The host application owns documents,
//! dice and rendering; this crate turns a snapshot into numbers and
//! formula strings.
//!
//! - **Deterministic**: the same snapshot always yields the same output
//! - **Stateless**: every pass recomputes from scratch, nothing is cached
//! - **Lenient**: missing, `null` or mistyped data defaults to zero or empty and never fails
//!
//! ## Pipeline
//!
//! ```text
//! [ActorData] → [LevelBonusTotals] → [Stat] → [Check] → [RollData]
//!                                       │
//! [ItemData] + [AttackOutcome] ─────────┴──→ [DamageSummary] → formula
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bnbstat::*;
//! use bnbstat::accuracy::AttackOutcome;
//!
//! let json = r#"{
//!     "archetypes": [{ "baseStats": { "dmg": 6 } }],
//!     "favored": { "weaponTypes": ["ps"] },
//!     "items": [{
//!         "name": "Jakobs Pistol",
//!         "type": "weapon",
//!         "weaponType": "ps",
//!         "damage": { "kinetic": { "enabled": true, "damage": "1d8" } }
//!     }]
//! }"#;
//! let adapter = ActorAdapter::from_json(json, RulesConfig::default()).unwrap();
//! let outcome = AttackOutcome { hits: 1, crits: 0, natural_20: false };
//! let roll = adapter.roll_damage("Jakobs Pistol", &outcome, false).unwrap();
//!
//! assert_eq!(roll.formula, "(1d8 + 3)[Kinetic]");
//! ```
//!
//! ## Modules
//!
//! - [`mixed`] - Number plus dice-expression accumulator
//! - [`element`] - Stats, damage types, weapon types, buckets
//! - [`actor`] - Actor and item snapshots
//! - [`defaults`] - Zeroed templates
//! - [`stats`] - Stat derivation
//! - [`checks`] - Check totals
//! - [`level_bonus`] - Level-up reward aggregation
//! - [`favored`] - Favored weapon type and element resolution
//! - [`damage`] - Damage formula assembly
//! - [`accuracy`] - Hits and crits from accuracy tables
//! - [`prepare`] - Entry points and host adapter
//! - [`config`] - Rules configuration and settings store
//! - [`error`] - Error and warning types

pub mod accuracy;
pub mod actor;
pub mod checks;
pub mod config;
pub mod damage;
pub mod defaults;
pub mod element;
pub mod error;
pub mod favored;
pub mod level_bonus;
pub mod mixed;
pub mod prepare;
pub mod stats;

// Re-export main types for convenience
pub use actor::{ActorData, ItemData};
pub use config::{Resource, RulesConfig, SettingsStore};
pub use damage::{DamageBonus, DamageFormula, DamageSummary};
pub use element::{BucketKey, DamageType, StatKind, WeaponType};
pub use error::{RollWarning, RulesError};
pub use level_bonus::LevelBonusTotals;
pub use mixed::{BonusTerm, MixedValue, NumberLocation};
pub use prepare::{
    get_roll_data, prepare_derived_data, roll_weapon_damage, ActorAdapter, DamageRoll,
    DerivedActor, HostDocument, RollData,
};
