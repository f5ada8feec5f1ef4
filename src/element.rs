//! Fixed game vocabulary.
//!
//! Stats, damage types, weapon types and damage buckets are closed sets in
//! Bunkers & Badasses, so they are plain enums instead of interned strings.
//! Every enum serializes with the short key the host documents use.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four core character stats.
///
/// # Examples
///
/// ```rust
/// use bnbstat::StatKind;
///
/// assert_eq!(StatKind::Accuracy.abbr(), "acc");
/// assert_eq!(StatKind::from_abbr("mst"), Some(StatKind::Mastery));
/// ```
#[derive(
    Debug, Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum StatKind {
    #[default]
    #[serde(rename = "acc")]
    Accuracy,
    #[serde(rename = "dmg")]
    Damage,
    #[serde(rename = "spd")]
    Speed,
    #[serde(rename = "mst")]
    Mastery,
}

impl StatKind {
    /// All stats in sheet order.
    pub const ALL: [StatKind; 4] = [
        StatKind::Accuracy,
        StatKind::Damage,
        StatKind::Speed,
        StatKind::Mastery,
    ];

    /// Short key used in documents and roll data.
    pub fn abbr(self) -> &'static str {
        match self {
            StatKind::Accuracy => "acc",
            StatKind::Damage => "dmg",
            StatKind::Speed => "spd",
            StatKind::Mastery => "mst",
        }
    }

    pub fn from_abbr(abbr: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.abbr() == abbr)
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbr())
    }
}

/// A damage type. Everything except `Kinetic` is an element.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    Kinetic,
    Incendiary,
    Shock,
    Corrosive,
    Explosive,
    Radiation,
    Cryo,
}

impl DamageType {
    /// All damage types, kinetic first. This is also the serialization order
    /// of damage formulas.
    pub const ALL: [DamageType; 7] = [
        DamageType::Kinetic,
        DamageType::Incendiary,
        DamageType::Shock,
        DamageType::Corrosive,
        DamageType::Explosive,
        DamageType::Radiation,
        DamageType::Cryo,
    ];

    pub fn is_elemental(self) -> bool {
        self != DamageType::Kinetic
    }

    /// Document key, e.g. `"incendiary"`.
    pub fn key(self) -> &'static str {
        match self {
            DamageType::Kinetic => "kinetic",
            DamageType::Incendiary => "incendiary",
            DamageType::Shock => "shock",
            DamageType::Corrosive => "corrosive",
            DamageType::Explosive => "explosive",
            DamageType::Radiation => "radiation",
            DamageType::Cryo => "cryo",
        }
    }

    /// Label understood by the host dice evaluator's flavor syntax.
    pub fn label(self) -> &'static str {
        match self {
            DamageType::Kinetic => "Kinetic",
            DamageType::Incendiary => "Incendiary",
            DamageType::Shock => "Shock",
            DamageType::Corrosive => "Corrosive",
            DamageType::Explosive => "Explosive",
            DamageType::Radiation => "Radiation",
            DamageType::Cryo => "Cryo",
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Weapon categories a character can favor.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    #[serde(rename = "ps")]
    Pistol,
    #[serde(rename = "smg")]
    SubmachineGun,
    #[serde(rename = "sg")]
    Shotgun,
    #[serde(rename = "cr")]
    CombatRifle,
    #[serde(rename = "sr")]
    SniperRifle,
    #[serde(rename = "rl")]
    RocketLauncher,
    Melee,
    Grenade,
}

/// A slot damage is deposited into before formula serialization.
///
/// Ordering follows serialization order: the concrete types first (kinetic
/// leading), then the shared `Elemental` slot, then untyped `Damage`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum BucketKey {
    Type(DamageType),
    Elemental,
    Damage,
}

impl BucketKey {
    pub fn label(self) -> &'static str {
        match self {
            BucketKey::Type(t) => t.label(),
            BucketKey::Elemental => "Elemental",
            BucketKey::Damage => "Damage",
        }
    }
}

impl From<DamageType> for BucketKey {
    fn from(t: DamageType) -> Self {
        BucketKey::Type(t)
    }
}
