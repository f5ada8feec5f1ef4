//! Favored weapon types and elements.
//!
//! A character favors some weapon types and some elements. An attack that
//! matches adds the character's damage stat as bonus damage. When more than
//! one favored element applies, the bonus goes to the shared elemental
//! bucket once instead of once per element.

use crate::actor::{FavoredTags, ItemData, ItemKind};
use crate::damage::DamageBonus;
use crate::element::{DamageType, WeaponType};
use crate::mixed::{BonusTerm, MixedValue};
use std::collections::BTreeSet;

/// Which favored tags an attack matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoredBy {
    pub weapon_types: BTreeSet<WeaponType>,
    pub elements: BTreeSet<DamageType>,
}

/// Where a favored bonus is deposited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoredTarget {
    Element(DamageType),
    Elemental,
    Untyped,
}

impl FavoredBy {
    /// Work out what `item` is favored by.
    ///
    /// A weapon with an alternate type resolves to its primary type if that
    /// is favored, otherwise to the alternate if that is. A grenade item
    /// with no weapon type counts as a grenade.
    pub fn resolve(item: &ItemData, tags: &FavoredTags) -> Self {
        let primary = item
            .weapon_type
            .or((item.kind == ItemKind::Grenade).then_some(WeaponType::Grenade));
        let resolved = match (primary, item.alt_weapon_type) {
            (Some(primary), Some(alt)) => {
                if tags.weapon_types.contains(&primary) {
                    Some(primary)
                } else if tags.weapon_types.contains(&alt) {
                    Some(alt)
                } else {
                    None
                }
            }
            (Some(primary), None) => tags.weapon_types.contains(&primary).then_some(primary),
            (None, _) => None,
        };

        let elements = item
            .damage
            .iter()
            .chain(item.bonus_damage.iter())
            .filter(|(_, entry)| entry.active().is_some())
            .map(|(t, _)| *t)
            .filter(|t| tags.elements.contains(t))
            .collect();

        Self {
            weapon_types: resolved.into_iter().collect(),
            elements,
        }
    }

    pub fn is_favored(&self) -> bool {
        !self.weapon_types.is_empty() || !self.elements.is_empty()
    }

    /// Bucket a favored bonus goes to, if any.
    pub fn target(&self) -> Option<FavoredTarget> {
        let mut elements = self.elements.iter();
        match (elements.next(), elements.next()) {
            (Some(only), None) => Some(FavoredTarget::Element(*only)),
            (Some(_), Some(_)) => Some(FavoredTarget::Elemental),
            (None, _) if !self.weapon_types.is_empty() => Some(FavoredTarget::Untyped),
            (None, _) => None,
        }
    }

    /// The bonus to add for this attack, given the flat damage bonus a
    /// favored attack earns.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bnbstat::favored::FavoredBy;
    /// use bnbstat::element::DamageType;
    /// use bnbstat::BonusTerm;
    ///
    /// let favored = FavoredBy {
    ///     elements: [DamageType::Shock, DamageType::Cryo].into_iter().collect(),
    ///     ..Default::default()
    /// };
    /// let bonus = favored.bonus(&BonusTerm::Flat(4));
    /// assert_eq!(bonus.elemental.num, 4);
    /// assert_eq!(bonus.numeric_total(), 4);
    /// ```
    pub fn bonus(&self, amount: &BonusTerm) -> DamageBonus {
        let mut bonus = DamageBonus::default();
        let Some(target) = self.target() else {
            return bonus;
        };
        let mut value = MixedValue::default();
        value.apply_term(amount);
        match target {
            FavoredTarget::Element(element) => bonus.add_element(element, &value),
            FavoredTarget::Elemental => bonus.elemental = value,
            FavoredTarget::Untyped => bonus.untyped = value,
        }
        tracing::debug!(?target, "favored bonus applied");
        bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{DamageEntry, DamageMap};

    fn weapon(weapon_type: WeaponType, alt: Option<WeaponType>, per_hit: DamageMap) -> ItemData {
        ItemData {
            name: "Gun".into(),
            kind: ItemKind::Weapon,
            weapon_type: Some(weapon_type),
            alt_weapon_type: alt,
            damage: per_hit,
            ..Default::default()
        }
    }

    fn tags(types: &[WeaponType], elements: &[DamageType]) -> FavoredTags {
        FavoredTags {
            weapon_types: types.iter().copied().collect(),
            elements: elements.iter().copied().collect(),
        }
    }

    #[test]
    fn test_alt_type_resolves_to_favored_category() {
        let item = weapon(WeaponType::Pistol, Some(WeaponType::SubmachineGun), DamageMap::new());
        let by = FavoredBy::resolve(&item, &tags(&[WeaponType::SubmachineGun], &[]));
        assert_eq!(
            by.weapon_types.into_iter().collect::<Vec<_>>(),
            vec![WeaponType::SubmachineGun]
        );

        let by = FavoredBy::resolve(&item, &tags(&[WeaponType::Shotgun], &[]));
        assert!(!by.is_favored());
    }

    #[test]
    fn test_elements_from_hit_and_bonus_maps() {
        let mut item = weapon(
            WeaponType::Shotgun,
            None,
            DamageMap::from([(DamageType::Shock, DamageEntry::new("1d6"))]),
        );
        item.bonus_damage = DamageMap::from([
            (DamageType::Cryo, DamageEntry::new("1d4")),
            (
                DamageType::Corrosive,
                DamageEntry {
                    enabled: false,
                    damage: Some(BonusTerm::Flat(2)),
                },
            ),
        ]);
        let by = FavoredBy::resolve(
            &item,
            &tags(&[], &[DamageType::Shock, DamageType::Cryo, DamageType::Corrosive]),
        );
        assert_eq!(by.elements.len(), 2);
        assert_eq!(by.target(), Some(FavoredTarget::Elemental));
    }

    #[test]
    fn test_single_element_target() {
        let item = weapon(
            WeaponType::SniperRifle,
            None,
            DamageMap::from([(DamageType::Incendiary, DamageEntry::new("2d6"))]),
        );
        let by = FavoredBy::resolve(
            &item,
            &tags(&[WeaponType::SniperRifle], &[DamageType::Incendiary]),
        );
        assert_eq!(by.target(), Some(FavoredTarget::Element(DamageType::Incendiary)));
        let bonus = by.bonus(&BonusTerm::Flat(3));
        assert_eq!(bonus.elements[&DamageType::Incendiary].num, 3);
        assert!(bonus.untyped.is_empty());
    }

    #[test]
    fn test_weapon_only_goes_untyped() {
        let item = weapon(
            WeaponType::CombatRifle,
            None,
            DamageMap::from([(DamageType::Kinetic, DamageEntry::new("1d8"))]),
        );
        let by = FavoredBy::resolve(&item, &tags(&[WeaponType::CombatRifle], &[]));
        let bonus = by.bonus(&BonusTerm::Flat(2));
        assert_eq!(bonus.untyped.num, 2);
        assert_eq!(bonus.numeric_total(), 2);
    }

    #[test]
    fn test_grenade_item_counts_as_grenade_type() {
        let item = ItemData {
            name: "Sticky".into(),
            kind: ItemKind::Grenade,
            damage: DamageMap::from([(DamageType::Explosive, DamageEntry::new("2d6"))]),
            ..Default::default()
        };
        let by = FavoredBy::resolve(&item, &tags(&[WeaponType::Grenade], &[]));
        assert_eq!(by.target(), Some(FavoredTarget::Untyped));

        let by = FavoredBy::resolve(&item, &tags(&[WeaponType::Pistol], &[]));
        assert!(!by.is_favored());
    }

    #[test]
    fn test_unfavored_adds_nothing() {
        let item = weapon(WeaponType::RocketLauncher, None, DamageMap::new());
        let by = FavoredBy::resolve(&item, &FavoredTags::default());
        assert_eq!(by.target(), None);
        assert!(by.bonus(&BonusTerm::Flat(5)).is_empty());
    }
}
