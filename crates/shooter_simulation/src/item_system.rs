//! Item System — статические data tables для оружия и rarity
//!
//! # Архитектура
//!
//! **GameTables** — immutable resource, инжектится при создании App:
//! - `weapons`: `WeaponKind → WeaponData` (ammo category, magazine, damage, fire rate)
//! - `rarities`: `ItemRarity → RarityData` (damage multiplier, stars, glow)
//!
//! Таблицы читаются ОДИН раз — при конфигурации оружия (`build_weapon`).
//! Rarity multiplier применяется сразу к base/headshot damage, дальше
//! `Weapon` живёт со своими готовыми числами.
//!
//! Hardcoded defaults в `GameTables::default()`; хост может подменить
//! resource десериализованной версией (serde).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::combat::Weapon;
use crate::components::ItemRecord;

/// Headshot = base damage × 2.5 (до rarity multiplier)
pub const HEADSHOT_MULTIPLIER: f32 = 2.5;

// ============================================================================
// Keys
// ============================================================================

/// Тип оружия (определяет строку в weapon table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Полуавтоматический пистолет (+ slide animation при выстреле)
    Pistol,
    /// Автоматическая винтовка
    AssaultRifle,
    /// Снайперская винтовка
    SniperRifle,
}

/// Семейство патронов. Каждое оружие потребляет ровно одну категорию.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
pub enum AmmoCategory {
    /// 9mm
    Light,
    /// Assault rifle
    Rifle,
    /// Sniper rifle
    Sniper,
}

/// Rarity предмета: damage multiplier + количество звёзд на widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum ItemRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl ItemRarity {
    /// Сколько звёзд активно на pickup widget (1-5)
    pub fn star_count(self) -> usize {
        match self {
            ItemRarity::Common => 1,
            ItemRarity::Uncommon => 2,
            ItemRarity::Rare => 3,
            ItemRarity::Epic => 4,
            ItemRarity::Legendary => 5,
        }
    }
}

// ============================================================================
// Rows
// ============================================================================

/// Строка weapon table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponData {
    pub name: String,
    pub ammo_category: AmmoCategory,
    /// Патронов в магазине при спавне
    pub starting_ammo: u32,
    pub magazine_capacity: u32,
    /// Base damage (до rarity multiplier)
    pub damage: f32,
    /// Секунды между автоматическими выстрелами
    pub auto_fire_rate: f32,
    pub can_auto_fire: bool,
    /// Секция reload montage (presentation)
    pub reload_section: String,
}

/// Строка rarity table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityData {
    pub damage_multiplier: f32,
    pub number_of_stars: u32,
    pub custom_depth_stencil: i32,
    /// RGBA glow (presentation)
    pub glow_color: [f32; 4],
}

/// Ошибки lookup'а в таблицах
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("weapon table has no row for {0:?}")]
    MissingWeapon(WeaponKind),
    #[error("rarity table has no row for {0:?}")]
    MissingRarity(ItemRarity),
}

// ============================================================================
// GameTables resource
// ============================================================================

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct GameTables {
    pub weapons: HashMap<WeaponKind, WeaponData>,
    pub rarities: HashMap<ItemRarity, RarityData>,
}

impl Default for GameTables {
    fn default() -> Self {
        let mut weapons = HashMap::new();
        weapons.insert(
            WeaponKind::Pistol,
            WeaponData {
                name: "Pistol".into(),
                ammo_category: AmmoCategory::Light,
                starting_ammo: 12,
                magazine_capacity: 12,
                damage: 20.0,
                auto_fire_rate: 0.2,
                can_auto_fire: false,
                reload_section: "Reload Pistol".into(),
            },
        );
        weapons.insert(
            WeaponKind::AssaultRifle,
            WeaponData {
                name: "Assault Rifle".into(),
                ammo_category: AmmoCategory::Rifle,
                starting_ammo: 30,
                magazine_capacity: 30,
                damage: 25.0,
                auto_fire_rate: 0.1,
                can_auto_fire: true,
                reload_section: "Reload AR".into(),
            },
        );
        weapons.insert(
            WeaponKind::SniperRifle,
            WeaponData {
                name: "Sniper Rifle".into(),
                ammo_category: AmmoCategory::Sniper,
                starting_ammo: 5,
                magazine_capacity: 5,
                damage: 80.0,
                auto_fire_rate: 1.0,
                can_auto_fire: false,
                reload_section: "Reload SR".into(),
            },
        );

        let mut rarities = HashMap::new();
        let rows = [
            (ItemRarity::Common, 1.0, [0.5, 0.5, 0.5, 1.0]),
            (ItemRarity::Uncommon, 1.1, [0.1, 0.8, 0.1, 1.0]),
            (ItemRarity::Rare, 1.25, [0.1, 0.3, 1.0, 1.0]),
            (ItemRarity::Epic, 1.5, [0.6, 0.1, 0.9, 1.0]),
            (ItemRarity::Legendary, 2.0, [1.0, 0.6, 0.0, 1.0]),
        ];
        for (rarity, damage_multiplier, glow_color) in rows {
            rarities.insert(
                rarity,
                RarityData {
                    damage_multiplier,
                    number_of_stars: rarity.star_count() as u32,
                    custom_depth_stencil: 250 + rarity.star_count() as i32,
                    glow_color,
                },
            );
        }

        Self { weapons, rarities }
    }
}

impl GameTables {
    pub fn weapon(&self, kind: WeaponKind) -> Result<&WeaponData, TableError> {
        self.weapons.get(&kind).ok_or(TableError::MissingWeapon(kind))
    }

    pub fn rarity(&self, rarity: ItemRarity) -> Result<&RarityData, TableError> {
        self.rarities
            .get(&rarity)
            .ok_or(TableError::MissingRarity(rarity))
    }

    /// Сконфигурировать оружие из таблиц
    ///
    /// Damage = table damage × rarity multiplier,
    /// headshot = table damage × 2.5 × rarity multiplier.
    pub fn build_weapon(&self, kind: WeaponKind, rarity: ItemRarity) -> Result<Weapon, TableError> {
        let data = self.weapon(kind)?;
        let rarity_row = self.rarity(rarity)?;
        let multiplier = rarity_row.damage_multiplier;

        let item = ItemRecord::new(data.name.clone(), rarity);

        Ok(Weapon {
            item,
            kind,
            ammo_category: data.ammo_category,
            magazine_capacity: data.magazine_capacity,
            ammo: data.starting_ammo.min(data.magazine_capacity),
            base_damage: data.damage * multiplier,
            headshot_damage: data.damage * HEADSHOT_MULTIPLIER * multiplier,
            auto_fire_rate: data.auto_fire_rate,
            can_auto_fire: data.can_auto_fire,
            reload_section: data.reload_section.clone(),
            slot_index: crate::components::EMPTY_SLOT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_stars() {
        assert_eq!(ItemRarity::Common.star_count(), 1);
        assert_eq!(ItemRarity::Legendary.star_count(), 5);
    }

    #[test]
    fn test_build_weapon_applies_rarity_multiplier() {
        let tables = GameTables::default();
        let weapon = tables
            .build_weapon(WeaponKind::AssaultRifle, ItemRarity::Legendary)
            .unwrap();

        assert_eq!(weapon.ammo_category, AmmoCategory::Rifle);
        assert_eq!(weapon.magazine_capacity, 30);
        assert_eq!(weapon.ammo, 30);
        assert_eq!(weapon.base_damage, 50.0); // 25 × 2.0
        assert_eq!(weapon.headshot_damage, 125.0); // 25 × 2.5 × 2.0
        assert!(weapon.can_auto_fire);
        assert_eq!(weapon.slot_index, crate::components::EMPTY_SLOT);
    }

    #[test]
    fn test_missing_rows_are_errors() {
        let mut tables = GameTables::default();
        tables.weapons.remove(&WeaponKind::SniperRifle);
        tables.rarities.remove(&ItemRarity::Epic);

        assert_eq!(
            tables.build_weapon(WeaponKind::SniperRifle, ItemRarity::Common).unwrap_err(),
            TableError::MissingWeapon(WeaponKind::SniperRifle)
        );
        assert_eq!(
            tables.build_weapon(WeaponKind::Pistol, ItemRarity::Epic).unwrap_err(),
            TableError::MissingRarity(ItemRarity::Epic)
        );
    }
}
