//! Weapon — оружие как owned value + weapon events
//!
//! Architecture:
//! - Создаётся из `GameTables::build_weapon` (rarity multiplier применён сразу)
//! - Пока в inventory — живёт внутри `Inventory`, без своей entity
//! - Выброшено/лежит в мире — внутри `Pickup::Weapon` на world entity
//! - Никогда не расходуется (в отличие от патронов)

use bevy::prelude::*;

use crate::components::{ItemRecord, ItemState};
use crate::item_system::{AmmoCategory, WeaponKind};

#[derive(Debug, Clone)]
pub struct Weapon {
    pub item: ItemRecord,
    pub kind: WeaponKind,
    pub ammo_category: AmmoCategory,
    pub magazine_capacity: u32,
    /// Инвариант: 0 ≤ ammo ≤ magazine_capacity
    pub ammo: u32,
    pub base_damage: f32,
    pub headshot_damage: f32,
    /// Секунды между автоматическими выстрелами
    pub auto_fire_rate: f32,
    pub can_auto_fire: bool,
    /// Секция reload montage
    pub reload_section: String,
    /// Позиция в inventory (EMPTY_SLOT если не в inventory)
    pub slot_index: i32,
}

impl Weapon {
    pub fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    pub fn is_magazine_full(&self) -> bool {
        self.ammo >= self.magazine_capacity
    }

    pub fn empty_space(&self) -> u32 {
        self.magazine_capacity.saturating_sub(self.ammo)
    }

    /// Floor at 0
    pub fn decrement_ammo(&mut self) {
        self.ammo = self.ammo.saturating_sub(1);
    }

    /// Зарядить `amount` патронов в магазин
    ///
    /// Переполнение магазина — баг учёта выше по стеку, не runtime ситуация.
    pub fn reload_ammo(&mut self, amount: u32) {
        assert!(
            self.ammo + amount <= self.magazine_capacity,
            "Attempted to reload with more than magazine capacity"
        );
        self.ammo += amount;
    }

    /// Урон по голове или по телу (rarity уже учтён)
    pub fn damage_for(&self, is_headshot: bool) -> f32 {
        if is_headshot {
            self.headshot_damage
        } else {
            self.base_damage
        }
    }

    pub fn state(&self) -> ItemState {
        self.item.state()
    }

    pub fn set_state(&mut self, state: ItemState) {
        self.item.set_state(state);
    }

    pub fn is_pistol(&self) -> bool {
        self.kind == WeaponKind::Pistol
    }
}

/// Event: персонаж выстрелил (ECS → движок)
///
/// Движок делает trace от ствола и возвращает `BulletHit`.
#[derive(Event, Debug, Clone)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub kind: WeaponKind,
    /// Патронов в магазине после выстрела
    pub ammo_left: u32,
}
