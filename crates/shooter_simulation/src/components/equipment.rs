//! Equipment components
//!
//! # Архитектура
//!
//! **Inventory** — упорядоченный массив оружия (capacity 6):
//! - `slot_index` каждого оружия == его позиции в массиве
//! - `equipped` указывает какое оружие сейчас в руках
//! - Оружие — owned value: пока лежит в inventory, отдельной entity нет
//!
//! **AmmoMap** — запас патронов по категориям (заполняется один раз при спавне)
//!
//! **InterpSlots** — anchor points для предметов в полёте к персонажу:
//! - [0] weapon hand (не участвует в least-loaded выборе)
//! - [1..] generic anchors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::combat::Weapon;
use crate::item_system::AmmoCategory;

/// Максимум оружия в inventory
pub const INVENTORY_CAPACITY: usize = 6;

/// Sentinel: "нет слота" / "inventory полон" / "оружие не в inventory"
pub const EMPTY_SLOT: i32 = -1;

// ============================================================================
// Inventory
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    weapons: Vec<Weapon>,
    equipped: Option<usize>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.weapons.len() >= INVENTORY_CAPACITY
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn weapons_mut(&mut self) -> impl Iterator<Item = &mut Weapon> {
        self.weapons.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Weapon> {
        self.weapons.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Weapon> {
        self.weapons.get_mut(index)
    }

    pub fn equipped_index(&self) -> Option<usize> {
        self.equipped
    }

    pub fn equipped(&self) -> Option<&Weapon> {
        self.equipped.and_then(|index| self.weapons.get(index))
    }

    pub fn equipped_mut(&mut self) -> Option<&mut Weapon> {
        self.equipped.and_then(|index| self.weapons.get_mut(index))
    }

    /// Slot index экипированного оружия (EMPTY_SLOT если ничего нет)
    pub fn equipped_slot(&self) -> i32 {
        self.equipped().map_or(EMPTY_SLOT, |weapon| weapon.slot_index)
    }

    pub(crate) fn set_equipped(&mut self, index: Option<usize>) {
        self.equipped = index.filter(|index| *index < self.weapons.len());
    }

    /// Добавить оружие в конец. Полный inventory возвращает оружие обратно.
    pub fn push(&mut self, mut weapon: Weapon) -> Result<usize, Weapon> {
        if self.is_full() {
            return Err(weapon);
        }

        let index = self.weapons.len();
        weapon.slot_index = index as i32;
        self.weapons.push(weapon);
        Ok(index)
    }

    /// Заменить оружие в слоте (новое получает тот же slot index)
    pub fn replace(&mut self, index: usize, mut weapon: Weapon) -> Result<Weapon, Weapon> {
        let Some(slot) = self.weapons.get_mut(index) else {
            return Err(weapon);
        };

        weapon.slot_index = index as i32;
        let mut old = std::mem::replace(slot, weapon);
        old.slot_index = EMPTY_SLOT;
        Ok(old)
    }

    /// Вынуть экипированное оружие; остальные слоты сдвигаются и переиндексируются
    pub fn take_equipped(&mut self) -> Option<Weapon> {
        let index = self.equipped.take()?;
        if index >= self.weapons.len() {
            return None;
        }

        let mut weapon = self.weapons.remove(index);
        weapon.slot_index = EMPTY_SLOT;

        for (position, remaining) in self.weapons.iter_mut().enumerate() {
            remaining.slot_index = position as i32;
        }

        Some(weapon)
    }

    /// Первый пустой слот, иначе следующий append index, иначе EMPTY_SLOT
    ///
    /// Массив без дыр, поэтому "первый пустой" == append index.
    pub fn empty_slot(&self) -> i32 {
        if self.weapons.len() < INVENTORY_CAPACITY {
            self.weapons.len() as i32
        } else {
            EMPTY_SLOT
        }
    }

    /// size ≤ capacity, slot indices уникальны и равны позиции, ammo в пределах магазина
    pub fn is_consistent(&self) -> bool {
        self.weapons.len() <= INVENTORY_CAPACITY
            && self
                .weapons
                .iter()
                .enumerate()
                .all(|(position, weapon)| {
                    weapon.slot_index == position as i32 && weapon.ammo <= weapon.magazine_capacity
                })
            && self.equipped.is_none_or(|index| index < self.weapons.len())
    }
}

// ============================================================================
// AmmoMap
// ============================================================================

/// Запас патронов по категориям. Отсутствующая категория == 0 патронов.
///
/// BTreeMap — детерминированный порядок для snapshot'ов.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoMap {
    carried: BTreeMap<AmmoCategory, u32>,
}

impl AmmoMap {
    pub fn seeded(light: u32, rifle: u32, sniper: u32) -> Self {
        let mut carried = BTreeMap::new();
        carried.insert(AmmoCategory::Light, light);
        carried.insert(AmmoCategory::Rifle, rifle);
        carried.insert(AmmoCategory::Sniper, sniper);
        Self { carried }
    }

    pub fn get(&self, category: AmmoCategory) -> u32 {
        self.carried.get(&category).copied().unwrap_or(0)
    }

    pub fn contains(&self, category: AmmoCategory) -> bool {
        self.carried.contains_key(&category)
    }

    pub fn set(&mut self, category: AmmoCategory, amount: u32) {
        self.carried.insert(category, amount);
    }

    pub fn add(&mut self, category: AmmoCategory, amount: u32) {
        let entry = self.carried.entry(category).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Забрать до `amount` патронов, вернуть сколько реально забрали
    pub fn take(&mut self, category: AmmoCategory, amount: u32) -> u32 {
        let Some(entry) = self.carried.get_mut(&category) else {
            return 0;
        };

        let taken = amount.min(*entry);
        *entry -= taken;
        taken
    }
}

// ============================================================================
// InterpSlots
// ============================================================================

/// Index weapon-hand anchor'а
pub const WEAPON_INTERP_SLOT: usize = 0;

/// Счётчики предметов в полёте к каждому anchor point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpSlots {
    items_in_flight: Vec<u32>,
}

impl Default for InterpSlots {
    fn default() -> Self {
        Self::with_generic_slots(6)
    }
}

impl InterpSlots {
    /// Weapon hand + `generic` обычных anchors
    pub fn with_generic_slots(generic: usize) -> Self {
        Self {
            items_in_flight: vec![0; generic + 1],
        }
    }

    pub fn len(&self) -> usize {
        self.items_in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items_in_flight.is_empty()
    }

    pub fn items_in_flight(&self, index: usize) -> u32 {
        self.items_in_flight.get(index).copied().unwrap_or(0)
    }

    /// Least-loaded слот среди index ≥ 1 (tie → меньший index)
    ///
    /// Strict `<` при скане гарантирует что при равенстве побеждает первый.
    pub fn select_least_loaded(&self) -> usize {
        let mut lowest_index = if self.items_in_flight.len() > 1 { 1 } else { WEAPON_INTERP_SLOT };
        let mut lowest_count = u32::MAX;

        for (index, count) in self.items_in_flight.iter().enumerate().skip(1) {
            if *count < lowest_count {
                lowest_index = index;
                lowest_count = *count;
            }
        }

        lowest_index
    }

    pub fn reserve(&mut self, index: usize) {
        if let Some(count) = self.items_in_flight.get_mut(index) {
            *count += 1;
        }
    }

    /// Floor 0: лишний release не уводит счётчик в минус
    pub fn release(&mut self, index: usize) {
        if let Some(count) = self.items_in_flight.get_mut(index) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn total_in_flight(&self) -> u32 {
        self.items_in_flight.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_system::{GameTables, ItemRarity, WeaponKind};

    fn rifle() -> Weapon {
        GameTables::default()
            .build_weapon(WeaponKind::AssaultRifle, ItemRarity::Common)
            .unwrap()
    }

    #[test]
    fn test_inventory_never_exceeds_capacity() {
        let mut inventory = Inventory::new();
        for expected in 0..INVENTORY_CAPACITY {
            assert_eq!(inventory.empty_slot(), expected as i32);
            assert_eq!(inventory.push(rifle()).unwrap(), expected);
        }

        assert!(inventory.is_full());
        assert_eq!(inventory.empty_slot(), EMPTY_SLOT);
        assert!(inventory.push(rifle()).is_err());
        assert_eq!(inventory.len(), INVENTORY_CAPACITY);
        assert!(inventory.is_consistent());
    }

    #[test]
    fn test_replace_keeps_slot_index() {
        let mut inventory = Inventory::new();
        inventory.push(rifle()).unwrap();
        inventory.push(rifle()).unwrap();

        let sniper = GameTables::default()
            .build_weapon(WeaponKind::SniperRifle, ItemRarity::Rare)
            .unwrap();
        let old = inventory.replace(1, sniper).unwrap();

        assert_eq!(old.slot_index, EMPTY_SLOT);
        assert_eq!(inventory.get(1).unwrap().kind, WeaponKind::SniperRifle);
        assert_eq!(inventory.get(1).unwrap().slot_index, 1);
        assert!(inventory.replace(5, rifle()).is_err());
        assert!(inventory.is_consistent());
    }

    #[test]
    fn test_take_equipped_reindexes() {
        let mut inventory = Inventory::new();
        for _ in 0..3 {
            inventory.push(rifle()).unwrap();
        }
        inventory.set_equipped(Some(0));

        let dropped = inventory.take_equipped().unwrap();
        assert_eq!(dropped.slot_index, EMPTY_SLOT);
        assert_eq!(inventory.equipped_index(), None);
        assert_eq!(inventory.len(), 2);
        assert!(inventory.is_consistent());

        // Ничего не экипировано → нечего вынимать
        assert!(inventory.take_equipped().is_none());
    }

    #[test]
    fn test_ammo_map_take_is_bounded() {
        let mut ammo = AmmoMap::seeded(60, 120, 30);
        assert_eq!(ammo.take(AmmoCategory::Sniper, 50), 30);
        assert_eq!(ammo.get(AmmoCategory::Sniper), 0);

        ammo.add(AmmoCategory::Light, 15);
        assert_eq!(ammo.get(AmmoCategory::Light), 75);

        let mut empty = AmmoMap::default();
        assert_eq!(empty.get(AmmoCategory::Rifle), 0);
        assert_eq!(empty.take(AmmoCategory::Rifle, 10), 0);
        assert!(!empty.contains(AmmoCategory::Rifle));
    }

    #[test]
    fn test_least_loaded_tie_break() {
        // [1: 0 items, 2: 0 items, 3: 1 item] → 1
        let mut slots = InterpSlots::with_generic_slots(3);
        slots.reserve(3);
        assert_eq!(slots.select_least_loaded(), 1);

        slots.reserve(1);
        assert_eq!(slots.select_least_loaded(), 2);
    }

    #[test]
    fn test_weapon_hand_slot_never_selected() {
        let mut slots = InterpSlots::default();
        assert_eq!(slots.len(), 7);

        for index in 1..slots.len() {
            slots.reserve(index);
        }
        // Hand пустой, но не участвует в скане
        assert_eq!(slots.select_least_loaded(), 1);
    }

    #[test]
    fn test_release_floors_at_zero() {
        let mut slots = InterpSlots::default();
        slots.reserve(2);
        slots.release(2);
        slots.release(2);
        assert_eq!(slots.items_in_flight(2), 0);
        assert_eq!(slots.total_in_flight(), 0);
    }
}
