//! Combat events (движок ↔ ECS)
//!
//! Входящие: ввод игрока, результаты traces, overlaps коллайдеров врага,
//! команды behaviour tree и anim notifies.
//! Исходящие: смена/подсветка слотов inventory (UI).

use bevy::prelude::*;

use crate::combat::enemy::EnemyWeaponSide;
use crate::combat::shooter::ShooterAction;

/// Event: действие игрока для конкретного персонажа
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShooterInput {
    pub character: Entity,
    pub action: ShooterAction,
}

/// Event: результат bullet trace от ствола (ответ на `WeaponFired`)
///
/// `target = None` — пуля ушла в стену/пол/небо.
#[derive(Event, Debug, Clone)]
pub struct BulletHit {
    pub shooter: Entity,
    pub target: Option<Entity>,
    /// Кость, в которую попал trace (headshot по имени кости)
    pub bone_name: String,
    pub location: Vec3,
}

/// Event: weapon коллайдер врага пересёкся с персонажем
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyWeaponHit {
    pub enemy: Entity,
    pub side: EnemyWeaponSide,
    pub character: Entity,
}

/// Event: overlap sphere взрывчатки пересеклась с персонажем/врагом
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplosiveOverlap {
    pub explosive: Entity,
    pub actor: Entity,
    /// true = begin overlap, false = end overlap
    pub entered: bool,
}

/// Какая сфера врага сработала
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemySensor {
    /// Большая сфера: заметил персонажа
    Agro,
    /// Малая сфера: персонаж в зоне атаки
    CombatRange,
}

/// Event: overlap сферы врага с персонажем
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemySensorOverlap {
    pub enemy: Entity,
    pub sensor: EnemySensor,
    pub character: Entity,
    /// true = begin overlap, false = end overlap
    pub entered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyAction {
    /// Behaviour tree task
    Attack,
    // Anim notifies
    ActivateWeapon(EnemyWeaponSide),
    DeactivateWeapon(EnemyWeaponSide),
    EndStun,
    FinishDeath,
}

/// Event: команда врагу от behaviour tree или анимации
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyCommand {
    pub enemy: Entity,
    pub action: EnemyAction,
}

/// Event: сменилось экипированное оружие (old = -1 если рук было пусто)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySlotChanged {
    pub character: Entity,
    pub old: i32,
    pub new: i32,
}

/// Event: подсветка слота, куда ляжет подбираемое оружие
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySlotHighlight {
    pub character: Entity,
    pub slot: i32,
    pub highlighted: bool,
}

/// Event: оружие выброшено и стало pickup entity
///
/// Движок создаёт визуал у персонажа и запускает физику падения.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponDropped {
    pub character: Entity,
    pub pickup: Entity,
}
