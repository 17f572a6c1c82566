//! Pickup events (движок ↔ ECS)

use bevy::prelude::*;

/// Event: персонаж вошёл/вышел из area sphere предмета
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemOverlap {
    pub character: Entity,
    pub item: Entity,
    /// true = begin overlap, false = end overlap
    pub entered: bool,
}

/// Event: результат trace под прицелом за этот кадр
///
/// Движок трейсит только пока `ItemTraceToggle { enabled: true }`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTraceResult {
    pub character: Entity,
    pub hit: Option<Entity>,
}

/// Event: текущее значение z/scale curve для предмета в полёте
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ItemInterpScale {
    pub item: Entity,
    pub scale: f32,
}

/// Event: включить/выключить item trace у персонажа (ECS → движок)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTraceToggle {
    pub character: Entity,
    pub enabled: bool,
}

/// Event: предмет долетел и забран (pickup entity уже удалена)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ItemPickedUp {
    pub character: Entity,
    pub item: Entity,
    pub name: String,
}
