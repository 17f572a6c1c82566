//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: здоровье (Health)
//! - combat: боевое состояние персонажа (CombatState)
//! - item: lifecycle подбираемых предметов (ItemState, ItemRecord, Pickup)
//! - equipment: inventory, запас патронов, interp slots

pub mod actor;
pub mod combat;
pub mod equipment;
pub mod item;

// Re-exports для удобного импорта
pub use actor::*;
pub use combat::*;
pub use equipment::*;
pub use item::*;
