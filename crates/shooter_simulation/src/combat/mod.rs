//! Combat system module (engine-driven combat architecture)
//!
//! ECS ответственность:
//! - Game state: Shooter (CombatState, inventory, ammo), Enemy, Health
//! - Combat rules: fire/reload/equip/stun state machine, damage, stun rolls
//! - Events: WeaponFired, DamageDealt, EntityDied, slot UI events
//!
//! Движок ответственность:
//! - Bullet trace от ствола → BulletHit
//! - Коллайдеры врага (weapon, agro, combat range) → EnemyWeaponHit / EnemySensorOverlap
//! - Montages, звуки, particles (читает PresentationCommand)
//! - Behaviour tree врага (читает BlackboardUpdate, шлёт EnemyCommand)

use bevy::prelude::*;

pub mod damage;
pub mod enemy;
pub mod events;
pub mod explosive;
pub mod shooter;
pub mod systems;
pub mod weapon;

#[cfg(test)]
mod enemy_tests;

// Re-export основных типов
pub use damage::{DamageDealt, Dead, DespawnAfter, EntityDied, HitOutcome, Mortal};
pub use enemy::{Enemy, EnemyEvent, EnemyWeaponSide};
pub use events::{
    BulletHit, EnemyAction, EnemyCommand, EnemySensor, EnemySensorOverlap, EnemyWeaponHit,
    ExplosiveOverlap, InventorySlotChanged, InventorySlotHighlight, ShooterInput, WeaponDropped,
};
pub use explosive::Explosive;
pub use shooter::{Shooter, ShooterAction, ShooterEvent};
pub use weapon::{Weapon, WeaponFired};

/// Combat Plugin (engine-driven architecture)
///
/// Регистрирует combat системы в FixedUpdate (60Hz).
///
/// Порядок выполнения:
/// 1. Входящие events: ввод, команды врагам, сенсоры, overlaps взрывчатки
/// 2. Попадания: пули персонажа, взрывы, melee врагов
/// 3. Таймеры записей
/// 4. Flush outbox → events (presentation, blackboard, UI)
/// 5. Despawn мёртвых врагов
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<ShooterInput>()
            .add_event::<BulletHit>()
            .add_event::<EnemyWeaponHit>()
            .add_event::<EnemySensorOverlap>()
            .add_event::<ExplosiveOverlap>()
            .add_event::<EnemyCommand>()
            .add_event::<WeaponFired>()
            .add_event::<WeaponDropped>()
            .add_event::<InventorySlotChanged>()
            .add_event::<InventorySlotHighlight>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        // Регистрация систем в FixedUpdate
        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: входящие events
                systems::process_shooter_input,
                systems::process_enemy_commands,
                systems::process_enemy_sensors,
                systems::process_explosive_overlaps,

                // Фаза 2: попадания
                systems::process_bullet_hits,
                systems::process_explosive_hits,
                systems::process_enemy_weapon_hits,

                // Фаза 3: таймеры
                systems::tick_shooters,
                systems::tick_enemies,

                // Фаза 4: outbox → events
                systems::flush_shooter_events,
                systems::flush_enemy_events,

                // Фаза 5: уборка
                damage::despawn_after_timeout,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
