//! Shooter Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (gameplay layer третьего лица shooter'а)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = gameplay layer (combat state machine, inventory, pickup flow, damage)
//! - Движок = presentation layer (traces, коллайдеры, montages, звуки, behaviour tree)
//!
//! Граница — только Bevy events: движок шлёт ввод/попадания/overlaps,
//! ECS отвечает PresentationCommand, BlackboardUpdate и UI events.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod item_system;
pub mod logger;
pub mod pickup;
pub mod presentation;
pub mod scheduler;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, Blackboard, BlackboardKey, BlackboardUpdate, BlackboardValue};
pub use combat::{
    BulletHit, CombatPlugin, DamageDealt, Dead, EntityDied, Enemy, EnemyCommand, Explosive,
    ExplosiveOverlap, Shooter, ShooterAction, ShooterInput, Weapon, WeaponFired,
};
pub use components::*;
pub use config::{EnemyConfig, ShooterConfig};
pub use item_system::{AmmoCategory, GameTables, ItemRarity, TableError, WeaponKind};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use pickup::PickupPlugin;
pub use presentation::{PresentationCommand, PresentationCue, PresentationPlugin};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            // Data tables и конфиги: хост может вставить свои до плагина
            .init_resource::<GameTables>()
            .init_resource::<ShooterConfig>()
            .init_resource::<EnemyConfig>()
            // Подсистемы
            .add_plugins((CombatPlugin, PickupPlugin, AIPlugin, PresentationPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Все случайные решения (stun rolls, секции атак, hit react cooldown)
/// идут через него, поэтому одинаковый seed + одинаковые events = одинаковый мир.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, SimulationPlugin))
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Заспавнить персонажа со стартовым оружием из `ShooterConfig`/`GameTables`
pub fn spawn_shooter(world: &mut World) -> Result<Entity, TableError> {
    let config = world
        .get_resource::<ShooterConfig>()
        .cloned()
        .unwrap_or_default();
    let tables = world.get_resource::<GameTables>().cloned().unwrap_or_default();

    let health = Health::new(config.max_health);
    let shooter = Shooter::from_tables(config, &tables)?;

    let entity = world.spawn((shooter, health)).id();
    log(&format!("🧍 Spawned shooter {:?}", entity));
    Ok(entity)
}

/// Заспавнить врага по `EnemyConfig`
pub fn spawn_enemy(world: &mut World) -> Entity {
    let config = world
        .get_resource::<EnemyConfig>()
        .cloned()
        .unwrap_or_default();

    let health = Health::new(config.max_health);
    let entity = world
        .spawn((Enemy::new(config), health, Blackboard::default()))
        .id();
    log(&format!("👹 Spawned enemy {:?}", entity));
    entity
}

/// Заспавнить взрывчатку (overlaps сообщает движок)
pub fn spawn_explosive(world: &mut World, damage: f32) -> Entity {
    let entity = world.spawn(Explosive::new(damage)).id();
    log(&format!("🛢️ Spawned explosive {:?}", entity));
    entity
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия: Debug представление компонентов)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
