//! Damage & stun resolution
//!
//! Общая логика для персонажа и врага:
//! - `resolve_hit`: health = max(0, health - damage), смерть ровно один раз
//! - `roll_stun`: один uniform roll в [0, 1), stun если roll ≤ chance
//!
//! Смерть — терминальное one-way состояние (`Mortal::is_dead`).

use bevy::prelude::*;
use rand::Rng;

use crate::components::Health;
use crate::presentation::SoundCue;

/// Запись, которая умеет умирать (персонаж, враг)
pub trait Mortal {
    fn is_dead(&self) -> bool;

    /// Запуск death sequence. Вызывается не более одного раза.
    fn die(&mut self);
}

/// Результат одного попадания
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    /// Урон для bookkeeping (возвращается даже по мёртвому)
    pub damage: f32,
    /// Это попадание запустило смерть
    pub killed: bool,
}

/// Применить урон к defender'у
///
/// Повторный урон по мёртвому: health остаётся 0, death не перезапускается.
pub fn resolve_hit<M: Mortal>(health: &mut Health, defender: &mut M, damage: f32) -> HitOutcome {
    health.take_damage(damage);

    let killed = !health.is_alive() && !defender.is_dead();
    if killed {
        defender.die();
    }

    HitOutcome { damage, killed }
}

/// Stun roll: ровно один uniform draw в [0, 1)
pub fn roll_stun<R: Rng + ?Sized>(rng: &mut R, chance: f32) -> bool {
    let roll: f32 = rng.gen();
    roll <= chance
}

/// Звук попадания врага по персонажу (по здоровью ПОСЛЕ удара)
///
/// - health < damage → звук смерти (следующий удар убьёт)
/// - health ≤ 20% → critical health
/// - иначе обычный hit
pub fn character_hit_sound(health: &Health, damage: f32) -> SoundCue {
    if health.current < damage {
        SoundCue::CharacterDeath
    } else if health.fraction() <= 0.2 {
        SoundCue::CharacterCriticalHealth
    } else {
        SoundCue::CharacterHit
    }
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub headshot: bool,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв
///
/// Вешается вместе с EntityDied. Для хоста/UI: системы его не фильтруют,
/// death notifies (FinishDeath) должны доходить до умирающего. Действия
/// отклоняет сама запись через `Mortal::is_dead`.
#[derive(Component, Debug)]
pub struct Dead;

/// Компонент-маркер: деспавн entity после указанного времени
///
/// Система `despawn_after_timeout` проверяет время и удаляет entity.
#[derive(Component, Debug)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах от старта игры)
    pub despawn_time: f32,
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::logger::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[derive(Default)]
    struct Dummy {
        dead: bool,
        deaths: u32,
    }

    impl Mortal for Dummy {
        fn is_dead(&self) -> bool {
            self.dead
        }

        fn die(&mut self) {
            self.dead = true;
            self.deaths += 1;
        }
    }

    #[test]
    fn test_resolve_hit_floors_and_kills_once() {
        let mut health = Health::new(50.0);
        let mut dummy = Dummy::default();

        let hit = resolve_hit(&mut health, &mut dummy, 20.0);
        assert!(!hit.killed);
        assert_eq!(health.current, 30.0);

        let lethal = resolve_hit(&mut health, &mut dummy, 80.0);
        assert!(lethal.killed);
        assert_eq!(health.current, 0.0);

        let overkill = resolve_hit(&mut health, &mut dummy, 80.0);
        assert!(!overkill.killed);
        assert_eq!(overkill.damage, 80.0);
        assert_eq!(dummy.deaths, 1);
    }

    #[test]
    fn test_roll_stun_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);

        // roll ∈ [0, 1) → chance 1.0 всегда срабатывает
        assert!((0..100).all(|_| roll_stun(&mut rng, 1.0)));

        let hits = (0..10_000).filter(|_| roll_stun(&mut rng, 0.25)).count();
        assert!((2_000..3_000).contains(&hits), "hits = {}", hits);
    }

    #[test]
    fn test_character_hit_sound_by_remaining_health() {
        let mut health = Health::new(100.0);

        health.take_damage(30.0);
        assert_eq!(character_hit_sound(&health, 30.0), SoundCue::CharacterHit);

        // 15 HP после удара на 10: ≤ 20%, но переживёт следующий
        health.current = 15.0;
        assert_eq!(
            character_hit_sound(&health, 10.0),
            SoundCue::CharacterCriticalHealth
        );

        // Следующий такой же удар убьёт
        health.current = 5.0;
        assert_eq!(character_hit_sound(&health, 10.0), SoundCue::CharacterDeath);
    }
}
