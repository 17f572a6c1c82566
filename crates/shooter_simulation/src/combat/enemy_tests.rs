//! Tests for Enemy.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;

    use crate::ai::{BlackboardKey, BlackboardValue};
    use crate::combat::damage::Mortal;
    use crate::combat::enemy::{Enemy, EnemyEvent, EnemyWeaponSide, ATTACK_SECTIONS};
    use crate::components::Health;
    use crate::config::EnemyConfig;
    use crate::presentation::{Montage, PresentationCue};

    fn enemy_with_stun(stun_chance: f32) -> Enemy {
        Enemy::new(EnemyConfig {
            stun_chance,
            ..Default::default()
        })
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn secs(seconds: f32) -> Duration {
        Duration::from_secs_f32(seconds)
    }

    fn pushed(events: &[EnemyEvent], key: BlackboardKey, value: BlackboardValue) -> bool {
        events
            .iter()
            .any(|event| *event == EnemyEvent::Blackboard(key, value))
    }

    fn played(events: &[EnemyEvent], montage: Montage) -> bool {
        events.iter().any(|event| {
            matches!(event, EnemyEvent::Cue(PresentationCue::Montage { montage: m, .. }) if *m == montage)
        })
    }

    #[test]
    fn test_spawn_announces_can_attack() {
        let mut enemy = Enemy::new(EnemyConfig::default());
        let events = enemy.drain_events();
        assert!(pushed(
            &events,
            BlackboardKey::CanAttack,
            BlackboardValue::Bool(true)
        ));
        assert!(enemy.can_attack());
    }

    #[test]
    fn test_bullet_hit_sets_target_first_and_stuns() {
        let mut enemy = enemy_with_stun(1.0);
        let mut health = Health::new(1000.0);
        let shooter = Entity::from_raw(5);
        let mut rng = rng();
        enemy.drain_events();

        let outcome = enemy.take_bullet_damage(&mut health, shooter, 25.0, &mut rng);
        assert!(!outcome.killed);
        assert_eq!(health.current, 975.0);

        let events = enemy.drain_events();
        assert_eq!(
            events.first(),
            Some(&EnemyEvent::Blackboard(
                BlackboardKey::Target,
                BlackboardValue::Object(Some(shooter))
            ))
        );
        assert!(enemy.health_bar_visible());
        assert!(enemy.is_stunned());
        assert!(!enemy.can_hit_react());
        assert!(played(&events, Montage::EnemyHitReact));
        assert!(pushed(
            &events,
            BlackboardKey::Stunned,
            BlackboardValue::Bool(true)
        ));

        // stun_time 0.8
        enemy.tick(secs(0.9));
        assert!(!enemy.is_stunned());
        assert!(pushed(
            &enemy.drain_events(),
            BlackboardKey::Stunned,
            BlackboardValue::Bool(false)
        ));

        // Hit react cooldown ≤ 1.5
        enemy.tick(secs(0.7));
        assert!(enemy.can_hit_react());
    }

    #[test]
    fn test_bullet_hit_without_stun_roll() {
        let mut enemy = enemy_with_stun(0.0);
        let mut health = Health::new(1000.0);
        let mut rng = rng();

        enemy.take_bullet_damage(&mut health, Entity::from_raw(1), 10.0, &mut rng);
        assert!(!enemy.is_stunned());
        assert!(enemy.can_hit_react());
        assert!(enemy.health_bar_visible());
    }

    #[test]
    fn test_health_bar_hides_after_display_time() {
        let mut enemy = enemy_with_stun(0.0);
        let mut health = Health::new(1000.0);
        let mut rng = rng();

        enemy.take_bullet_damage(&mut health, Entity::from_raw(1), 10.0, &mut rng);
        enemy.tick(secs(3.0));
        assert!(enemy.health_bar_visible());

        enemy.tick(secs(1.5));
        assert!(!enemy.health_bar_visible());
    }

    #[test]
    fn test_lethal_hit_starts_death_once() {
        let mut enemy = enemy_with_stun(1.0);
        let mut health = Health::new(100.0);
        let mut rng = rng();
        enemy.drain_events();

        let first = enemy.take_bullet_damage(&mut health, Entity::from_raw(1), 150.0, &mut rng);
        assert!(first.killed);
        assert!(enemy.is_dying());
        assert!(enemy.is_dead());
        // Умирающий не оглушается и health bar не показывает
        assert!(!enemy.is_stunned());
        assert!(!enemy.health_bar_visible());

        let events = enemy.drain_events();
        assert!(played(&events, Montage::EnemyDeath));
        assert!(pushed(&events, BlackboardKey::Dead, BlackboardValue::Bool(true)));
        assert!(events
            .iter()
            .any(|e| *e == EnemyEvent::Cue(PresentationCue::StopMovement)));

        let second = enemy.take_bullet_damage(&mut health, Entity::from_raw(1), 150.0, &mut rng);
        assert!(!second.killed);
        assert_eq!(health.current, 0.0);
        assert!(!played(&enemy.drain_events(), Montage::EnemyDeath));
    }

    #[test]
    fn test_finish_death_schedules_despawn() {
        let mut enemy = Enemy::new(EnemyConfig::default());
        assert!(!enemy.finish_death(), "alive enemy");

        enemy.die();
        enemy.drain_events();

        // death_montage_time 1.5
        enemy.tick(secs(1.6));
        let events = enemy.drain_events();
        assert!(events
            .iter()
            .any(|e| *e == EnemyEvent::Despawn { delay: 4.0 }));
        assert!(events
            .iter()
            .any(|e| *e == EnemyEvent::Cue(PresentationCue::PauseAnimations)));

        assert!(!enemy.finish_death());
        assert!(enemy.drain_events().is_empty());
    }

    #[test]
    fn test_attack_cooldown() {
        let mut enemy = Enemy::new(EnemyConfig::default());
        let mut rng = rng();
        enemy.drain_events();

        let section = enemy.play_attack(&mut rng).unwrap();
        assert!(ATTACK_SECTIONS.contains(&section));
        assert!(!enemy.can_attack());
        assert!(pushed(
            &enemy.drain_events(),
            BlackboardKey::CanAttack,
            BlackboardValue::Bool(false)
        ));

        assert_eq!(enemy.play_attack(&mut rng), None);

        enemy.tick(secs(1.1));
        assert!(enemy.can_attack());
        assert!(enemy.play_attack(&mut rng).is_some());
    }

    #[test]
    fn test_melee_hit_requires_active_weapon() {
        let mut enemy = Enemy::new(EnemyConfig::default());

        assert!(!enemy.melee_hit_allowed(EnemyWeaponSide::Left));
        enemy.set_weapon_active(EnemyWeaponSide::Left, true);
        assert!(enemy.melee_hit_allowed(EnemyWeaponSide::Left));
        assert!(!enemy.melee_hit_allowed(EnemyWeaponSide::Right));

        enemy.die();
        assert!(!enemy.melee_hit_allowed(EnemyWeaponSide::Left));
    }

    #[test]
    fn test_dying_enemy_ignores_sensing() {
        let mut enemy = Enemy::new(EnemyConfig::default());
        let mut rng = rng();
        enemy.die();
        enemy.drain_events();

        enemy.agro_overlap(Entity::from_raw(9));
        enemy.set_in_range(true);
        assert!(!enemy.is_in_range());
        assert_eq!(enemy.play_attack(&mut rng), None);
        assert_eq!(
            enemy.show_hit_number(10.0, Vec3::ZERO, false),
            None
        );
        assert!(enemy.drain_events().is_empty());
    }

    #[test]
    fn test_hit_numbers_expire() {
        let mut enemy = Enemy::new(EnemyConfig::default());

        let first = enemy.show_hit_number(25.0, Vec3::ZERO, false).unwrap();
        let second = enemy.show_hit_number(62.5, Vec3::ONE, true).unwrap();
        assert_ne!(first, second);
        assert_eq!(enemy.hit_number_count(), 2);

        enemy.tick(secs(0.6));
        assert_eq!(enemy.hit_number_count(), 0);

        let removed = enemy
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, EnemyEvent::Cue(PresentationCue::RemoveHitNumber(_))))
            .count();
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_range_and_headshot() {
        let mut enemy = Enemy::new(EnemyConfig::default());

        enemy.set_in_range(true);
        assert!(enemy.is_in_range());
        enemy.set_in_range(false);
        assert!(!enemy.is_in_range());

        assert!(enemy.is_headshot("head"));
        assert!(!enemy.is_headshot("spine_01"));
    }
}
