//! Damage systems: пули персонажа по врагам, взрывы, melee врагов по персонажу.

use bevy::prelude::*;

use crate::combat::damage::{resolve_hit, DamageDealt, Dead, EntityDied};
use crate::combat::enemy::Enemy;
use crate::combat::events::{BulletHit, EnemyWeaponHit, ExplosiveOverlap};
use crate::combat::explosive::Explosive;
use crate::combat::shooter::Shooter;
use crate::components::Health;
use crate::presentation::{EffectCue, PresentationCommand, PresentationCue, SoundCue};
use crate::DeterministicRng;

/// Система: BulletHit → урон врагу (или impact в мир)
///
/// Урон берётся из оружия, которое сейчас в руках стрелка.
/// Headshot определяется по имени кости. Попадание во взрывчатку
/// обрабатывает `process_explosive_hits`.
pub fn process_bullet_hits(
    mut commands: Commands,
    mut hits: EventReader<BulletHit>,
    shooters: Query<&Shooter>,
    mut enemies: Query<(&mut Enemy, &mut Health)>,
    explosives: Query<(), With<Explosive>>,
    mut rng: ResMut<DeterministicRng>,
    mut presentation: EventWriter<PresentationCommand>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut entity_died: EventWriter<EntityDied>,
) {
    for hit in hits.read() {
        let Ok(shooter) = shooters.get(hit.shooter) else {
            continue;
        };
        let Some(weapon) = shooter.equipped_weapon() else {
            continue;
        };

        presentation.write(PresentationCommand {
            target: hit.shooter,
            cue: PresentationCue::effect_at(EffectCue::BulletTrail, hit.location),
        });

        if hit.target.is_some_and(|target| explosives.contains(target)) {
            continue;
        }

        let Some((target, mut enemy, mut health)) = hit
            .target
            .and_then(|target| enemies.get_mut(target).ok().map(|(e, h)| (target, e, h)))
        else {
            presentation.write(PresentationCommand {
                target: hit.shooter,
                cue: PresentationCue::effect_at(EffectCue::DefaultImpact, hit.location),
            });
            continue;
        };

        enemy.bullet_impact(hit.location);

        let headshot = enemy.is_headshot(&hit.bone_name);
        let damage = weapon.damage_for(headshot);
        let outcome = enemy.take_bullet_damage(&mut health, hit.shooter, damage, &mut rng.rng);
        enemy.show_hit_number(damage, hit.location, headshot);

        damage_dealt.write(DamageDealt {
            attacker: hit.shooter,
            target,
            damage,
            headshot,
            target_died: outcome.killed,
        });

        if outcome.killed {
            crate::logger::log(&format!(
                "💀 Enemy {:?} killed by {:?} ({} dmg{})",
                target,
                hit.shooter,
                damage,
                if headshot { ", headshot" } else { "" }
            ));
            commands.entity(target).insert(Dead);
            entity_died.write(EntityDied {
                entity: target,
                killer: Some(hit.shooter),
            });
        }
    }
}

/// Система: overlap sphere взрывчатки → список потенциальных жертв
pub fn process_explosive_overlaps(
    mut overlaps: EventReader<ExplosiveOverlap>,
    mut explosives: Query<&mut Explosive>,
) {
    for overlap in overlaps.read() {
        let Ok(mut explosive) = explosives.get_mut(overlap.explosive) else {
            continue;
        };
        explosive.set_overlap(overlap.actor, overlap.entered);
    }
}

/// Система: пуля во взрывчатку → взрыв
///
/// Урон получают все, кто сейчас в overlap sphere (персонажи и враги),
/// instigator — стрелок. Врагу как от пули: Target, health bar, stun roll.
/// Персонажу без stun и звука. После взрыва entity удаляется.
pub fn process_explosive_hits(
    mut commands: Commands,
    mut hits: EventReader<BulletHit>,
    mut explosives: Query<&mut Explosive>,
    mut characters: Query<(&mut Shooter, &mut Health), Without<Enemy>>,
    mut enemies: Query<(&mut Enemy, &mut Health), Without<Shooter>>,
    mut rng: ResMut<DeterministicRng>,
    mut presentation: EventWriter<PresentationCommand>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut entity_died: EventWriter<EntityDied>,
) {
    for hit in hits.read() {
        let Some(target) = hit.target else {
            continue;
        };
        let Ok(mut explosive) = explosives.get_mut(target) else {
            continue;
        };
        let Some(victims) = explosive.explode() else {
            continue;
        };
        let damage = explosive.damage;

        presentation.write(PresentationCommand {
            target,
            cue: PresentationCue::Sound(SoundCue::Explode),
        });
        presentation.write(PresentationCommand {
            target,
            cue: PresentationCue::effect_at(EffectCue::Explosion, hit.location),
        });

        for victim in victims {
            let outcome = if let Ok((mut shooter, mut health)) = characters.get_mut(victim) {
                resolve_hit(&mut health, &mut *shooter, damage)
            } else if let Ok((mut enemy, mut health)) = enemies.get_mut(victim) {
                enemy.take_bullet_damage(&mut health, hit.shooter, damage, &mut rng.rng)
            } else {
                continue;
            };

            damage_dealt.write(DamageDealt {
                attacker: hit.shooter,
                target: victim,
                damage,
                headshot: false,
                target_died: outcome.killed,
            });

            if outcome.killed {
                crate::logger::log(&format!(
                    "💥 {:?} killed by explosive {:?} (shot by {:?})",
                    victim, target, hit.shooter
                ));
                commands.entity(victim).insert(Dead);
                entity_died.write(EntityDied {
                    entity: victim,
                    killer: Some(hit.shooter),
                });
            }
        }

        crate::logger::log(&format!("💥 Explosive {:?} detonated", target));
        commands.entity(target).despawn();
    }
}

/// Система: weapon коллайдер врага → урон персонажу
///
/// Урон проходит только в окне активности этой руки.
pub fn process_enemy_weapon_hits(
    mut commands: Commands,
    mut hits: EventReader<EnemyWeaponHit>,
    mut enemies: Query<&mut Enemy>,
    mut characters: Query<(&mut Shooter, &mut Health)>,
    mut rng: ResMut<DeterministicRng>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut entity_died: EventWriter<EntityDied>,
) {
    for hit in hits.read() {
        let Ok(mut enemy) = enemies.get_mut(hit.enemy) else {
            continue;
        };
        if !enemy.melee_hit_allowed(hit.side) {
            continue;
        }

        let Ok((mut shooter, mut health)) = characters.get_mut(hit.character) else {
            continue;
        };

        let damage = enemy.base_damage();
        let outcome = shooter.take_melee_hit(&mut health, damage, &mut rng.rng);

        damage_dealt.write(DamageDealt {
            attacker: hit.enemy,
            target: hit.character,
            damage,
            headshot: false,
            target_died: outcome.killed,
        });

        if outcome.killed {
            crate::logger::log_warning(&format!(
                "💀 Character {:?} killed by enemy {:?}",
                hit.character, hit.enemy
            ));
            enemy.on_character_killed();
            commands.entity(hit.character).insert(Dead);
            entity_died.write(EntityDied {
                entity: hit.character,
                killer: Some(hit.enemy),
            });
        }
    }
}
