//! Enemy systems: команды behaviour tree, сенсоры, таймеры, flush outbox.

use bevy::prelude::*;

use crate::ai::BlackboardUpdate;
use crate::combat::damage::DespawnAfter;
use crate::combat::enemy::{Enemy, EnemyEvent};
use crate::combat::events::{EnemyAction, EnemyCommand, EnemySensor, EnemySensorOverlap};
use crate::combat::shooter::Shooter;
use crate::presentation::PresentationCommand;
use crate::DeterministicRng;

/// Система: EnemyCommand → Enemy
pub fn process_enemy_commands(
    mut commands_in: EventReader<EnemyCommand>,
    mut enemies: Query<&mut Enemy>,
    mut rng: ResMut<DeterministicRng>,
) {
    for command in commands_in.read() {
        let Ok(mut enemy) = enemies.get_mut(command.enemy) else {
            continue;
        };

        match command.action {
            EnemyAction::Attack => {
                enemy.play_attack(&mut rng.rng);
            }
            EnemyAction::ActivateWeapon(side) => enemy.set_weapon_active(side, true),
            EnemyAction::DeactivateWeapon(side) => enemy.set_weapon_active(side, false),
            EnemyAction::EndStun => enemy.set_stunned(false),
            EnemyAction::FinishDeath => {
                enemy.finish_death();
            }
        }
    }
}

/// Система: overlap сфер врага (реагируют только на персонажей)
pub fn process_enemy_sensors(
    mut overlaps: EventReader<EnemySensorOverlap>,
    mut enemies: Query<&mut Enemy>,
    characters: Query<(), With<Shooter>>,
) {
    for overlap in overlaps.read() {
        if !characters.contains(overlap.character) {
            continue;
        }
        let Ok(mut enemy) = enemies.get_mut(overlap.enemy) else {
            continue;
        };

        match overlap.sensor {
            EnemySensor::Agro => {
                if overlap.entered {
                    enemy.agro_overlap(overlap.character);
                }
            }
            EnemySensor::CombatRange => enemy.set_in_range(overlap.entered),
        }
    }
}

pub fn tick_enemies(time: Res<Time>, mut enemies: Query<&mut Enemy>) {
    let delta = time.delta();
    for mut enemy in enemies.iter_mut() {
        enemy.tick(delta);
    }
}

/// Система: outbox врага → PresentationCommand / BlackboardUpdate / DespawnAfter
pub fn flush_enemy_events(
    mut commands: Commands,
    time: Res<Time>,
    mut enemies: Query<(Entity, &mut Enemy)>,
    mut presentation: EventWriter<PresentationCommand>,
    mut blackboard: EventWriter<BlackboardUpdate>,
) {
    for (entity, mut enemy) in enemies.iter_mut() {
        for event in enemy.drain_events() {
            match event {
                EnemyEvent::Cue(cue) => {
                    presentation.write(PresentationCommand { target: entity, cue });
                }
                EnemyEvent::Blackboard(key, value) => {
                    blackboard.write(BlackboardUpdate {
                        enemy: entity,
                        key,
                        value,
                    });
                }
                EnemyEvent::Despawn { delay } => {
                    commands.entity(entity).insert(DespawnAfter {
                        despawn_time: time.elapsed_secs() + delay,
                    });
                }
            }
        }
    }
}
