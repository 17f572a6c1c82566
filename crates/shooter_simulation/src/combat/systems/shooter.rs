//! Shooter systems: ввод, таймеры, flush outbox в events.

use bevy::prelude::*;

use crate::combat::events::{InventorySlotChanged, InventorySlotHighlight, ShooterInput, WeaponDropped};
use crate::combat::shooter::{Shooter, ShooterEvent};
use crate::combat::weapon::WeaponFired;
use crate::components::Pickup;
use crate::presentation::PresentationCommand;

/// Система: ShooterInput → Shooter
///
/// `Select` здесь игнорируется: подбор требует доступа к pickup entities
/// (см. `pickup::systems::process_select_input`).
pub fn process_shooter_input(
    mut inputs: EventReader<ShooterInput>,
    mut shooters: Query<&mut Shooter>,
) {
    for input in inputs.read() {
        let Ok(mut shooter) = shooters.get_mut(input.character) else {
            continue;
        };
        shooter.handle_input(input.action);
    }
}

/// Система: продвинуть таймеры персонажей (fire/reload/equip/stun/death)
pub fn tick_shooters(time: Res<Time>, mut shooters: Query<&mut Shooter>) {
    let delta = time.delta();
    for mut shooter in shooters.iter_mut() {
        shooter.tick(delta);
    }
}

/// Система: outbox персонажа → Bevy events
///
/// Выброшенное оружие становится отдельной pickup entity.
pub fn flush_shooter_events(
    mut commands: Commands,
    mut shooters: Query<(Entity, &mut Shooter)>,
    mut presentation: EventWriter<PresentationCommand>,
    mut fired: EventWriter<WeaponFired>,
    mut slot_changed: EventWriter<InventorySlotChanged>,
    mut slot_highlight: EventWriter<InventorySlotHighlight>,
    mut dropped: EventWriter<WeaponDropped>,
) {
    for (character, mut shooter) in shooters.iter_mut() {
        for event in shooter.drain_events() {
            match event {
                ShooterEvent::Cue(cue) => {
                    presentation.write(PresentationCommand {
                        target: character,
                        cue,
                    });
                }
                ShooterEvent::SlotChanged { old, new } => {
                    slot_changed.write(InventorySlotChanged {
                        character,
                        old,
                        new,
                    });
                }
                ShooterEvent::SlotHighlight { slot, highlighted } => {
                    slot_highlight.write(InventorySlotHighlight {
                        character,
                        slot,
                        highlighted,
                    });
                }
                ShooterEvent::Fired { kind, ammo_left } => {
                    fired.write(WeaponFired {
                        shooter: character,
                        kind,
                        ammo_left,
                    });
                }
                ShooterEvent::Dropped(weapon) => {
                    let name = weapon.item.name.clone();
                    let pickup = commands.spawn(Pickup::Weapon(weapon)).id();
                    crate::logger::log(&format!(
                        "🔫 {:?} dropped {} → pickup {:?}",
                        character, name, pickup
                    ));
                    dropped.write(WeaponDropped { character, pickup });
                }
                ShooterEvent::Died => {
                    crate::logger::log(&format!("☠️ Character {:?} died", character));
                }
            }
        }
    }
}
