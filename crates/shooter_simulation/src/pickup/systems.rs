//! Pickup systems: overlaps, trace под прицелом, подбор, полёт к персонажу.

use bevy::prelude::*;

use crate::combat::shooter::{Shooter, ShooterAction};
use crate::combat::{ShooterInput, Weapon};
use crate::components::{AmmoPickup, CombatState, InterpSlots, Pickup, EMPTY_SLOT};
use crate::pickup::events::{ItemInterpScale, ItemOverlap, ItemPickedUp, ItemTraceResult, ItemTraceToggle};
use crate::presentation::PresentationCommand;

/// Заспавнить оружие, лежащее в мире
pub fn spawn_weapon_pickup(commands: &mut Commands, weapon: Weapon) -> Entity {
    let mut pickup = Pickup::Weapon(weapon);
    pickup.item_mut().start_pulse_timer();
    commands.spawn(pickup).id()
}

/// Заспавнить коробку патронов
pub fn spawn_ammo_pickup(commands: &mut Commands, ammo: AmmoPickup) -> Entity {
    let mut pickup = Pickup::Ammo(ammo);
    pickup.item_mut().start_pulse_timer();
    commands.spawn(pickup).id()
}

/// Система: overlap с area sphere предмета
///
/// Счётчик overlap'ов (floor 0) решает, трейсит ли персонаж предметы.
/// End overlap снимает подсветку слота.
pub fn process_item_overlaps(
    mut overlaps: EventReader<ItemOverlap>,
    mut shooters: Query<&mut Shooter>,
    mut pickups: Query<&mut Pickup>,
    mut toggles: EventWriter<ItemTraceToggle>,
) {
    for overlap in overlaps.read() {
        if !pickups.contains(overlap.item) {
            continue;
        }
        let Ok(mut shooter) = shooters.get_mut(overlap.character) else {
            continue;
        };

        let was_tracing = shooter.should_trace_for_items();
        if overlap.entered {
            shooter.increment_overlapped_items(1);
        } else {
            shooter.increment_overlapped_items(-1);
            shooter.unhighlight_inventory_slot();
        }

        let tracing = shooter.should_trace_for_items();
        if tracing == was_tracing {
            continue;
        }

        toggles.write(ItemTraceToggle {
            character: overlap.character,
            enabled: tracing,
        });

        // Trace выключен — убрать виджет с последнего наведённого предмета
        if !tracing {
            if let Some(last) = shooter.hovered_last_frame() {
                if let Ok(mut pickup) = pickups.get_mut(last) {
                    let item = pickup.item_mut();
                    item.set_widget_visible(false);
                    item.disable_custom_depth();
                }
            }
            shooter.set_hovered_item(None);
            shooter.set_hovered_last_frame(None);
        }
    }
}

/// Система: результат trace под прицелом
///
/// Предмет в полёте игнорируется. Наведённый предмет показывает виджет
/// и outline, оружие подсвечивает слот inventory. Предыдущий предмет гаснет.
pub fn process_item_traces(
    mut traces: EventReader<ItemTraceResult>,
    mut shooters: Query<&mut Shooter>,
    mut pickups: Query<&mut Pickup>,
) {
    for trace in traces.read() {
        let Ok(mut shooter) = shooters.get_mut(trace.character) else {
            continue;
        };
        if !shooter.should_trace_for_items() {
            continue;
        }

        let hovered = trace.hit.filter(|entity| {
            pickups
                .get(*entity)
                .is_ok_and(|pickup| !pickup.item().is_interping())
        });
        shooter.set_hovered_item(hovered);

        if let Some(mut pickup) = hovered.and_then(|entity| pickups.get_mut(entity).ok()) {
            if pickup.is_weapon() {
                if shooter.highlighted_slot() == EMPTY_SLOT {
                    shooter.highlight_inventory_slot();
                }
            } else if shooter.highlighted_slot() != EMPTY_SLOT {
                shooter.unhighlight_inventory_slot();
            }

            let inventory_full = shooter.inventory().is_full();
            let item = pickup.item_mut();
            item.set_widget_visible(true);
            item.enable_custom_depth();
            item.set_inventory_full_hint(inventory_full);
        }

        let previous = shooter.hovered_last_frame().filter(|last| Some(*last) != hovered);
        if let Some(mut pickup) = previous.and_then(|entity| pickups.get_mut(entity).ok()) {
            let item = pickup.item_mut();
            item.set_widget_visible(false);
            item.disable_custom_depth();
        }

        shooter.set_hovered_last_frame(hovered);
    }
}

/// Система: Select → наведённый предмет летит к персонажу
///
/// Только из Unoccupied. Pickup звук форсируется (без cooldown).
pub fn process_select_input(
    mut inputs: EventReader<ShooterInput>,
    mut shooters: Query<&mut Shooter>,
    mut pickups: Query<&mut Pickup>,
) {
    for input in inputs.read() {
        if input.action != ShooterAction::Select {
            continue;
        }
        let Ok(mut shooter) = shooters.get_mut(input.character) else {
            continue;
        };
        if !shooter.input_enabled() || shooter.state() != CombatState::Unoccupied {
            continue;
        }

        let Some(item_entity) = shooter.hovered_item() else {
            continue;
        };
        let Ok(mut pickup) = pickups.get_mut(item_entity) else {
            shooter.set_hovered_item(None);
            continue;
        };

        if shooter.begin_item_pickup(input.character, pickup.item_mut(), true) {
            crate::logger::log(&format!(
                "🎯 {:?} picking up {} ({:?})",
                input.character,
                pickup.item().name,
                item_entity
            ));
            shooter.set_hovered_item(None);
        }
    }
}

/// Система: scale curve от движка для предметов в полёте
pub fn apply_interp_scale(
    mut scales: EventReader<ItemInterpScale>,
    mut pickups: Query<&mut Pickup>,
) {
    for scale in scales.read() {
        if let Ok(mut pickup) = pickups.get_mut(scale.item) {
            pickup.item_mut().set_interp_scale(scale.scale);
        }
    }
}

/// Система: таймеры предметов + hand-off по окончании полёта
///
/// Долетевший предмет переходит в inventory/запас requester'а,
/// pickup entity удаляется. Requester исчез — предмет возвращается в мир.
pub fn tick_pickups(
    mut commands: Commands,
    time: Res<Time>,
    mut pickups: Query<(Entity, &mut Pickup)>,
    mut shooters: Query<&mut Shooter>,
    mut presentation: EventWriter<PresentationCommand>,
    mut picked_up: EventWriter<ItemPickedUp>,
) {
    let delta = time.delta();

    for (entity, mut pickup) in pickups.iter_mut() {
        if !pickup.item_mut().tick(delta) {
            continue;
        }

        let requester = pickup.item().requester();
        let Some((character, mut shooter)) = requester
            .and_then(|character| shooters.get_mut(character).ok().map(|s| (character, s)))
        else {
            crate::logger::log_warning(&format!(
                "⚠️ Pickup {:?}: requester {:?} gone, item returns to world",
                entity, requester
            ));
            // Слот принадлежал исчезнувшему персонажу
            pickup.item_mut().cancel_interpolation(&mut InterpSlots::default());
            continue;
        };

        // Накопленные cues предмета адресованы ещё живой pickup entity
        for cue in pickup.item_mut().drain_cues() {
            presentation.write(PresentationCommand { target: entity, cue });
        }

        let name = pickup.item().name.clone();
        shooter.complete_item_pickup((*pickup).clone());
        commands.entity(entity).despawn();

        crate::logger::log(&format!("📦 {:?} picked up {}", character, name));
        picked_up.write(ItemPickedUp {
            character,
            item: entity,
            name,
        });
    }
}

/// Система: cues предметов → PresentationCommand
pub fn flush_pickup_cues(
    mut pickups: Query<(Entity, &mut Pickup)>,
    mut presentation: EventWriter<PresentationCommand>,
) {
    for (entity, mut pickup) in pickups.iter_mut() {
        if !pickup.item().has_cues() {
            continue;
        }
        for cue in pickup.item_mut().drain_cues() {
            presentation.write(PresentationCommand { target: entity, cue });
        }
    }
}
