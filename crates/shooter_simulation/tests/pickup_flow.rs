//! Pickup flow integration test
//!
//! overlap → trace → select → полёт к interp slot → inventory.
//! Выброшенное оружие снова становится pickup entity.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use shooter_simulation::combat::WeaponDropped;
use shooter_simulation::pickup::{
    spawn_ammo_pickup, spawn_weapon_pickup, ItemOverlap, ItemPickedUp, ItemTraceResult,
    ItemTraceToggle,
};
use shooter_simulation::*;

/// Собранные исходящие events (движок читает их так же)
#[derive(Resource, Default)]
struct Collected {
    toggles: Vec<ItemTraceToggle>,
    picked_up: Vec<ItemPickedUp>,
    dropped: Vec<WeaponDropped>,
}

fn collect_events(
    mut toggles: EventReader<ItemTraceToggle>,
    mut picked_up: EventReader<ItemPickedUp>,
    mut dropped: EventReader<WeaponDropped>,
    mut collected: ResMut<Collected>,
) {
    collected.toggles.extend(toggles.read().copied());
    collected.picked_up.extend(picked_up.read().cloned());
    collected.dropped.extend(dropped.read().copied());
}

fn create_pickup_app() -> App {
    let mut app = create_headless_app(42);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )))
    .init_resource::<Collected>()
    .add_systems(Last, collect_events);

    app.update();
    app
}

fn run(app: &mut App, updates: usize) {
    for _ in 0..updates {
        app.update();
    }
}

fn spawn_world_weapon(app: &mut App, kind: WeaponKind) -> Entity {
    let weapon = GameTables::default()
        .build_weapon(kind, ItemRarity::Rare)
        .unwrap();
    let world = app.world_mut();
    let entity = spawn_weapon_pickup(&mut world.commands(), weapon);
    world.flush();
    entity
}

fn spawn_world_ammo(app: &mut App, category: AmmoCategory, count: u32) -> Entity {
    let world = app.world_mut();
    let entity = spawn_ammo_pickup(&mut world.commands(), AmmoPickup::new(category, count));
    world.flush();
    entity
}

/// overlap + trace + select в одном кадре
fn aim_and_select(app: &mut App, character: Entity, item: Entity) {
    let world = app.world_mut();
    world.send_event(ItemOverlap {
        character,
        item,
        entered: true,
    });
    world.send_event(ItemTraceResult {
        character,
        hit: Some(item),
    });
    world.send_event(ShooterInput {
        character,
        action: ShooterAction::Select,
    });
}

#[test]
fn test_weapon_pickup_lands_in_next_slot() {
    let mut app = create_pickup_app();
    let character = spawn_shooter(app.world_mut()).unwrap();
    let pistol = spawn_world_weapon(&mut app, WeaponKind::Pistol);

    aim_and_select(&mut app, character, pistol);
    run(&mut app, 3);

    {
        let shooter = app.world().get::<Shooter>(character).unwrap();
        assert!(shooter.should_trace_for_items());
        assert_eq!(shooter.hovered_item(), None, "selected item leaves hover");
        assert_eq!(shooter.highlighted_slot(), 1);
        assert_eq!(shooter.interp_slots().total_in_flight(), 1);

        let pickup = app.world().get::<Pickup>(pistol).unwrap();
        assert!(pickup.item().is_interping());
        assert_eq!(pickup.item().state(), ItemState::EquipInterpolating);
    }

    // Предмет в полёте игнорируется trace'ом
    app.world_mut().send_event(ItemTraceResult {
        character,
        hit: Some(pistol),
    });
    run(&mut app, 2);
    assert_eq!(
        app.world().get::<Shooter>(character).unwrap().hovered_item(),
        None
    );

    // z_curve_time 1.25s
    run(&mut app, 90);

    assert!(app.world().get_entity(pistol).is_err(), "pickup entity despawned");

    let shooter = app.world().get::<Shooter>(character).unwrap();
    assert_eq!(shooter.inventory().len(), 2);
    assert!(shooter.inventory().is_consistent());
    let picked = shooter.inventory().get(1).unwrap();
    assert_eq!(picked.kind, WeaponKind::Pistol);
    assert_eq!(picked.slot_index, 1);
    assert_eq!(picked.state(), ItemState::PickedUp);
    assert_eq!(shooter.interp_slots().total_in_flight(), 0);
    assert_eq!(shooter.highlighted_slot(), -1);
    // Экипированное оружие не меняется
    assert_eq!(shooter.inventory().equipped_index(), Some(0));

    let collected = app.world().resource::<Collected>();
    assert!(collected
        .toggles
        .iter()
        .any(|t| t.character == character && t.enabled));
    assert_eq!(collected.picked_up.len(), 1);
    assert_eq!(collected.picked_up[0].item, pistol);
}

#[test]
fn test_ammo_pickup_adds_to_stock() {
    let mut app = create_pickup_app();
    let character = spawn_shooter(app.world_mut()).unwrap();
    let ammo = spawn_world_ammo(&mut app, AmmoCategory::Sniper, 10);

    aim_and_select(&mut app, character, ammo);
    run(&mut app, 100);

    assert!(app.world().get_entity(ammo).is_err());
    let shooter = app.world().get::<Shooter>(character).unwrap();
    assert_eq!(shooter.carried_ammo(AmmoCategory::Sniper), 40);
    assert_eq!(shooter.inventory().len(), 1);
    // Ammo не подсвечивает слот
    assert_eq!(shooter.highlighted_slot(), -1);
}

#[test]
fn test_select_ignored_while_reloading() {
    let mut app = create_pickup_app();
    let character = spawn_shooter(app.world_mut()).unwrap();
    let pistol = spawn_world_weapon(&mut app, WeaponKind::Pistol);

    app.world_mut()
        .get_mut::<Shooter>(character)
        .unwrap()
        .equipped_weapon_mut()
        .unwrap()
        .ammo = 10;
    app.world_mut().send_event(ShooterInput {
        character,
        action: ShooterAction::Reload,
    });
    run(&mut app, 2);

    aim_and_select(&mut app, character, pistol);
    run(&mut app, 2);

    let pickup = app.world().get::<Pickup>(pistol).unwrap();
    assert!(!pickup.item().is_interping());
    let shooter = app.world().get::<Shooter>(character).unwrap();
    assert_eq!(shooter.hovered_item(), Some(pistol));
}

#[test]
fn test_end_overlap_disables_trace() {
    let mut app = create_pickup_app();
    let character = spawn_shooter(app.world_mut()).unwrap();
    let rifle = spawn_world_weapon(&mut app, WeaponKind::SniperRifle);

    app.world_mut().send_event(ItemOverlap {
        character,
        item: rifle,
        entered: true,
    });
    app.world_mut().send_event(ItemTraceResult {
        character,
        hit: Some(rifle),
    });
    run(&mut app, 2);
    assert!(app
        .world()
        .get::<Pickup>(rifle)
        .unwrap()
        .item()
        .widget_visible());

    app.world_mut().send_event(ItemOverlap {
        character,
        item: rifle,
        entered: false,
    });
    run(&mut app, 2);

    let shooter = app.world().get::<Shooter>(character).unwrap();
    assert!(!shooter.should_trace_for_items());
    assert_eq!(shooter.highlighted_slot(), -1);
    let item = app.world().get::<Pickup>(rifle).unwrap().item();
    assert!(!item.widget_visible());
    assert!(!item.custom_depth_enabled());

    let collected = app.world().resource::<Collected>();
    assert!(collected.toggles.iter().any(|t| !t.enabled));
}

#[test]
fn test_dropped_weapon_becomes_pickup() {
    let mut app = create_pickup_app();
    let character = spawn_shooter(app.world_mut()).unwrap();

    app.world_mut().send_event(ShooterInput {
        character,
        action: ShooterAction::DropWeapon,
    });
    run(&mut app, 3);

    let dropped = {
        let collected = app.world().resource::<Collected>();
        assert_eq!(collected.dropped.len(), 1);
        collected.dropped[0].pickup
    };

    {
        let shooter = app.world().get::<Shooter>(character).unwrap();
        assert!(shooter.inventory().is_empty());
        assert_eq!(shooter.inventory().equipped_index(), None);

        let pickup = app.world().get::<Pickup>(dropped).unwrap();
        assert!(pickup.is_weapon());
        assert_eq!(pickup.item().state(), ItemState::Falling);
    }

    // throw_time 1.0s → снова лежит в мире
    run(&mut app, 70);
    let pickup = app.world().get::<Pickup>(dropped).unwrap();
    assert_eq!(pickup.item().state(), ItemState::PickUp);

    // И его можно подобрать обратно
    aim_and_select(&mut app, character, dropped);
    run(&mut app, 100);

    let shooter = app.world().get::<Shooter>(character).unwrap();
    assert_eq!(shooter.inventory().len(), 1);
    assert_eq!(
        shooter.inventory().get(0).unwrap().kind,
        WeaponKind::AssaultRifle
    );
    // Руки были пусты → подобранное сразу в руках
    assert_eq!(shooter.inventory().equipped_index(), Some(0));
    assert_eq!(shooter.equipped_weapon().unwrap().state(), ItemState::Equipped);
}

#[test]
fn test_carried_weapons_usable_after_drop() {
    let mut app = create_pickup_app();
    let character = spawn_shooter(app.world_mut()).unwrap();

    for kind in [WeaponKind::Pistol, WeaponKind::SniperRifle] {
        let item = spawn_world_weapon(&mut app, kind);
        aim_and_select(&mut app, character, item);
        run(&mut app, 100);
    }
    assert_eq!(
        app.world().get::<Shooter>(character).unwrap().inventory().len(),
        3
    );

    app.world_mut().send_event(ShooterInput {
        character,
        action: ShooterAction::DropWeapon,
    });
    run(&mut app, 3);

    {
        let shooter = app.world().get::<Shooter>(character).unwrap();
        assert_eq!(shooter.inventory().len(), 2);
        assert_eq!(shooter.inventory().equipped_index(), Some(0));
        assert_eq!(shooter.equipped_weapon().unwrap().kind, WeaponKind::Pistol);
    }

    app.world_mut().send_event(ShooterInput {
        character,
        action: ShooterAction::SelectSlot(1),
    });
    run(&mut app, 60);
    let ammo_before = {
        let shooter = app.world().get::<Shooter>(character).unwrap();
        assert_eq!(shooter.equipped_weapon().unwrap().kind, WeaponKind::SniperRifle);
        assert_eq!(shooter.state(), CombatState::Unoccupied);
        shooter.equipped_weapon().unwrap().ammo
    };
    assert!(ammo_before > 0);

    app.world_mut().send_event(ShooterInput {
        character,
        action: ShooterAction::FirePressed,
    });
    run(&mut app, 1);

    let shooter = app.world().get::<Shooter>(character).unwrap();
    assert_eq!(shooter.equipped_weapon().unwrap().ammo, ammo_before - 1);
}
