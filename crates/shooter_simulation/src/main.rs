//! Headless симуляция shooter'а
//!
//! Запускает Bevy App без рендера: персонаж стреляет во врага,
//! враг отвечает melee атаками. Движок заменён скриптом events.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use shooter_simulation::combat::{EnemyAction, EnemyWeaponHit, EnemyWeaponSide};
use shooter_simulation::{
    create_headless_app, log_error, spawn_enemy, spawn_shooter, BulletHit, EnemyCommand,
    EnemyConfig, Health, Shooter, ShooterAction, ShooterInput, WeaponFired,
};

fn main() {
    let seed = 42;
    println!("Starting shooter headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));
    // Слабый враг: персонаж переживает несколько ударов
    app.insert_resource(EnemyConfig {
        base_damage: 20.0,
        ..Default::default()
    });

    let character = match spawn_shooter(app.world_mut()) {
        Ok(entity) => entity,
        Err(err) => {
            log_error(&format!("❌ Failed to spawn shooter: {}", err));
            return;
        }
    };
    let enemy = spawn_enemy(app.world_mut());

    // Скрипт движка: каждый WeaponFired превращается в попадание в тело
    app.add_systems(
        Update,
        move |mut fired: EventReader<WeaponFired>, mut hits: EventWriter<BulletHit>| {
            for shot in fired.read() {
                hits.write(BulletHit {
                    shooter: shot.shooter,
                    target: Some(enemy),
                    bone_name: "spine_01".into(),
                    location: Vec3::new(0.0, 1.2, 5.0),
                });
            }
        },
    );

    // Запускаем 600 тиков симуляции (10 секунд)
    for tick in 0..600 {
        let world = app.world_mut();

        // Огонь зажат первые 3 секунды
        if tick == 1 {
            world.send_event(ShooterInput {
                character,
                action: ShooterAction::FirePressed,
            });
        }
        if tick == 180 {
            world.send_event(ShooterInput {
                character,
                action: ShooterAction::FireReleased,
            });
        }

        // Враг атакует раз в секунду; удар приходится в окно активной руки
        if tick % 60 == 30 {
            world.send_event(EnemyCommand {
                enemy,
                action: EnemyAction::Attack,
            });
            world.send_event(EnemyCommand {
                enemy,
                action: EnemyAction::ActivateWeapon(EnemyWeaponSide::Right),
            });
        }
        if tick % 60 == 32 {
            world.send_event(EnemyWeaponHit {
                enemy,
                side: EnemyWeaponSide::Right,
                character,
            });
        }
        if tick % 60 == 40 {
            world.send_event(EnemyCommand {
                enemy,
                action: EnemyAction::DeactivateWeapon(EnemyWeaponSide::Right),
            });
        }

        app.update();

        if tick % 100 == 0 {
            report(app.world_mut(), tick, character, enemy);
        }
    }

    report(app.world_mut(), 600, character, enemy);
    println!("Simulation complete!");
}

fn report(world: &mut World, tick: u32, character: Entity, enemy: Entity) {
    let Some(shooter) = world.get::<Shooter>(character) else {
        println!("Tick {}: character gone", tick);
        return;
    };
    let ammo = shooter.equipped_weapon().map(|weapon| weapon.ammo);
    let state = shooter.state();

    let character_health = world.get::<Health>(character).map(|h| h.current);
    let enemy_health = world.get::<Health>(enemy).map(|h| h.current);

    println!(
        "Tick {}: state {:?}, ammo {:?}, character hp {:?}, enemy hp {:?}",
        tick, state, ammo, character_health, enemy_health
    );
}
