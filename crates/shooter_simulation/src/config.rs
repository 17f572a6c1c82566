//! Конфигурация персонажа и врагов
//!
//! Resources с `Default` = оригинальные геймплейные константы.
//! Хост может подставить свою версию (serde) до спавна. Каждая запись
//! копирует конфиг при создании, дальше живёт независимо.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::item_system::{ItemRarity, WeaponKind};

/// Параметры персонажа-стрелка
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShooterConfig {
    pub max_health: f32,
    /// Шанс stun'а от melee удара врага
    pub stun_chance: f32,

    // Стартовый запас патронов
    pub starting_light_ammo: u32,
    pub starting_rifle_ammo: u32,
    pub starting_sniper_ammo: u32,

    /// Стартовое оружие (slot 0, экипировано)
    pub default_weapon: WeaponKind,
    pub default_weapon_rarity: ItemRarity,

    /// Generic interp anchors (плюс weapon hand)
    pub interp_slot_count: usize,

    // Длительности (секунды)
    pub reload_time: f32,
    pub equip_time: f32,
    /// Hit montage; по окончании stun снимается
    pub stun_time: f32,
    /// Death montage; по окончании ввод отключается
    pub death_time: f32,
    pub throw_time: f32,
    pub slide_time: f32,

    // Независимые cooldown'ы звуков
    pub pickup_sound_reset_time: f32,
    pub equip_sound_reset_time: f32,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            stun_chance: 0.25,
            starting_light_ammo: 60,
            starting_rifle_ammo: 120,
            starting_sniper_ammo: 30,
            default_weapon: WeaponKind::AssaultRifle,
            default_weapon_rarity: ItemRarity::Common,
            interp_slot_count: 6,
            reload_time: 1.2,
            equip_time: 0.6,
            stun_time: 0.75,
            death_time: 2.0,
            throw_time: 1.0,
            slide_time: 0.25,
            pickup_sound_reset_time: 0.2,
            equip_sound_reset_time: 0.2,
        }
    }
}

/// Параметры врага
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub max_health: f32,
    /// Урон melee удара по персонажу
    pub base_damage: f32,
    /// Шанс stun'а (hit react) от попадания пули
    pub stun_chance: f32,
    /// Имя кости головы (headshot)
    pub head_bone: String,

    /// Пауза между атаками
    pub attack_wait_time: f32,
    /// Задержка перед удалением после окончания death montage
    pub death_time: f32,
    /// Длительность death montage
    pub death_montage_time: f32,
    pub health_bar_display_time: f32,
    pub hit_number_destroy_time: f32,

    // Cooldown hit react: uniform в [min, max]
    pub hit_react_time_min: f32,
    pub hit_react_time_max: f32,
    /// Hit react montage; по окончании stunned снимается
    pub stun_time: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 100_000.0,
            base_damage: 100.0,
            stun_chance: 0.1,
            head_bone: "head".into(),
            attack_wait_time: 1.0,
            death_time: 4.0,
            death_montage_time: 1.5,
            health_bar_display_time: 4.0,
            hit_number_destroy_time: 0.5,
            hit_react_time_min: 0.65,
            hit_react_time_max: 1.5,
            stun_time: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let shooter = ShooterConfig::default();
        assert_eq!(shooter.stun_chance, 0.25);
        assert_eq!(shooter.starting_rifle_ammo, 120);
        assert_eq!(shooter.pickup_sound_reset_time, 0.2);
        assert_eq!(shooter.equip_sound_reset_time, 0.2);

        let enemy = EnemyConfig::default();
        assert_eq!(enemy.max_health, 100_000.0);
        assert_eq!(enemy.stun_chance, 0.1);
        assert_eq!(enemy.death_time, 4.0);
        assert!(enemy.hit_react_time_min < enemy.hit_react_time_max);
    }
}
