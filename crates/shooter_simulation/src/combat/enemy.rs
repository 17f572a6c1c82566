//! Enemy — боевая запись врага
//!
//! Проще персонажа: нет inventory, нет CombatState. Только флаги
//! (stunned, can_attack, can_hit_react, in_range, dying) и таймеры.
//!
//! Все решения "что делать дальше" принимает внешнее behaviour tree,
//! враг только пушит факты в blackboard (`EnemyEvent::Blackboard`).

use bevy::prelude::*;
use rand::Rng;
use std::time::Duration;

use crate::ai::{BlackboardKey, BlackboardValue};
use crate::combat::damage::{resolve_hit, roll_stun, HitOutcome, Mortal};
use crate::components::Health;
use crate::config::EnemyConfig;
use crate::presentation::{EffectCue, Montage, PresentationCue, SoundCue, Widget};
use crate::scheduler::Scheduler;

/// Секции attack montage (выбор uniform)
pub const ATTACK_SECTIONS: [&str; 4] = ["AttackLFast", "AttackRFast", "AttackL", "AttackR"];

pub const HIT_REACT_SECTION: &str = "HitReactFront";

/// Левая/правая рука врага (отдельные weapon коллайдеры)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyWeaponSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyTimer {
    HideHealthBar,
    HitReactReset,
    AttackReset,
    EndStun,
    FinishDeath,
    /// Удалить всплывающую цифру урона с этим id
    HitNumber(u32),
}

/// Outbox записи врага
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyEvent {
    Cue(PresentationCue),
    Blackboard(BlackboardKey, BlackboardValue),
    /// Удалить врага из мира через `delay` секунд
    Despawn { delay: f32 },
}

#[derive(Component, Debug, Clone)]
pub struct Enemy {
    config: EnemyConfig,
    is_stunned: bool,
    can_attack: bool,
    can_hit_react: bool,
    is_in_range: bool,
    is_dying: bool,
    death_finished: bool,
    health_bar_visible: bool,
    left_weapon_active: bool,
    right_weapon_active: bool,
    hit_numbers: Vec<u32>,
    next_hit_number: u32,
    timers: Scheduler<EnemyTimer>,
    outbox: Vec<EnemyEvent>,
}

impl Enemy {
    pub fn new(config: EnemyConfig) -> Self {
        let mut enemy = Self {
            config,
            is_stunned: false,
            can_attack: true,
            can_hit_react: true,
            is_in_range: false,
            is_dying: false,
            death_finished: false,
            health_bar_visible: false,
            left_weapon_active: false,
            right_weapon_active: false,
            hit_numbers: Vec::new(),
            next_hit_number: 0,
            timers: Scheduler::new(),
            outbox: Vec::new(),
        };

        enemy.push_bool(BlackboardKey::CanAttack, true);
        enemy
    }

    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    pub fn base_damage(&self) -> f32 {
        self.config.base_damage
    }

    pub fn stun_chance(&self) -> f32 {
        self.config.stun_chance
    }

    pub fn is_stunned(&self) -> bool {
        self.is_stunned
    }

    pub fn can_attack(&self) -> bool {
        self.can_attack
    }

    pub fn can_hit_react(&self) -> bool {
        self.can_hit_react
    }

    pub fn is_in_range(&self) -> bool {
        self.is_in_range
    }

    pub fn is_dying(&self) -> bool {
        self.is_dying
    }

    pub fn health_bar_visible(&self) -> bool {
        self.health_bar_visible
    }

    pub fn hit_number_count(&self) -> usize {
        self.hit_numbers.len()
    }

    pub fn is_headshot(&self, bone_name: &str) -> bool {
        bone_name == self.config.head_bone
    }

    // ------------------------------------------------------------------------
    // Bullet hits
    // ------------------------------------------------------------------------

    /// Звук + эффект попадания (играет всегда, даже по умирающему)
    pub fn bullet_impact(&mut self, location: Vec3) {
        self.cue(PresentationCue::Sound(SoundCue::BulletImpact));
        self.cue(PresentationCue::effect_at(EffectCue::EnemyImpact, location));
    }

    /// Урон от пули персонажа
    ///
    /// Target в blackboard = стрелок. Если враг не умирает: health bar,
    /// stun roll на собственном `stun_chance` → hit react + Stunned.
    pub fn take_bullet_damage<R: Rng + ?Sized>(
        &mut self,
        health: &mut Health,
        shooter: Entity,
        damage: f32,
        rng: &mut R,
    ) -> HitOutcome {
        self.push(BlackboardKey::Target, BlackboardValue::Object(Some(shooter)));

        let outcome = resolve_hit(health, self, damage);
        if self.is_dying {
            return outcome;
        }

        self.show_health_bar();

        if roll_stun(rng, self.config.stun_chance) {
            self.play_hit_montage(HIT_REACT_SECTION, rng);
            self.set_stunned(true);
            self.timers.schedule(EnemyTimer::EndStun, self.config.stun_time);
        }

        outcome
    }

    pub fn show_health_bar(&mut self) {
        self.health_bar_visible = true;
        self.cue(PresentationCue::Widget {
            widget: Widget::HealthBar,
            visible: true,
        });
        self.timers
            .schedule(EnemyTimer::HideHealthBar, self.config.health_bar_display_time);
    }

    pub fn hide_health_bar(&mut self) {
        self.timers.cancel(EnemyTimer::HideHealthBar);
        if self.health_bar_visible {
            self.health_bar_visible = false;
            self.cue(PresentationCue::Widget {
                widget: Widget::HealthBar,
                visible: false,
            });
        }
    }

    /// Всплывающая цифра урона; сама исчезает через `hit_number_destroy_time`
    pub fn show_hit_number(&mut self, damage: f32, location: Vec3, headshot: bool) -> Option<u32> {
        if self.is_dying {
            return None;
        }

        let id = self.next_hit_number;
        self.next_hit_number = self.next_hit_number.wrapping_add(1);

        self.hit_numbers.push(id);
        self.cue(PresentationCue::HitNumber {
            id,
            damage,
            location,
            headshot,
        });
        self.timers
            .schedule(EnemyTimer::HitNumber(id), self.config.hit_number_destroy_time);
        Some(id)
    }

    /// Hit react montage с cooldown'ом uniform в [min, max]
    pub fn play_hit_montage<R: Rng + ?Sized>(&mut self, section: &str, rng: &mut R) -> bool {
        if !self.can_hit_react || self.is_dying {
            return false;
        }

        self.cue(PresentationCue::montage(Montage::EnemyHitReact, section));

        self.can_hit_react = false;
        let low = self.config.hit_react_time_min.min(self.config.hit_react_time_max);
        let high = self.config.hit_react_time_min.max(self.config.hit_react_time_max);
        let cooldown = rng.gen_range(low..=high);
        self.timers.schedule(EnemyTimer::HitReactReset, cooldown);
        true
    }

    pub fn set_stunned(&mut self, stunned: bool) {
        self.is_stunned = stunned;
        self.push_bool(BlackboardKey::Stunned, stunned);
    }

    // ------------------------------------------------------------------------
    // Attacks
    // ------------------------------------------------------------------------

    /// Атака (вызывается behaviour tree): случайная секция из четырёх,
    /// CanAttack = false до `attack_wait_time`
    pub fn play_attack<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&'static str> {
        if self.is_dying || !self.can_attack {
            return None;
        }

        let section = ATTACK_SECTIONS[rng.gen_range(0..ATTACK_SECTIONS.len())];
        self.cue(PresentationCue::montage(Montage::EnemyAttack, section));

        self.can_attack = false;
        self.timers
            .schedule(EnemyTimer::AttackReset, self.config.attack_wait_time);
        self.push_bool(BlackboardKey::CanAttack, false);
        Some(section)
    }

    pub fn reset_can_attack(&mut self) {
        self.can_attack = true;
        self.push_bool(BlackboardKey::CanAttack, true);
    }

    /// Окно активности weapon коллайдера (anim notify)
    pub fn set_weapon_active(&mut self, side: EnemyWeaponSide, active: bool) {
        match side {
            EnemyWeaponSide::Left => self.left_weapon_active = active,
            EnemyWeaponSide::Right => self.right_weapon_active = active,
        }
    }

    pub fn weapon_active(&self, side: EnemyWeaponSide) -> bool {
        match side {
            EnemyWeaponSide::Left => self.left_weapon_active,
            EnemyWeaponSide::Right => self.right_weapon_active,
        }
    }

    /// Может ли overlap этой руки нанести урон
    pub fn melee_hit_allowed(&self, side: EnemyWeaponSide) -> bool {
        !self.is_dying && self.weapon_active(side)
    }

    // ------------------------------------------------------------------------
    // Sensing
    // ------------------------------------------------------------------------

    /// Персонаж вошёл в agro sphere
    pub fn agro_overlap(&mut self, character: Entity) {
        if self.is_dying {
            return;
        }
        self.push(BlackboardKey::Target, BlackboardValue::Object(Some(character)));
    }

    /// Персонаж вошёл/вышел из combat range
    pub fn set_in_range(&mut self, in_range: bool) {
        if self.is_dying {
            return;
        }
        self.is_in_range = in_range;
        self.push_bool(BlackboardKey::InAttackRange, in_range);
    }

    /// Этот враг убил персонажа
    pub fn on_character_killed(&mut self) {
        self.push_bool(BlackboardKey::CharacterDead, true);
    }

    // ------------------------------------------------------------------------
    // Death
    // ------------------------------------------------------------------------

    /// Конец death montage: анимации на паузу, удаление через `death_time`
    pub fn finish_death(&mut self) -> bool {
        if !self.is_dying || self.death_finished {
            return false;
        }

        self.death_finished = true;
        self.timers.cancel(EnemyTimer::FinishDeath);
        self.cue(PresentationCue::PauseAnimations);
        self.outbox.push(EnemyEvent::Despawn {
            delay: self.config.death_time,
        });
        true
    }

    // ------------------------------------------------------------------------
    // Tick / outbox
    // ------------------------------------------------------------------------

    pub fn tick(&mut self, delta: Duration) {
        for timer in self.timers.tick(delta) {
            match timer {
                EnemyTimer::HideHealthBar => self.hide_health_bar(),
                EnemyTimer::HitReactReset => self.can_hit_react = true,
                EnemyTimer::AttackReset => {
                    if !self.is_dying {
                        self.reset_can_attack();
                    }
                }
                EnemyTimer::EndStun => {
                    if !self.is_dying {
                        self.set_stunned(false);
                    }
                }
                EnemyTimer::FinishDeath => {
                    self.finish_death();
                }
                EnemyTimer::HitNumber(id) => {
                    self.hit_numbers.retain(|existing| *existing != id);
                    self.cue(PresentationCue::RemoveHitNumber(id));
                }
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<EnemyEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn cue(&mut self, cue: PresentationCue) {
        self.outbox.push(EnemyEvent::Cue(cue));
    }

    fn push(&mut self, key: BlackboardKey, value: BlackboardValue) {
        self.outbox.push(EnemyEvent::Blackboard(key, value));
    }

    fn push_bool(&mut self, key: BlackboardKey, value: bool) {
        self.push(key, BlackboardValue::Bool(value));
    }
}

impl Mortal for Enemy {
    fn is_dead(&self) -> bool {
        self.is_dying
    }

    fn die(&mut self) {
        if self.is_dying {
            return;
        }

        self.is_dying = true;
        self.hide_health_bar();
        self.cue(PresentationCue::montage(Montage::EnemyDeath, "Death"));
        self.push_bool(BlackboardKey::Dead, true);
        self.cue(PresentationCue::StopMovement);
        self.timers
            .schedule(EnemyTimer::FinishDeath, self.config.death_montage_time);
    }
}
