//! Shooter — боевая запись персонажа
//!
//! # Архитектура
//!
//! Один компонент владеет всем, что мутирует только сам персонаж:
//! - `CombatState` (единственный gate для fire/reload/equip)
//! - `Inventory` + `AmmoMap` + `InterpSlots`
//! - флаги ввода (fire/aim held), смерть, item trace state
//! - `Scheduler<ShooterTimer>` — все отложенные completion'ы
//! - outbox (`ShooterEvent`) — flush-система превращает его в Bevy events
//!
//! Методы возвращают bool/Option, чтобы тесты видели отказ. Нелегальный
//! переход — молчаливый no-op, не ошибка.
//!
//! Stunned всегда побеждает: каждый отложенный completion сначала
//! проверяет текущий state.

use bevy::prelude::*;
use rand::Rng;
use std::time::Duration;

use crate::combat::damage::{character_hit_sound, resolve_hit, roll_stun, HitOutcome, Mortal};
use crate::combat::Weapon;
use crate::components::{
    AmmoMap, AmmoPickup, CombatState, Health, Inventory, InterpSlots, ItemRecord, ItemState,
    Pickup, EMPTY_SLOT,
};
use crate::config::ShooterConfig;
use crate::item_system::{AmmoCategory, GameTables, TableError, WeaponKind};
use crate::presentation::{EffectCue, Montage, PresentationCue, SoundCue};
use crate::scheduler::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShooterTimer {
    AutoFireReset,
    FinishReload,
    FinishEquip,
    EndStun,
    FinishDeath,
    PickupSoundReset,
    EquipSoundReset,
}

/// Действие игрока (или anim notify от движка)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShooterAction {
    FirePressed,
    FireReleased,
    AimPressed,
    AimReleased,
    Reload,
    /// Подобрать предмет под прицелом
    Select,
    /// Hotkey слота inventory (0 = F, 1-5 = цифры)
    SelectSlot(usize),
    DropWeapon,
    // Anim notifies
    FinishReload,
    FinishEquip,
    EndStun,
}

/// Outbox персонажа
#[derive(Debug, Clone)]
pub enum ShooterEvent {
    Cue(PresentationCue),
    SlotChanged { old: i32, new: i32 },
    SlotHighlight { slot: i32, highlighted: bool },
    Fired { kind: WeaponKind, ammo_left: u32 },
    /// Выброшенное оружие: станет world pickup'ом
    Dropped(Weapon),
    Died,
}

#[derive(Component, Debug, Clone)]
pub struct Shooter {
    config: ShooterConfig,
    state: CombatState,
    inventory: Inventory,
    ammo: AmmoMap,
    interp_slots: InterpSlots,
    is_aiming: bool,
    aim_button_held: bool,
    fire_button_held: bool,
    is_dead: bool,
    input_enabled: bool,
    overlapped_items: u32,
    hovered_item: Option<Entity>,
    hovered_last_frame: Option<Entity>,
    highlighted_slot: i32,
    pickup_sound_ready: bool,
    equip_sound_ready: bool,
    timers: Scheduler<ShooterTimer>,
    outbox: Vec<ShooterEvent>,
}

impl Shooter {
    /// Новый персонаж; стартовое оружие (если есть) кладётся в slot 0 и экипируется
    pub fn new(config: ShooterConfig, default_weapon: Option<Weapon>) -> Self {
        let ammo = AmmoMap::seeded(
            config.starting_light_ammo,
            config.starting_rifle_ammo,
            config.starting_sniper_ammo,
        );
        let interp_slots = InterpSlots::with_generic_slots(config.interp_slot_count);

        let mut shooter = Self {
            config,
            state: CombatState::Unoccupied,
            inventory: Inventory::new(),
            ammo,
            interp_slots,
            is_aiming: false,
            aim_button_held: false,
            fire_button_held: false,
            is_dead: false,
            input_enabled: true,
            overlapped_items: 0,
            hovered_item: None,
            hovered_last_frame: None,
            highlighted_slot: EMPTY_SLOT,
            pickup_sound_ready: true,
            equip_sound_ready: true,
            timers: Scheduler::new(),
            outbox: Vec::new(),
        };

        if let Some(weapon) = default_weapon {
            shooter.equip_default_weapon(weapon);
        }

        shooter
    }

    /// Персонаж со стартовым оружием из таблиц (kind/rarity из конфига)
    pub fn from_tables(config: ShooterConfig, tables: &GameTables) -> Result<Self, TableError> {
        let weapon = tables.build_weapon(config.default_weapon, config.default_weapon_rarity)?;
        Ok(Self::new(config, Some(weapon)))
    }

    fn equip_default_weapon(&mut self, weapon: Weapon) {
        let Ok(index) = self.inventory.push(weapon) else {
            return;
        };

        self.equip(index, false);
        if let Some(weapon) = self.inventory.get_mut(index) {
            weapon.item.disable_custom_depth();
            weapon.item.disable_glow();
        }
    }

    // ------------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &ShooterConfig {
        &self.config
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn ammo(&self) -> &AmmoMap {
        &self.ammo
    }

    pub fn ammo_mut(&mut self) -> &mut AmmoMap {
        &mut self.ammo
    }

    pub fn interp_slots(&self) -> &InterpSlots {
        &self.interp_slots
    }

    pub fn interp_slots_mut(&mut self) -> &mut InterpSlots {
        &mut self.interp_slots
    }

    pub fn equipped_weapon(&self) -> Option<&Weapon> {
        self.inventory.equipped()
    }

    pub fn equipped_weapon_mut(&mut self) -> Option<&mut Weapon> {
        self.inventory.equipped_mut()
    }

    pub fn carried_ammo(&self, category: AmmoCategory) -> u32 {
        self.ammo.get(category)
    }

    pub fn stun_chance(&self) -> f32 {
        self.config.stun_chance
    }

    pub fn is_aiming(&self) -> bool {
        self.is_aiming
    }

    pub fn fire_button_held(&self) -> bool {
        self.fire_button_held
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn highlighted_slot(&self) -> i32 {
        self.highlighted_slot
    }

    pub fn overlapped_items(&self) -> u32 {
        self.overlapped_items
    }

    pub fn pickup_sound_ready(&self) -> bool {
        self.pickup_sound_ready
    }

    pub fn equip_sound_ready(&self) -> bool {
        self.equip_sound_ready
    }

    pub fn is_pending(&self, timer: ShooterTimer) -> bool {
        self.timers.is_pending(timer)
    }

    // ------------------------------------------------------------------------
    // Input dispatch
    // ------------------------------------------------------------------------

    /// Применить действие игрока. `Select` требует мира и обрабатывается pickup системой.
    pub fn handle_input(&mut self, action: ShooterAction) -> bool {
        if !self.input_enabled {
            return false;
        }

        match action {
            ShooterAction::FirePressed => {
                self.fire_button_held = true;
                self.fire()
            }
            ShooterAction::FireReleased => {
                self.fire_button_held = false;
                true
            }
            ShooterAction::AimPressed => self.aim_pressed(),
            ShooterAction::AimReleased => {
                self.aim_released();
                true
            }
            ShooterAction::Reload => self.reload(),
            ShooterAction::Select => false,
            ShooterAction::SelectSlot(slot) => self.select_slot(slot),
            ShooterAction::DropWeapon => self.drop_equipped(),
            ShooterAction::FinishReload => self.finish_reload().is_some(),
            ShooterAction::FinishEquip => self.finish_equip(),
            ShooterAction::EndStun => {
                self.end_stun();
                true
            }
        }
    }

    // ------------------------------------------------------------------------
    // Fire
    // ------------------------------------------------------------------------

    /// Выстрел: только из Unoccupied и только с патронами в магазине
    pub fn fire(&mut self) -> bool {
        if !self.state.can_fire() {
            return false;
        }

        let slide_time = self.config.slide_time;
        let Some(weapon) = self.inventory.equipped_mut() else {
            return false;
        };

        if !weapon.has_ammo() {
            self.cue(PresentationCue::Sound(SoundCue::NoAmmo));
            return false;
        }

        weapon.decrement_ammo();
        if weapon.is_pistol() {
            weapon.item.start_slide(slide_time);
        }

        let kind = weapon.kind;
        let ammo_left = weapon.ammo;
        let fire_rate = weapon.auto_fire_rate;

        self.cue(PresentationCue::Sound(SoundCue::Fire));
        self.cue(PresentationCue::effect(EffectCue::MuzzleFlash));
        self.cue(PresentationCue::montage(Montage::HipFire, "StartFire"));
        self.outbox.push(ShooterEvent::Fired { kind, ammo_left });

        self.state = CombatState::FireTimerInProgress;
        self.timers.schedule(ShooterTimer::AutoFireReset, fire_rate);
        true
    }

    /// Конец окна выстрела
    ///
    /// Fire held + auto оружие + патроны → сразу следующий выстрел;
    /// пустой магазин → auto reload.
    pub fn auto_fire_reset(&mut self) {
        // Stunned перекрывает
        if self.state != CombatState::FireTimerInProgress {
            return;
        }

        self.state = CombatState::Unoccupied;

        let Some(weapon) = self.inventory.equipped() else {
            return;
        };

        if weapon.has_ammo() {
            if self.fire_button_held && weapon.can_auto_fire {
                self.fire();
            }
        } else {
            self.reload();
        }
    }

    // ------------------------------------------------------------------------
    // Reload
    // ------------------------------------------------------------------------

    /// Есть ли запас патронов для экипированного оружия
    pub fn carrying_ammo(&self) -> bool {
        self.inventory
            .equipped()
            .is_some_and(|weapon| self.ammo.get(weapon.ammo_category) > 0)
    }

    pub fn reload(&mut self) -> bool {
        if !self.state.can_reload() {
            return false;
        }

        let Some(weapon) = self.inventory.equipped() else {
            return false;
        };

        if weapon.is_magazine_full() || !self.carrying_ammo() {
            return false;
        }

        let section = weapon.reload_section.clone();
        self.state = CombatState::Reloading;
        self.cue(PresentationCue::montage(Montage::Reload, section));
        self.timers
            .schedule(ShooterTimer::FinishReload, self.config.reload_time);
        true
    }

    /// Завершение reload: переносит min(пустое место, запас) в магазин
    ///
    /// Действует только из Reloading: Stunned (и повторный вызов после
    /// завершения) — no-op. Возвращает перенесённое количество.
    pub fn finish_reload(&mut self) -> Option<u32> {
        if self.state != CombatState::Reloading {
            return None;
        }

        self.timers.cancel(ShooterTimer::FinishReload);
        self.state = CombatState::Unoccupied;

        let weapon = self.inventory.equipped_mut()?;
        let category = weapon.ammo_category;
        if !self.ammo.contains(category) {
            return Some(0);
        }

        let transferred = self.ammo.take(category, weapon.empty_space());
        weapon.reload_ammo(transferred);
        Some(transferred)
    }

    // ------------------------------------------------------------------------
    // Stun / death
    // ------------------------------------------------------------------------

    /// Принудительный Stunned (мёртвого не оглушить)
    pub fn stun(&mut self, health: &Health) -> bool {
        if !health.is_alive() {
            return false;
        }

        self.state = CombatState::Stunned;
        self.cue(PresentationCue::montage(Montage::CharacterHit, "HitReact"));
        self.timers.schedule(ShooterTimer::EndStun, self.config.stun_time);
        true
    }

    /// Единственный выход из Stunned
    pub fn end_stun(&mut self) {
        self.timers.cancel(ShooterTimer::EndStun);
        self.state = CombatState::Unoccupied;
    }

    /// Melee удар врага: урон, звук по остатку здоровья, stun roll
    pub fn take_melee_hit<R: Rng + ?Sized>(
        &mut self,
        health: &mut Health,
        damage: f32,
        rng: &mut R,
    ) -> HitOutcome {
        let outcome = resolve_hit(health, self, damage);

        self.cue(PresentationCue::Sound(character_hit_sound(health, damage)));
        self.cue(PresentationCue::effect(EffectCue::CharacterHit));

        if roll_stun(rng, self.config.stun_chance) {
            self.stun(health);
        }

        outcome
    }

    /// Конец death montage: анимации на паузу, ввод отключён
    pub fn finish_death(&mut self) {
        self.cue(PresentationCue::PauseAnimations);
        self.input_enabled = false;
        self.fire_button_held = false;
        self.aim_button_held = false;
    }

    // ------------------------------------------------------------------------
    // Aim
    // ------------------------------------------------------------------------

    pub fn aim_pressed(&mut self) -> bool {
        self.aim_button_held = true;
        self.start_aiming()
    }

    pub fn aim_released(&mut self) {
        self.aim_button_held = false;
        self.stop_aiming();
    }

    fn start_aiming(&mut self) -> bool {
        if !self.state.can_aim() {
            return false;
        }

        self.is_aiming = true;
        self.cue(PresentationCue::Sound(SoundCue::ZoomIn));
        self.cue(PresentationCue::CameraZoom(true));
        true
    }

    fn stop_aiming(&mut self) {
        self.is_aiming = false;
        self.cue(PresentationCue::Sound(SoundCue::ZoomOut));
        self.cue(PresentationCue::CameraZoom(false));
    }

    // ------------------------------------------------------------------------
    // Equip / inventory
    // ------------------------------------------------------------------------

    /// Экипировать оружие из слота `index`
    ///
    /// SlotChanged шлётся если это не swap; old = -1 если ничего не было в руках.
    pub fn equip(&mut self, index: usize, is_swap: bool) -> bool {
        let Some(new_slot) = self.inventory.get(index).map(|weapon| weapon.slot_index) else {
            return false;
        };

        let old_slot = self.inventory.equipped_slot();
        if old_slot == EMPTY_SLOT || !is_swap {
            self.outbox.push(ShooterEvent::SlotChanged {
                old: old_slot,
                new: new_slot,
            });
        }

        self.inventory.set_equipped(Some(index));
        if let Some(weapon) = self.inventory.equipped_mut() {
            weapon.set_state(ItemState::Equipped);
        }
        true
    }

    /// Hotkey слота: смена с текущего экипированного
    ///
    /// Руки пусты → слот экипируется сразу, без equip montage.
    pub fn select_slot(&mut self, new_index: usize) -> bool {
        let Some(current) = self.inventory.equipped_index() else {
            if new_index >= self.inventory.len() || !self.state.can_change_weapon() {
                return false;
            }
            return self.equip(new_index, false);
        };
        self.exchange_slot(current, new_index)
    }

    /// Смена оружия: только current ≠ new, new в пределах inventory,
    /// state Unoccupied или Equipping
    pub fn exchange_slot(&mut self, current: usize, new: usize) -> bool {
        let can_change = current != new
            && new < self.inventory.len()
            && self.state.can_change_weapon();
        if !can_change {
            return false;
        }

        if self.is_aiming {
            self.stop_aiming();
        }

        let old_index = self.inventory.equipped_index();
        self.equip(new, false);

        if let Some(old) = old_index.filter(|old| *old != new) {
            if let Some(weapon) = self.inventory.get_mut(old) {
                weapon.set_state(ItemState::PickedUp);
            }
        }

        self.state = CombatState::Equipping;
        self.cue(PresentationCue::montage(Montage::Equip, "Equip"));
        self.timers
            .schedule(ShooterTimer::FinishEquip, self.config.equip_time);
        self.play_equip_sound(true);
        true
    }

    /// Конец equip montage; повторно включает прицел если кнопка зажата
    pub fn finish_equip(&mut self) -> bool {
        // Stunned перекрывает
        if self.state != CombatState::Equipping {
            return false;
        }

        self.timers.cancel(ShooterTimer::FinishEquip);
        self.state = CombatState::Unoccupied;

        if self.aim_button_held {
            self.start_aiming();
        }
        true
    }

    /// Первый пустой слот / append index / EMPTY_SLOT если полон
    pub fn empty_slot(&self) -> i32 {
        self.inventory.empty_slot()
    }

    /// Подобранный предмет (после interpolation) попадает в inventory
    pub fn pick_up(&mut self, pickup: Pickup) {
        self.play_equip_sound(false);

        match pickup {
            Pickup::Weapon(mut weapon) => {
                if self.inventory.is_full() {
                    self.swap_weapon(weapon);
                    return;
                }

                weapon.set_state(ItemState::PickedUp);
                match self.inventory.push(weapon) {
                    Ok(index) if self.inventory.equipped_index().is_none() => {
                        self.equip(index, false);
                    }
                    Ok(_) => {}
                    Err(weapon) => {
                        self.swap_weapon(weapon);
                    }
                }
            }
            Pickup::Ammo(ammo) => self.pick_up_ammo(ammo),
        }
    }

    fn pick_up_ammo(&mut self, ammo: AmmoPickup) {
        self.ammo.add(ammo.category, ammo.count());

        let empty_matching = self
            .inventory
            .equipped()
            .is_some_and(|weapon| weapon.ammo_category == ammo.category && weapon.ammo == 0);
        if empty_matching {
            self.reload();
        }
    }

    /// Полный inventory: новое оружие встаёт на место экипированного,
    /// старое выбрасывается
    pub fn swap_weapon(&mut self, weapon: Weapon) -> bool {
        let Some(index) = self.inventory.equipped_index() else {
            // Некуда ставить — оружие возвращается в мир
            self.throw_weapon(weapon);
            return false;
        };

        match self.inventory.replace(index, weapon) {
            Ok(old) => {
                self.inventory.set_equipped(None);
                self.throw_weapon(old);
                self.equip(index, true);

                self.hovered_item = None;
                self.hovered_last_frame = None;
                true
            }
            Err(weapon) => {
                self.throw_weapon(weapon);
                false
            }
        }
    }

    /// Выбросить экипированное оружие
    ///
    /// В руки берётся первый оставшийся слот; пустой inventory → руки пусты.
    pub fn drop_equipped(&mut self) -> bool {
        let Some(weapon) = self.inventory.take_equipped() else {
            return false;
        };

        self.throw_weapon(weapon);

        if !self.inventory.is_empty() {
            self.equip(0, false);
        }
        true
    }

    fn throw_weapon(&mut self, mut weapon: Weapon) {
        weapon.item.start_falling(self.config.throw_time);
        self.outbox.push(ShooterEvent::Dropped(weapon));
    }

    // ------------------------------------------------------------------------
    // Item pickup flow
    // ------------------------------------------------------------------------

    /// Overlap с area sphere предмета: +1 / -1 (floor 0)
    pub fn increment_overlapped_items(&mut self, amount: i32) {
        let next = self.overlapped_items as i64 + amount as i64;
        self.overlapped_items = next.max(0) as u32;
    }

    /// Trace под прицелом идёт только пока есть overlap
    pub fn should_trace_for_items(&self) -> bool {
        self.overlapped_items > 0
    }

    pub fn hovered_item(&self) -> Option<Entity> {
        self.hovered_item
    }

    pub fn set_hovered_item(&mut self, item: Option<Entity>) {
        self.hovered_item = item;
    }

    pub fn hovered_last_frame(&self) -> Option<Entity> {
        self.hovered_last_frame
    }

    pub fn set_hovered_last_frame(&mut self, item: Option<Entity>) {
        self.hovered_last_frame = item;
    }

    /// Подсветить слот, куда ляжет оружие
    pub fn highlight_inventory_slot(&mut self) {
        let slot = self.empty_slot();
        self.highlighted_slot = slot;
        if slot != EMPTY_SLOT {
            self.outbox.push(ShooterEvent::SlotHighlight {
                slot,
                highlighted: true,
            });
        }
    }

    pub fn unhighlight_inventory_slot(&mut self) {
        if self.highlighted_slot != EMPTY_SLOT {
            self.outbox.push(ShooterEvent::SlotHighlight {
                slot: self.highlighted_slot,
                highlighted: false,
            });
        }
        self.highlighted_slot = EMPTY_SLOT;
    }

    /// Начать полёт предмета к персонажу
    pub fn begin_item_pickup(
        &mut self,
        self_entity: Entity,
        item: &mut ItemRecord,
        force_sound: bool,
    ) -> bool {
        if item
            .begin_interpolation(self_entity, &mut self.interp_slots)
            .is_none()
        {
            return false;
        }

        self.play_pickup_sound(force_sound);
        true
    }

    /// Полёт закончен: освободить interp slot, забрать предмет
    pub fn complete_item_pickup(&mut self, mut pickup: Pickup) {
        pickup.item_mut().finish_interpolation(&mut self.interp_slots);
        self.pick_up(pickup);
        self.unhighlight_inventory_slot();
    }

    /// Pickup звук с собственным cooldown (force — без cooldown'а)
    pub fn play_pickup_sound(&mut self, force: bool) -> bool {
        if force {
            self.cue(PresentationCue::Sound(SoundCue::PickUp));
            return true;
        }

        if !self.pickup_sound_ready {
            return false;
        }

        self.pickup_sound_ready = false;
        self.timers.schedule(
            ShooterTimer::PickupSoundReset,
            self.config.pickup_sound_reset_time,
        );
        self.cue(PresentationCue::Sound(SoundCue::PickUp));
        true
    }

    /// Equip звук с собственным cooldown (независим от pickup)
    pub fn play_equip_sound(&mut self, force: bool) -> bool {
        if force {
            self.cue(PresentationCue::Sound(SoundCue::Equip));
            return true;
        }

        if !self.equip_sound_ready {
            return false;
        }

        self.equip_sound_ready = false;
        self.timers.schedule(
            ShooterTimer::EquipSoundReset,
            self.config.equip_sound_reset_time,
        );
        self.cue(PresentationCue::Sound(SoundCue::Equip));
        true
    }

    // ------------------------------------------------------------------------
    // Tick / outbox
    // ------------------------------------------------------------------------

    pub fn tick(&mut self, delta: Duration) {
        for timer in self.timers.tick(delta) {
            match timer {
                ShooterTimer::AutoFireReset => self.auto_fire_reset(),
                ShooterTimer::FinishReload => {
                    self.finish_reload();
                }
                ShooterTimer::FinishEquip => {
                    self.finish_equip();
                }
                ShooterTimer::EndStun => {
                    if self.state == CombatState::Stunned {
                        self.end_stun();
                    }
                }
                ShooterTimer::FinishDeath => self.finish_death(),
                ShooterTimer::PickupSoundReset => self.pickup_sound_ready = true,
                ShooterTimer::EquipSoundReset => self.equip_sound_ready = true,
            }
        }

        // Таймеры оружия в руках (slide)
        for weapon in self.inventory.weapons_mut() {
            weapon.item.tick(delta);
        }
    }

    /// Забрать накопленные события (включая cues оружия в inventory)
    pub fn drain_events(&mut self) -> Vec<ShooterEvent> {
        let mut events = std::mem::take(&mut self.outbox);
        for weapon in self.inventory.weapons_mut() {
            events.extend(weapon.item.drain_cues().into_iter().map(ShooterEvent::Cue));
        }
        events
    }

    fn cue(&mut self, cue: PresentationCue) {
        self.outbox.push(ShooterEvent::Cue(cue));
    }
}

impl Mortal for Shooter {
    fn is_dead(&self) -> bool {
        self.is_dead
    }

    fn die(&mut self) {
        if self.is_dead {
            return;
        }

        self.is_dead = true;
        self.cue(PresentationCue::montage(Montage::CharacterDeath, "Death"));
        self.timers
            .schedule(ShooterTimer::FinishDeath, self.config.death_time);
        self.outbox.push(ShooterEvent::Died);
    }
}
