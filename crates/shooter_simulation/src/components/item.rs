//! Item components: lifecycle предмета (оружие или патроны)
//!
//! # Архитектура
//!
//! **ItemRecord** — общее состояние любого подбираемого предмета:
//! - `state` (PickUp → EquipInterpolating → PickedUp/Equipped → Falling → PickUp)
//! - interpolation к персонажу (reserved interp slot, requester, таймер z-curve)
//! - glow/custom depth/pickup widget (только флаги + presentation cues)
//! - собственный `Scheduler<ItemTimer>` (interp, pulse, throw, slide)
//!
//! **Pickup** — tagged union `{ Weapon, Ammo }`, компонент world entity.
//! Каждый вариант встраивает `ItemRecord`; dispatch только через `match`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::combat::Weapon;
use crate::components::InterpSlots;
use crate::item_system::{AmmoCategory, ItemRarity};
use crate::presentation::{PresentationCue, Widget};
use crate::scheduler::Scheduler;

/// Длительность полёта к персонажу (z-curve)
pub const DEFAULT_Z_CURVE_TIME: f32 = 1.25;
/// Период glow pulse у лежащего предмета
pub const DEFAULT_PULSE_CURVE_TIME: f32 = 5.0;

// ============================================================================
// ItemState + профиль
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum ItemState {
    /// Лежит в мире, можно подобрать
    #[default]
    PickUp,
    /// Летит к персонажу
    EquipInterpolating,
    /// В inventory, но не в руках
    PickedUp,
    /// В руках
    Equipped,
    /// Выброшен, падает (physics)
    Falling,
}

/// Visual/collision профиль предмета для текущего state
///
/// Симуляция только решает КАКОЙ профиль действует, применяет его движок.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemProfile {
    pub mesh_visible: bool,
    pub simulate_physics: bool,
    /// Area sphere генерирует overlap события
    pub area_overlaps: bool,
    /// Collision box попадает под item trace
    pub traceable: bool,
    /// Pickup widget принудительно скрыт
    pub hide_widget: bool,
}

impl ItemState {
    pub fn profile(self) -> ItemProfile {
        match self {
            ItemState::PickUp => ItemProfile {
                mesh_visible: true,
                simulate_physics: false,
                area_overlaps: true,
                traceable: true,
                hide_widget: false,
            },
            ItemState::EquipInterpolating => ItemProfile {
                mesh_visible: true,
                simulate_physics: false,
                area_overlaps: false,
                traceable: false,
                hide_widget: true,
            },
            ItemState::PickedUp => ItemProfile {
                mesh_visible: false,
                simulate_physics: false,
                area_overlaps: false,
                traceable: false,
                hide_widget: true,
            },
            ItemState::Equipped => ItemProfile {
                mesh_visible: true,
                simulate_physics: false,
                area_overlaps: false,
                traceable: false,
                hide_widget: true,
            },
            ItemState::Falling => ItemProfile {
                mesh_visible: true,
                simulate_physics: true,
                area_overlaps: false,
                traceable: false,
                hide_widget: false,
            },
        }
    }
}

/// Ключи таймеров предмета
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemTimer {
    /// Конец полёта к персонажу
    Interp,
    /// Перезапуск glow pulse (пока лежит в мире)
    Pulse,
    /// Выброшенное оружие перестаёт падать
    Throw,
    /// Пистолетный затвор вернулся на место
    Slide,
}

// ============================================================================
// ItemRecord
// ============================================================================

#[derive(Debug, Clone)]
pub struct ItemRecord {
    pub name: String,
    pub rarity: ItemRarity,
    /// Количество (патронов в коробке; для оружия 1)
    pub item_count: u32,
    state: ItemState,
    is_interping: bool,
    reserved_slot: Option<usize>,
    requester: Option<Entity>,
    scale: f32,
    can_change_custom_depth: bool,
    custom_depth: bool,
    glow: bool,
    widget_visible: bool,
    inventory_full_hint: bool,
    pub z_curve_time: f32,
    pub pulse_curve_time: f32,
    timers: Scheduler<ItemTimer>,
    cues: Vec<PresentationCue>,
}

impl ItemRecord {
    pub fn new(name: impl Into<String>, rarity: ItemRarity) -> Self {
        let mut item = Self {
            name: name.into(),
            rarity,
            item_count: 1,
            state: ItemState::PickUp,
            is_interping: false,
            reserved_slot: None,
            requester: None,
            scale: 1.0,
            can_change_custom_depth: true,
            custom_depth: false,
            glow: false,
            widget_visible: false,
            inventory_full_hint: false,
            z_curve_time: DEFAULT_Z_CURVE_TIME,
            pulse_curve_time: DEFAULT_PULSE_CURVE_TIME,
            timers: Scheduler::new(),
            cues: Vec::new(),
        };

        item.cues.push(PresentationCue::ActiveStars(item.active_stars()));
        item.set_state(ItemState::PickUp);
        item.enable_glow();
        item
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    /// Безусловный переход + cue с профилем нового state
    pub fn set_state(&mut self, state: ItemState) {
        self.state = state;
        let profile = state.profile();
        if profile.hide_widget && self.widget_visible {
            self.widget_visible = false;
            self.cues.push(PresentationCue::Widget {
                widget: Widget::Pickup,
                visible: false,
            });
        }
        self.cues.push(PresentationCue::ItemProfile(profile));
    }

    pub fn is_interping(&self) -> bool {
        self.is_interping
    }

    pub fn reserved_slot(&self) -> Option<usize> {
        self.reserved_slot
    }

    pub fn requester(&self) -> Option<Entity> {
        self.requester
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn custom_depth_enabled(&self) -> bool {
        self.custom_depth
    }

    pub fn can_change_custom_depth(&self) -> bool {
        self.can_change_custom_depth
    }

    pub fn glow_enabled(&self) -> bool {
        self.glow
    }

    pub fn widget_visible(&self) -> bool {
        self.widget_visible
    }

    pub fn inventory_full_hint(&self) -> bool {
        self.inventory_full_hint
    }

    pub fn set_inventory_full_hint(&mut self, full: bool) {
        self.inventory_full_hint = full;
    }

    /// Звёзды 1..=5 по rarity (index 0 не используется)
    pub fn active_stars(&self) -> [bool; 6] {
        let mut stars = [false; 6];
        for star in stars.iter_mut().skip(1).take(self.rarity.star_count()) {
            *star = true;
        }
        stars
    }

    pub fn set_widget_visible(&mut self, visible: bool) {
        if self.widget_visible == visible {
            return;
        }
        self.widget_visible = visible;
        self.cues.push(PresentationCue::Widget {
            widget: Widget::Pickup,
            visible,
        });
    }

    pub fn enable_custom_depth(&mut self) {
        if self.can_change_custom_depth {
            self.custom_depth = true;
            self.cues.push(PresentationCue::CustomDepth(true));
        }
    }

    pub fn disable_custom_depth(&mut self) {
        if self.can_change_custom_depth {
            self.custom_depth = false;
            self.cues.push(PresentationCue::CustomDepth(false));
        }
    }

    pub fn enable_glow(&mut self) {
        self.glow = true;
        self.cues.push(PresentationCue::Glow(true));
    }

    pub fn disable_glow(&mut self) {
        self.glow = false;
        self.cues.push(PresentationCue::Glow(false));
    }

    /// Pulse таймер идёт только у лежащего в мире предмета
    pub fn start_pulse_timer(&mut self) {
        if self.state == ItemState::PickUp {
            self.timers.schedule(ItemTimer::Pulse, self.pulse_curve_time);
        }
    }

    /// Сколько прошло с начала pulse цикла (для glow curve)
    pub fn pulse_elapsed(&self) -> Option<f32> {
        self.timers.elapsed_secs(ItemTimer::Pulse)
    }

    // ------------------------------------------------------------------------
    // Interpolation
    // ------------------------------------------------------------------------

    /// Начать полёт к персонажу
    ///
    /// No-op если уже в полёте (возвращает None, второй слот не резервируется).
    /// Иначе резервирует least-loaded interp slot и возвращает его index.
    pub fn begin_interpolation(
        &mut self,
        requester: Entity,
        slots: &mut InterpSlots,
    ) -> Option<usize> {
        if self.is_interping {
            return None;
        }

        self.requester = Some(requester);

        let slot = slots.select_least_loaded();
        slots.reserve(slot);
        self.reserved_slot = Some(slot);

        self.is_interping = true;
        self.set_state(ItemState::EquipInterpolating);

        self.timers.cancel(ItemTimer::Pulse);
        self.timers.schedule(ItemTimer::Interp, self.z_curve_time);

        self.can_change_custom_depth = false;
        Some(slot)
    }

    /// Конец полёта: освобождает слот (ровно один раз), возвращает requester
    ///
    /// Requester должен сам забрать предмет в inventory.
    pub fn finish_interpolation(&mut self, slots: &mut InterpSlots) -> Option<Entity> {
        self.is_interping = false;
        self.timers.cancel(ItemTimer::Interp);

        if let Some(slot) = self.reserved_slot.take() {
            slots.release(slot);
        }

        self.scale = 1.0;
        self.cues.push(PresentationCue::ItemScale(1.0));

        self.disable_glow();
        self.can_change_custom_depth = true;
        self.disable_custom_depth();

        self.requester
    }

    /// Отмена полёта: слот освобождается, предмет возвращается в PickUp
    ///
    /// Последующий `finish_interpolation` слот повторно не освобождает.
    pub fn cancel_interpolation(&mut self, slots: &mut InterpSlots) -> bool {
        if !self.is_interping {
            return false;
        }

        self.is_interping = false;
        self.timers.cancel(ItemTimer::Interp);

        if let Some(slot) = self.reserved_slot.take() {
            slots.release(slot);
        }

        self.requester = None;
        self.scale = 1.0;
        self.can_change_custom_depth = true;
        self.set_state(ItemState::PickUp);
        self.start_pulse_timer();
        true
    }

    /// Обновить масштаб во время полёта (curve value приходит от хоста)
    pub fn set_interp_scale(&mut self, scale: f32) {
        if self.is_interping {
            self.scale = scale.max(0.0);
            self.cues.push(PresentationCue::ItemScale(self.scale));
        }
    }

    // ------------------------------------------------------------------------
    // Falling / slide
    // ------------------------------------------------------------------------

    /// Выброшенный предмет падает `throw_time`, затем снова PickUp
    pub fn start_falling(&mut self, throw_time: f32) {
        self.requester = None;
        self.set_state(ItemState::Falling);
        self.timers.schedule(ItemTimer::Throw, throw_time);
        self.enable_glow();
    }

    pub fn is_falling(&self) -> bool {
        self.timers.is_pending(ItemTimer::Throw)
    }

    pub fn start_slide(&mut self, slide_time: f32) {
        self.timers.schedule(ItemTimer::Slide, slide_time);
    }

    pub fn is_moving_slide(&self) -> bool {
        self.timers.is_pending(ItemTimer::Slide)
    }

    // ------------------------------------------------------------------------
    // Tick / outbox
    // ------------------------------------------------------------------------

    /// Продвинуть таймеры предмета
    ///
    /// Pulse/Throw/Slide обрабатываются здесь. Возвращает true если истёк
    /// interp таймер: владелец должен вызвать `finish_interpolation` и
    /// передать предмет requester'у.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let mut interp_finished = false;

        for timer in self.timers.tick(delta) {
            match timer {
                ItemTimer::Interp => interp_finished = true,
                ItemTimer::Pulse => self.start_pulse_timer(),
                ItemTimer::Throw => {
                    self.set_state(ItemState::PickUp);
                    self.start_pulse_timer();
                }
                ItemTimer::Slide => {}
            }
        }

        interp_finished
    }

    pub fn drain_cues(&mut self) -> Vec<PresentationCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn has_cues(&self) -> bool {
        !self.cues.is_empty()
    }
}

// ============================================================================
// Pickup
// ============================================================================

/// Коробка патронов
#[derive(Debug, Clone)]
pub struct AmmoPickup {
    pub item: ItemRecord,
    pub category: AmmoCategory,
}

impl AmmoPickup {
    pub fn new(category: AmmoCategory, count: u32) -> Self {
        let mut item = ItemRecord::new(format!("{:?} Ammo", category), ItemRarity::Common);
        item.item_count = count;
        Self { item, category }
    }

    pub fn count(&self) -> u32 {
        self.item.item_count
    }
}

/// Подбираемый предмет в мире
#[derive(Component, Debug, Clone)]
pub enum Pickup {
    Weapon(Weapon),
    Ammo(AmmoPickup),
}

impl Pickup {
    pub fn item(&self) -> &ItemRecord {
        match self {
            Pickup::Weapon(weapon) => &weapon.item,
            Pickup::Ammo(ammo) => &ammo.item,
        }
    }

    pub fn item_mut(&mut self) -> &mut ItemRecord {
        match self {
            Pickup::Weapon(weapon) => &mut weapon.item,
            Pickup::Ammo(ammo) => &mut ammo.item,
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self, Pickup::Weapon(_))
    }
}
