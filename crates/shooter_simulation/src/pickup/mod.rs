//! Pickup module — предметы в мире и их подбор
//!
//! # Architecture
//!
//! **Pickup entity** держит `Pickup` (оружие или коробка патронов).
//!
//! **Flow подбора:**
//! - ItemOverlap → счётчик overlap'ов персонажа → ItemTraceToggle
//! - ItemTraceResult → наведённый предмет (виджет, outline, подсветка слота)
//! - ShooterInput::Select → предмет летит к interp slot персонажа
//! - Полёт закончен → предмет в inventory/запасе, pickup entity удалена
//!
//! Выброшенное оружие возвращается сюда же как новая pickup entity
//! (Falling → PickUp по таймеру).

use bevy::prelude::*;

use crate::combat::systems::{flush_shooter_events, process_shooter_input, tick_shooters};

pub mod events;
pub mod systems;

// Re-exports
pub use events::*;
pub use systems::*;

/// Pickup plugin
pub struct PickupPlugin;

impl Plugin for PickupPlugin {
    fn build(&self, app: &mut App) {
        app
            // Events
            .add_event::<ItemOverlap>()
            .add_event::<ItemTraceResult>()
            .add_event::<ItemInterpScale>()
            .add_event::<ItemTraceToggle>()
            .add_event::<ItemPickedUp>()
            // Между вводом и таймерами персонажа: hand-off успевает в тот же flush
            .add_systems(
                FixedUpdate,
                (
                    process_item_overlaps,
                    process_item_traces,
                    process_select_input,
                    apply_interp_scale,
                    tick_pickups,
                )
                    .chain()
                    .after(process_shooter_input)
                    .before(tick_shooters),
            )
            // После flush персонажа: выброшенное оружие уже заспавнено
            .add_systems(FixedUpdate, flush_pickup_cues.after(flush_shooter_events));
    }
}
