//! AI collaboration module
//!
//! Behaviour tree живёт во внешнем движке. ECS только пушит факты
//! в blackboard врага через `BlackboardUpdate` events.

use bevy::prelude::*;

pub mod blackboard;

// Re-export основных типов
pub use blackboard::{Blackboard, BlackboardKey, BlackboardUpdate, BlackboardValue};

/// AI Plugin
///
/// Регистрирует BlackboardUpdate и зеркалирование в `Blackboard` компонент.
/// Зеркало обновляется в PostUpdate, после всех FixedUpdate push'ей кадра.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BlackboardUpdate>()
            .add_systems(PostUpdate, blackboard::mirror_blackboard_updates);
    }
}
