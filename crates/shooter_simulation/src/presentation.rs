//! Presentation commands (ECS → движок)
//!
//! Симуляция не играет звуки, анимации и эффекты сама. Записи (Shooter,
//! Enemy, ItemRecord) складывают декларативные `PresentationCue` в свой
//! outbox, flush-системы превращают их в `PresentationCommand` events.
//!
//! Fire-and-forget: ответ движка симуляцию не интересует.

use bevy::prelude::*;

use crate::components::ItemProfile;

/// Звуковые cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Fire,
    NoAmmo,
    PickUp,
    Equip,
    ZoomIn,
    ZoomOut,
    /// Попадание пули во врага
    BulletImpact,
    CharacterHit,
    CharacterCriticalHealth,
    CharacterDeath,
    Explode,
}

/// Particle эффекты
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCue {
    MuzzleFlash,
    BulletTrail,
    /// Попадание в не-врага (стена, пол)
    DefaultImpact,
    /// Попадание во врага
    EnemyImpact,
    CharacterHit,
    Explosion,
}

/// Montage (секция передаётся отдельно)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Montage {
    HipFire,
    Reload,
    Equip,
    CharacterHit,
    CharacterDeath,
    EnemyHitReact,
    EnemyAttack,
    EnemyDeath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    /// Виджет подбора над предметом
    Pickup,
    /// Health bar над врагом
    HealthBar,
}

/// Одна декларативная команда для presentation слоя
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCue {
    Sound(SoundCue),
    Montage { montage: Montage, section: String },
    Effect { effect: EffectCue, location: Option<Vec3> },
    Widget { widget: Widget, visible: bool },
    /// Всплывающая цифра урона (живёт до RemoveHitNumber)
    HitNumber { id: u32, damage: f32, location: Vec3, headshot: bool },
    RemoveHitNumber(u32),
    CustomDepth(bool),
    Glow(bool),
    /// Какой visual/collision профиль применить к предмету
    ItemProfile(ItemProfile),
    ItemScale(f32),
    /// Звёзды rarity на pickup widget (index 0 не используется)
    ActiveStars([bool; 6]),
    CameraZoom(bool),
    PauseAnimations,
    StopMovement,
}

impl PresentationCue {
    pub fn montage(montage: Montage, section: impl Into<String>) -> Self {
        PresentationCue::Montage {
            montage,
            section: section.into(),
        }
    }

    pub fn effect(effect: EffectCue) -> Self {
        PresentationCue::Effect {
            effect,
            location: None,
        }
    }

    pub fn effect_at(effect: EffectCue, location: Vec3) -> Self {
        PresentationCue::Effect {
            effect,
            location: Some(location),
        }
    }
}

/// Event: presentation команда для конкретной entity
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PresentationCommand {
    pub target: Entity,
    pub cue: PresentationCue,
}

/// Presentation plugin — регистрирует outgoing event
///
/// Движок читает `PresentationCommand` через EventReader. Headless
/// runner только логирует заметные команды.
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PresentationCommand>()
            .add_systems(Last, log_presentation_commands);
    }
}

/// Debug-лог для montage/звуков смерти (остальное слишком шумное)
fn log_presentation_commands(mut commands: EventReader<PresentationCommand>) {
    for command in commands.read() {
        match &command.cue {
            PresentationCue::Montage { montage, section } => {
                crate::logger::log(&format!(
                    "🎬 {:?}: montage {:?} [{}]",
                    command.target, montage, section
                ));
            }
            PresentationCue::Sound(SoundCue::CharacterDeath) => {
                crate::logger::log(&format!("💀 {:?}: death sound", command.target));
            }
            _ => {}
        }
    }
}
