//! Explosive — бочка/мина, реагирующая на пулю
//!
//! Движок сообщает, кто сейчас внутри overlap sphere (`ExplosiveOverlap`).
//! Попадание пули → взрыв: урон `damage` всем, кто внутри, затем entity
//! удаляется. Взрывается ровно один раз.

use bevy::prelude::*;

/// Урон взрыва по умолчанию
pub const DEFAULT_EXPLOSION_DAMAGE: f32 = 100.0;

#[derive(Component, Debug, Clone)]
pub struct Explosive {
    pub damage: f32,
    overlapping: Vec<Entity>,
    exploded: bool,
}

impl Default for Explosive {
    fn default() -> Self {
        Self::new(DEFAULT_EXPLOSION_DAMAGE)
    }
}

impl Explosive {
    pub fn new(damage: f32) -> Self {
        Self {
            damage: damage.max(0.0),
            overlapping: Vec::new(),
            exploded: false,
        }
    }

    /// Begin/end overlap сферы (повторный begin не дублирует)
    pub fn set_overlap(&mut self, actor: Entity, entered: bool) {
        if entered {
            if !self.overlapping.contains(&actor) {
                self.overlapping.push(actor);
            }
        } else {
            self.overlapping.retain(|existing| *existing != actor);
        }
    }

    pub fn overlapping(&self) -> &[Entity] {
        &self.overlapping
    }

    pub fn has_exploded(&self) -> bool {
        self.exploded
    }

    /// Взорваться: жертвы в порядке входа в сферу; None если уже взорван
    pub fn explode(&mut self) -> Option<Vec<Entity>> {
        if self.exploded {
            return None;
        }
        self.exploded = true;
        Some(std::mem::take(&mut self.overlapping))
    }
}
