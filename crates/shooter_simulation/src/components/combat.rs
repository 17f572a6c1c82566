//! Combat компоненты

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Единственное авторитетное состояние персонажа в бою
///
/// Fire / Reload разрешены только из `Unoccupied`, смена оружия —
/// из `Unoccupied` или `Equipping`. `Stunned` перекрывает всё и
/// снимается только явным `end_stun`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum CombatState {
    #[default]
    Unoccupied,
    FireTimerInProgress,
    Reloading,
    Equipping,
    Stunned,
}

impl CombatState {
    pub fn can_fire(self) -> bool {
        self == CombatState::Unoccupied
    }

    pub fn can_reload(self) -> bool {
        self == CombatState::Unoccupied
    }

    pub fn can_change_weapon(self) -> bool {
        matches!(self, CombatState::Unoccupied | CombatState::Equipping)
    }

    /// Прицеливание блокируется reload/equip/stun
    pub fn can_aim(self) -> bool {
        !matches!(
            self,
            CombatState::Reloading | CombatState::Equipping | CombatState::Stunned
        )
    }
}
