//! Blackboard — key/value pushes во внешнее behaviour tree
//!
//! Симуляция НЕ реализует дерево. Враг только сообщает факты
//! (цель, CanAttack, Stunned, InAttackRange, Dead, CharacterDead),
//! дерево на стороне движка решает что с ними делать.
//!
//! `Blackboard` компонент — зеркало последних значений на entity врага
//! (для отладки и тестов), пишется системой `mirror_blackboard_updates`.

use bevy::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlackboardKey {
    /// Object: кого атаковать
    Target,
    CanAttack,
    Stunned,
    InAttackRange,
    Dead,
    /// Персонаж убит этим врагом
    CharacterDead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlackboardValue {
    Bool(bool),
    Object(Option<Entity>),
}

/// Event: push значения в blackboard конкретного врага
#[derive(Event, Debug, Clone, PartialEq)]
pub struct BlackboardUpdate {
    pub enemy: Entity,
    pub key: BlackboardKey,
    pub value: BlackboardValue,
}

/// Последние запушенные значения
#[derive(Component, Debug, Clone, Default)]
pub struct Blackboard {
    values: BTreeMap<BlackboardKey, BlackboardValue>,
}

impl Blackboard {
    pub fn get(&self, key: BlackboardKey) -> Option<BlackboardValue> {
        self.values.get(&key).copied()
    }

    pub fn get_bool(&self, key: BlackboardKey) -> Option<bool> {
        match self.values.get(&key) {
            Some(BlackboardValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_object(&self, key: BlackboardKey) -> Option<Entity> {
        match self.values.get(&key) {
            Some(BlackboardValue::Object(value)) => *value,
            _ => None,
        }
    }

    pub fn set(&mut self, key: BlackboardKey, value: BlackboardValue) {
        self.values.insert(key, value);
    }
}

/// Система: применить BlackboardUpdate к зеркалу на entity врага
pub fn mirror_blackboard_updates(
    mut updates: EventReader<BlackboardUpdate>,
    mut boards: Query<&mut Blackboard>,
) {
    for update in updates.read() {
        // Враг мог быть уже удалён (DespawnAfter) — не ошибка
        let Ok(mut board) = boards.get_mut(update.enemy) else {
            continue;
        };
        board.set(update.key, update.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blackboard_typed_getters() {
        let mut board = Blackboard::default();
        let target = Entity::from_raw(3);

        board.set(BlackboardKey::Target, BlackboardValue::Object(Some(target)));
        board.set(BlackboardKey::CanAttack, BlackboardValue::Bool(false));

        assert_eq!(board.get_object(BlackboardKey::Target), Some(target));
        assert_eq!(board.get_bool(BlackboardKey::CanAttack), Some(false));
        // Неверный тип — None
        assert_eq!(board.get_bool(BlackboardKey::Target), None);
        assert_eq!(board.get(BlackboardKey::Dead), None);
    }
}
