//! Scheduler — явная арена one-shot таймеров
//!
//! Каждая запись (Shooter, Enemy, ItemRecord) владеет своим `Scheduler<K>`,
//! где `K` — enum "какой callback вызвать". Никаких глобальных timer handles:
//! - `schedule(key, secs)` — запустить таймер (существующий с тем же key заменяется)
//! - `cancel(key)` — единственный способ отмены (без rollback прогресса)
//! - `tick(delta)` — вернуть истёкшие keys, владелец сам их диспатчит
//!
//! Порядок истёкших keys = порядок постановки (детерминизм важнее всего).

use bevy::time::{Timer, TimerMode};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    pending: Vec<(K, Timer)>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запустить (или перезапустить) таймер `key` на `seconds`
    pub fn schedule(&mut self, key: K, seconds: f32) {
        self.cancel(key);
        self.pending
            .push((key, Timer::from_seconds(seconds.max(0.0), TimerMode::Once)));
    }

    /// Отменить таймер. Возвращает true если он был запущен.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(pending_key, _)| *pending_key != key);
        before != self.pending.len()
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|(pending_key, _)| *pending_key == key)
    }

    /// Сколько секунд прошло с запуска (для curve-driven эффектов)
    pub fn elapsed_secs(&self, key: K) -> Option<f32> {
        self.find(key).map(Timer::elapsed_secs)
    }

    /// Продвинуть все таймеры на `delta`, вернуть истёкшие keys
    ///
    /// Истёкшие таймеры удаляются ДО возврата, поэтому callback
    /// может спокойно перезапустить тот же key.
    pub fn tick(&mut self, delta: Duration) -> Vec<K> {
        let mut expired = Vec::new();

        for (key, timer) in self.pending.iter_mut() {
            timer.tick(delta);
            if timer.finished() {
                expired.push(*key);
            }
        }

        self.pending.retain(|(_, timer)| !timer.finished());
        expired
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn find(&self, key: K) -> Option<&Timer> {
        self.pending
            .iter()
            .find(|(pending_key, _)| *pending_key == key)
            .map(|(_, timer)| timer)
    }
}
