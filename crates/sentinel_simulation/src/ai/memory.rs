//! Memory tracker + attack clock
//!
//! Оба — одна временная метка относительно simulation clock.
//! Начальное значение −∞: "никогда не видел" / "никогда не атаковал".

use bevy::prelude::*;

/// Когда цель была замечена последний раз
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PerceptionMemory {
    last_seen: f64,
}

impl Default for PerceptionMemory {
    fn default() -> Self {
        Self {
            last_seen: f64::NEG_INFINITY,
        }
    }
}

impl PerceptionMemory {
    /// Цель видна в `now` (метка только растёт)
    pub fn observe(&mut self, now: f64) {
        self.last_seen = self.last_seen.max(now);
    }

    pub fn last_seen(&self) -> f64 {
        self.last_seen
    }

    pub fn has_seen(&self) -> bool {
        self.last_seen.is_finite()
    }

    /// `now − last_seen > window` (до первого обнаружения всегда true)
    pub fn has_expired(&self, now: f64, window: f32) -> bool {
        now - self.last_seen > f64::from(window)
    }
}

/// Когда была последняя атака (cooldown по времени, не по успеху)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AttackClock {
    last_attack: f64,
}

impl Default for AttackClock {
    fn default() -> Self {
        Self {
            last_attack: f64::NEG_INFINITY,
        }
    }
}

impl AttackClock {
    pub fn is_ready(&self, now: f64, cooldown: f32) -> bool {
        now - self.last_attack >= f64::from(cooldown)
    }

    pub fn record(&mut self, now: f64) {
        self.last_attack = now;
    }

    pub fn last_attack(&self) -> f64 {
        self.last_attack
    }
}
