//! AgentConfig — статические параметры враждебного агента
//!
//! Значения по умолчанию соответствуют базовому melee-врагу.
//! Загружается из TOML (все поля опциональны), после загрузки валидируется.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Фиксированный slack к attack_range — без него агент дрожит Chase ↔ Attack на границе
pub const ATTACK_RANGE_TOLERANCE: f32 = 0.05;

/// Ошибки загрузки/валидации конфигурации агента
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite value >= 0 (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be a finite value > 0 (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("field_of_view must be in (0, 360] degrees (got {0})")]
    FieldOfView(f32),

    #[error("failed to parse agent config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read agent config: {0}")]
    Io(#[from] std::io::Error),
}

/// Параметры агента (perception, timings, combat)
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Дальность зрения (метры)
    pub sight_range: f32,
    /// Дальность атаки (метры, без tolerance)
    pub attack_range: f32,
    /// Полный угол конуса зрения (градусы)
    pub field_of_view: f32,
    /// Сколько секунд агент "помнит" цель после потери из виду
    pub memory_duration: f32,
    /// Урон за одну атаку
    pub attack_damage: u32,
    /// Минимальный интервал между атаками (секунды)
    pub attack_cooldown: f32,
    /// Idle → Patrol через столько секунд (если есть маршрут)
    pub idle_duration: f32,
    /// Пауза на каждой точке патруля (секунды)
    pub patrol_wait_time: f32,
    /// remaining_distance <= tolerance → точка достигнута
    pub waypoint_tolerance: f32,
    /// Высота "глаз" над позицией агента (occlusion probe)
    pub eye_height: f32,
    /// Высота точки прицеливания на цели
    pub target_aim_height: f32,
    /// Скорость доворота к цели в Attack (рад/сек)
    pub turn_speed: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            sight_range: 12.0,
            attack_range: 2.2,
            field_of_view: 120.0,
            memory_duration: 2.0,
            attack_damage: 10,
            attack_cooldown: 1.0,
            idle_duration: 2.0,
            patrol_wait_time: 1.0,
            waypoint_tolerance: 0.4,
            eye_height: 1.6,
            target_aim_height: 1.0,
            turn_speed: 10.0,
        }
    }
}

impl AgentConfig {
    /// Парсинг TOML + валидация
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("attack_range", self.attack_range),
            ("memory_duration", self.memory_duration),
            ("idle_duration", self.idle_duration),
            ("patrol_wait_time", self.patrol_wait_time),
            ("waypoint_tolerance", self.waypoint_tolerance),
            ("eye_height", self.eye_height),
            ("target_aim_height", self.target_aim_height),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let positive = [
            ("sight_range", self.sight_range),
            ("attack_cooldown", self.attack_cooldown),
            ("turn_speed", self.turn_speed),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !(self.field_of_view > 0.0 && self.field_of_view <= 360.0) {
            return Err(ConfigError::FieldOfView(self.field_of_view));
        }

        Ok(())
    }

    /// Половина конуса зрения в радианах
    pub fn half_fov_radians(&self) -> f32 {
        (self.field_of_view * 0.5).to_radians()
    }

    /// distance <= attack_range + tolerance (граница включительно)
    pub fn in_attack_range(&self, distance: f32) -> bool {
        distance <= self.attack_range + ATTACK_RANGE_TOLERANCE
    }
}
