//! Movement компоненты: NavAgent (navigation provider) + поворот к точке
//!
//! Архитектура:
//! - FSM пишет high-level intent через NavigationProvider (set_destination / halt)
//! - `advance_nav_agents` двигает Transform по прямой к destination
//! - Реальный pathfinding — вне симуляции (NavAgent = headless заглушка того же контракта)

use bevy::prelude::*;

use crate::ai::NavigationProvider;

/// Navigation agent (straight-line navigator)
///
/// Новый destination — "path pending" до следующего шага движения,
/// remaining_distance в это время = ∞ (как у настоящего navmesh агента).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    /// Скорость движения (m/s)
    pub speed: f32,
    /// Скорость поворота по направлению движения (рад/сек)
    pub turn_speed: f32,
    /// Ближе этого к destination не подходим
    pub stopping_distance: f32,
    destination: Option<Vec3>,
    halted: bool,
    path_pending: bool,
    remaining: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            speed: 3.5,
            turn_speed: 10.0, // рад/сек (фиксированная скорость)
            stopping_distance: 0.05,
            destination: None,
            halted: false,
            path_pending: false,
            remaining: f32::INFINITY,
        }
    }
}

impl NavAgent {
    pub fn with_speed(speed: f32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Сбросить destination (агент выключен/умер)
    pub fn clear(&mut self) {
        self.destination = None;
        self.halted = true;
        self.path_pending = false;
        self.remaining = f32::INFINITY;
    }

    /// Один шаг навигации: пересчёт remaining + движение (если не halted)
    pub fn step(&mut self, transform: &mut Transform, delta: f32) {
        self.path_pending = false;

        let Some(destination) = self.destination else {
            self.remaining = f32::INFINITY;
            return;
        };

        let to_destination = destination - transform.translation;
        let distance = to_destination.length();

        if !self.halted && distance > self.stopping_distance {
            let travel = (self.speed * delta).min(distance - self.stopping_distance);
            let direction = to_destination / distance;
            transform.translation += direction * travel;
            turn_towards(transform, destination, self.turn_speed * delta);
        }

        self.remaining = transform.translation.distance(destination);
    }
}

impl NavigationProvider for NavAgent {
    fn set_destination(&mut self, destination: Vec3) {
        // Та же точка — путь не пересчитываем (Chase дёргает каждый тик)
        if self.destination == Some(destination) {
            return;
        }
        self.destination = Some(destination);
        self.path_pending = true;
        self.remaining = f32::INFINITY;
    }

    fn halt(&mut self) {
        self.halted = true;
    }

    fn resume(&mut self) {
        self.halted = false;
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn is_path_pending(&self) -> bool {
        self.path_pending
    }
}

/// Плавный доворот по yaw к точке (не больше `max_step` радиан за вызов)
///
/// Смотрим только в горизонтальной плоскости, forward = -Z.
pub fn turn_towards(transform: &mut Transform, point: Vec3, max_step: f32) {
    let mut to_point = point - transform.translation;
    to_point.y = 0.0;
    if to_point.length_squared() <= 0.001 {
        return;
    }

    let desired = Quat::from_rotation_y(f32::atan2(-to_point.x, -to_point.z));
    let angle = transform.rotation.angle_between(desired);

    if angle <= max_step || angle <= f32::EPSILON {
        transform.rotation = desired;
    } else {
        transform.rotation = transform.rotation.slerp(desired, max_step / angle);
    }
}

/// Система: шаг всех NavAgent (FixedUpdate, после решений FSM)
pub fn advance_nav_agents(mut agents: Query<(&mut NavAgent, &mut Transform)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (mut nav, mut transform) in agents.iter_mut() {
        nav.step(&mut transform, delta);
    }
}
