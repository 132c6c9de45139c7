//! Agent state machine — Idle / Patrol / Chase / Attack
//!
//! Один тик (фиксированный порядок):
//! 1. state_elapsed += delta
//! 2. perception → если цель видна, memory.observe(now)
//! 3. guards текущего state по порядку; первый сработавший → переход
//!    (exit → switch → reset elapsed → enter), остаток тика пропускается
//! 4. иначе — steady-state поведение текущего state
//!
//! Навигация, урон, цели и occlusion — внешние коллабораторы (traits ниже),
//! передаются в тик через `AgentWorld`. Ядро ими не владеет.

use bevy::prelude::*;

use super::config::AgentConfig;
use super::memory::{AttackClock, PerceptionMemory};
use super::perception::{is_visible, Observer, OcclusionProbe, SightParams};
use crate::components::{turn_towards, NavAgent};
use crate::logger::{self, LogLevel};

/// Поведенческие состояния агента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AgentState {
    /// Стоим на месте, ждём idle_duration
    Idle,
    /// Обходим маршрут по кругу
    Patrol,
    /// Преследуем цель (destination = позиция цели каждый тик)
    Chase,
    /// Стоим, доворачиваемся, бьём по cooldown
    Attack,
}

/// Navigation provider (black box: pathfinding + steering)
///
/// `remaining_distance() == ∞` или `is_path_pending()` → "ещё не пришли".
pub trait NavigationProvider {
    fn set_destination(&mut self, destination: Vec3);
    fn halt(&mut self);
    fn resume(&mut self);
    fn is_halted(&self) -> bool;
    fn remaining_distance(&self) -> f32;
    fn is_path_pending(&self) -> bool;

    fn has_arrived(&self, tolerance: f32) -> bool {
        let remaining = self.remaining_distance();
        !self.is_path_pending() && remaining.is_finite() && remaining <= tolerance
    }
}

/// Combat executor: "атакуй сейчас" → применение урона (fire-and-forget)
pub trait CombatExecutor {
    /// false если урон применить не удалось (cooldown всё равно тратится)
    fn attack(&mut self, target: Entity, damage: u32) -> bool;
}

/// Снимок цели на текущий тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    pub entity: Entity,
    pub position: Vec3,
    /// Есть ли у цели damage sink (Health)
    pub damageable: bool,
}

/// Target provider: одноразовый locate + снимок по entity каждый тик
pub trait TargetProvider {
    /// Кого охотимся (вызывается один раз при инициализации агента)
    fn locate(&self) -> Option<Entity>;
    /// None — reference больше не валиден (цель удалена)
    fn snapshot(&self, target: Entity) -> Option<TargetSnapshot>;
}

/// Маршрут патруля (read-only для агента)
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
}

impl PatrolRoute {
    pub fn new(waypoints: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            waypoints: waypoints.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.waypoints.get(index).copied()
    }
}

/// Simulation clock на текущий тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickClock {
    /// Секунды с начала симуляции (f64: таймеры не теряют точность на длинных сессиях)
    pub now: f64,
    pub delta: f32,
}

/// Коллабораторы агента на время одного тика
pub struct AgentWorld<'a> {
    /// Entity самого агента (исключается из occlusion probe)
    pub agent: Option<Entity>,
    pub navigation: &'a mut dyn NavigationProvider,
    pub combat: &'a mut dyn CombatExecutor,
    pub targets: &'a dyn TargetProvider,
    pub occlusion: &'a dyn OcclusionProbe,
}

/// Переход FSM (для событий/логов)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateTransition {
    pub from: AgentState,
    pub to: AgentState,
    pub at: f64,
}

/// Мозг агента: текущее состояние, таймеры, память, индекс патруля
#[derive(Component, Debug, Clone)]
#[require(Transform, NavAgent)]
pub struct AgentBrain {
    config: AgentConfig,
    route: PatrolRoute,
    state: AgentState,
    state_elapsed: f32,
    memory: PerceptionMemory,
    attack_clock: AttackClock,
    patrol_index: usize,
    /// Дошли до точки патруля и ждём patrol_wait_time
    holding: bool,
    target: Option<Entity>,
    /// Enter hook начального состояния ещё не выполнен
    pending_enter: bool,
}

impl AgentBrain {
    /// Начальный state: Patrol если маршрут не пуст, иначе Idle
    pub fn new(config: AgentConfig, route: PatrolRoute) -> Self {
        let state = if route.is_empty() {
            AgentState::Idle
        } else {
            AgentState::Patrol
        };

        Self {
            config,
            route,
            state,
            state_elapsed: 0.0,
            memory: PerceptionMemory::default(),
            attack_clock: AttackClock::default(),
            patrol_index: 0,
            holding: false,
            target: None,
            pending_enter: true,
        }
    }

    /// Одноразовое разрешение цели. "Не найдено" — не ошибка:
    /// все guards про цель просто ложны.
    pub fn acquire_target(&mut self, targets: &dyn TargetProvider) -> Option<Entity> {
        self.target = targets.locate();
        self.target
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn state_elapsed(&self) -> f32 {
        self.state_elapsed
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    pub fn patrol_index(&self) -> usize {
        self.patrol_index
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn memory(&self) -> &PerceptionMemory {
        &self.memory
    }

    pub fn attack_clock(&self) -> &AttackClock {
        &self.attack_clock
    }

    /// Один тик FSM. Возвращает переход, если он был.
    pub fn tick(
        &mut self,
        body: &mut Transform,
        clock: TickClock,
        world: &mut AgentWorld<'_>,
    ) -> Option<StateTransition> {
        if self.pending_enter {
            self.pending_enter = false;
            self.on_enter(self.state, world.navigation);
        }

        self.state_elapsed += clock.delta;

        let target = self.target.and_then(|entity| world.targets.snapshot(entity));
        let observer = Observer::from_transform(world.agent, body);
        let visible = is_visible(
            &SightParams::from(&self.config),
            &observer,
            target.as_ref(),
            world.occlusion,
        );
        if visible {
            self.memory.observe(clock.now);
        }

        let distance = target.map(|t| body.translation.distance(t.position));

        if let Some(next) = self.evaluate_guards(target.as_ref(), distance, visible, clock.now) {
            let transition = self.switch_state(next, clock.now, world.navigation);
            if let Some(transition) = transition {
                logger::log_info(&format!(
                    "AI: {:?} {:?} → {:?} (t={:.2})",
                    world.agent, transition.from, transition.to, transition.at
                ));
            }
            return transition;
        }

        match self.state {
            AgentState::Idle => self.idle_behaviour(world.navigation),
            AgentState::Patrol => self.patrol_behaviour(world.navigation),
            AgentState::Chase => {
                if let Some(target) = target {
                    world.navigation.resume();
                    world.navigation.set_destination(target.position);
                }
            }
            AgentState::Attack => self.attack_behaviour(body, target, distance, clock, world),
        }

        None
    }

    /// Guards текущего state (по порядку, первый сработавший побеждает)
    fn evaluate_guards(
        &self,
        target: Option<&TargetSnapshot>,
        distance: Option<f32>,
        visible: bool,
        now: f64,
    ) -> Option<AgentState> {
        let in_range = distance.map(|d| self.config.in_attack_range(d));

        match self.state {
            AgentState::Idle => {
                if visible {
                    Some(AgentState::Chase)
                } else if self.state_elapsed >= self.config.idle_duration && !self.route.is_empty() {
                    Some(AgentState::Patrol)
                } else {
                    None
                }
            }

            AgentState::Patrol => {
                if visible {
                    Some(AgentState::Chase)
                } else if self.route.is_empty() {
                    Some(AgentState::Idle)
                } else {
                    None
                }
            }

            AgentState::Chase => {
                if target.is_none() {
                    // Цель удалена — не "помним" её
                    Some(AgentState::Idle)
                } else if in_range == Some(true) {
                    Some(AgentState::Attack)
                } else if self.memory.has_expired(now, self.config.memory_duration) {
                    Some(self.fallback_state())
                } else {
                    None
                }
            }

            AgentState::Attack => {
                if in_range == Some(false) {
                    Some(AgentState::Chase)
                } else if !target.is_some_and(|t| t.damageable) {
                    Some(AgentState::Idle)
                } else {
                    None
                }
            }
        }
    }

    /// "Потеряли цель" → Patrol если есть маршрут, иначе Idle
    fn fallback_state(&self) -> AgentState {
        if self.route.is_empty() {
            AgentState::Idle
        } else {
            AgentState::Patrol
        }
    }

    fn switch_state(
        &mut self,
        next: AgentState,
        now: f64,
        navigation: &mut dyn NavigationProvider,
    ) -> Option<StateTransition> {
        if self.state == next {
            return None;
        }

        let from = self.state;
        self.on_exit(from);
        self.state = next;
        self.state_elapsed = 0.0;
        self.holding = false;
        self.on_enter(next, navigation);

        Some(StateTransition { from, to: next, at: now })
    }

    fn on_enter(&mut self, state: AgentState, navigation: &mut dyn NavigationProvider) {
        match state {
            AgentState::Idle | AgentState::Attack => navigation.halt(),
            AgentState::Patrol => {
                navigation.resume();
                if let Some(waypoint) = self.route.get(self.patrol_index) {
                    navigation.set_destination(waypoint);
                }
            }
            AgentState::Chase => navigation.resume(),
        }
    }

    fn on_exit(&mut self, _state: AgentState) {}

    fn idle_behaviour(&mut self, navigation: &mut dyn NavigationProvider) {
        navigation.halt();

        // Маршрута нет — остаёмся Idle, таймер заново
        if self.state_elapsed >= self.config.idle_duration {
            self.state_elapsed = 0.0;
        }
    }

    fn patrol_behaviour(&mut self, navigation: &mut dyn NavigationProvider) {
        let Some(waypoint) = self.route.get(self.patrol_index) else {
            return;
        };

        if navigation.has_arrived(self.config.waypoint_tolerance) {
            if !self.holding {
                self.holding = true;
                self.state_elapsed = 0.0;
                navigation.halt();
            }

            if self.state_elapsed >= self.config.patrol_wait_time {
                self.patrol_index = (self.patrol_index + 1) % self.route.len();
                if let Some(next) = self.route.get(self.patrol_index) {
                    navigation.set_destination(next);
                }
                navigation.resume();
                self.holding = false;
                self.state_elapsed = 0.0;
            }
        } else if navigation.is_halted() || navigation.remaining_distance().is_infinite() {
            // Навигация остановлена или без маршрута — переотправляем команду
            navigation.resume();
            navigation.set_destination(waypoint);
        }
    }

    fn attack_behaviour(
        &mut self,
        body: &mut Transform,
        target: Option<TargetSnapshot>,
        distance: Option<f32>,
        clock: TickClock,
        world: &mut AgentWorld<'_>,
    ) {
        world.navigation.halt();

        // Нет валидной цели — no-op, cooldown не тратится
        let Some(target) = target else {
            return;
        };

        turn_towards(body, target.position, self.config.turn_speed * clock.delta);

        let in_range = distance.is_some_and(|d| self.config.in_attack_range(d));
        if in_range && self.attack_clock.is_ready(clock.now, self.config.attack_cooldown) {
            let landed = world.combat.attack(target.entity, self.config.attack_damage);
            // Cooldown по времени, не по успеху
            self.attack_clock.record(clock.now);

            if logger::is_enabled(LogLevel::Debug) {
                logger::log(&format!(
                    "AI: {:?} attacks {:?} for {} (landed: {}, t={:.2})",
                    world.agent, target.entity, self.config.attack_damage, landed, clock.now
                ));
            }
        }
    }
}
