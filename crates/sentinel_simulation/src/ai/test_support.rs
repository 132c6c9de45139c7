//! Fake коллабораторы для unit тестов FSM

use bevy::prelude::*;

use super::agent::Agent;
use super::brain::{
    CombatExecutor, NavigationProvider, PatrolRoute, StateTransition, TargetProvider,
    TargetSnapshot,
};
use super::config::AgentConfig;
use super::perception::{OcclusionProbe, ProbeHit};

/// Навигатор без движения: тест сам двигает `position` (или вызывает `arrive`)
#[derive(Debug, Default)]
pub struct FakeNav {
    pub position: Vec3,
    pub destination: Option<Vec3>,
    pub halted: bool,
    pub pending: bool,
    /// Все set_destination по порядку
    pub issued: Vec<Vec3>,
}

impl FakeNav {
    pub fn arrive(&mut self) {
        if let Some(destination) = self.destination {
            self.position = destination;
        }
        self.pending = false;
    }
}

impl NavigationProvider for FakeNav {
    fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
        self.issued.push(destination);
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
        match self.destination {
            Some(destination) => self.position.distance(destination),
            None => f32::INFINITY,
        }
    }

    fn is_path_pending(&self) -> bool {
        self.pending
    }
}

/// Одна цель, которую можно двигать/удалять/прятать от locate
#[derive(Debug)]
pub struct FakeTargets {
    pub entity: Entity,
    pub position: Vec3,
    pub present: bool,
    pub damageable: bool,
    pub locatable: bool,
}

impl FakeTargets {
    pub fn at(position: Vec3) -> Self {
        Self {
            entity: Entity::from_raw(100),
            position,
            present: true,
            damageable: true,
            locatable: true,
        }
    }

    pub fn nobody() -> Self {
        Self {
            locatable: false,
            ..Self::at(Vec3::ZERO)
        }
    }
}

impl TargetProvider for FakeTargets {
    fn locate(&self) -> Option<Entity> {
        (self.locatable && self.present).then_some(self.entity)
    }

    fn snapshot(&self, target: Entity) -> Option<TargetSnapshot> {
        (self.present && target == self.entity).then_some(TargetSnapshot {
            entity: self.entity,
            position: self.position,
            damageable: self.damageable,
        })
    }
}

/// Записывает все попытки атаки
#[derive(Debug)]
pub struct RecordingCombat {
    pub strikes: Vec<(Entity, u32)>,
    pub succeed: bool,
}

impl Default for RecordingCombat {
    fn default() -> Self {
        Self {
            strikes: Vec::new(),
            succeed: true,
        }
    }
}

impl CombatExecutor for RecordingCombat {
    fn attack(&mut self, target: Entity, damage: u32) -> bool {
        self.strikes.push((target, damage));
        self.succeed
    }
}

/// Probe с заранее заданным ответом
#[derive(Debug, Clone, Copy)]
pub struct ScriptedProbe {
    pub hit: ProbeHit,
}

impl ScriptedProbe {
    pub fn clear() -> Self {
        Self { hit: ProbeHit::Clear }
    }

    /// Стена, не связанная с целью
    pub fn wall() -> Self {
        Self {
            hit: ProbeHit::Blocked {
                entity: Entity::from_raw(500),
                owner: None,
            },
        }
    }
}

impl OcclusionProbe for ScriptedProbe {
    fn linecast(&self, _from: Vec3, _to: Vec3, _ignore: Option<Entity>) -> ProbeHit {
        self.hit
    }
}

pub type TestAgent = Agent<FakeNav, RecordingCombat, FakeTargets, ScriptedProbe>;

/// Тик 0.25с — точно представим в f32, таймеры без накопления ошибки
pub const DT: f32 = 0.25;

/// Агент в начале координат, смотрит в -Z, probe "чисто"
pub fn spawn_agent(config: AgentConfig, route: Vec<Vec3>, targets: FakeTargets) -> TestAgent {
    Agent::spawn(
        config,
        PatrolRoute::new(route),
        Transform::default(),
        FakeNav::default(),
        RecordingCombat::default(),
        targets,
        ScriptedProbe::clear(),
    )
    .with_entity(Entity::from_raw(1))
}

/// Агент + simulation clock
pub struct Sim {
    pub agent: TestAgent,
    pub now: f64,
}

impl Sim {
    pub fn new(agent: TestAgent) -> Self {
        Self { agent, now: 0.0 }
    }

    pub fn step(&mut self) -> Option<StateTransition> {
        self.now += f64::from(DT);
        self.agent.tick(self.now, DT)
    }

    pub fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.step();
        }
    }
}
