//! AI decision-making module
//!
//! Hostile agent: Idle / Patrol / Chase / Attack FSM.
//! Ядро (brain, perception, memory) не знает про ECS, коллабораторы приходят
//! через traits. `systems` — ECS обвязка, `agent` — standalone обвязка.

use bevy::prelude::*;

pub mod agent;
pub mod brain;
pub mod config;
pub mod events;
pub mod memory;
pub mod perception;
pub mod systems;

#[cfg(test)]
mod test_support;

// Re-export основных типов
pub use agent::Agent;
pub use brain::{
    AgentBrain, AgentState, AgentWorld, CombatExecutor, NavigationProvider, PatrolRoute,
    StateTransition, TargetProvider, TargetSnapshot, TickClock,
};
pub use config::{AgentConfig, ConfigError, ATTACK_RANGE_TOLERANCE};
pub use events::AgentStateChanged;
pub use memory::{AttackClock, PerceptionMemory};
pub use perception::{is_visible, Observer, OcclusionProbe, OpenField, ProbeHit, SightParams};
pub use systems::OcclusionWorld;

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. rebuild_occlusion_world — снимок препятствий (SimulationSet::Perception)
/// 2. resolve_agent_targets — одноразовый поиск цели новым агентам
/// 3. tick_agents — тик FSM (SimulationSet::Decision)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OcclusionWorld>()
            .add_event::<AgentStateChanged>()
            .register_type::<AgentConfig>()
            .register_type::<AgentState>();

        app.add_systems(
            FixedUpdate,
            (systems::rebuild_occlusion_world, systems::resolve_agent_targets)
                .chain()
                .in_set(SimulationSet::Perception),
        )
        .add_systems(FixedUpdate, systems::tick_agents.in_set(SimulationSet::Decision));
    }
}
