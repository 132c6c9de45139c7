//! FSM system — один тик AgentBrain на каждый FixedUpdate

use bevy::prelude::*;

use super::perception::OcclusionWorld;
use super::targeting::{HuntedFilter, HuntedQueryData, HuntedTargets};
use crate::ai::{AgentBrain, AgentStateChanged, AgentWorld, TickClock};
use crate::combat::{AttackIntent, IntentExecutor};
use crate::components::NavAgent;

/// Система: тик FSM всех агентов
///
/// Коллабораторы собираются на тик из ECS:
/// - NavAgent агента → NavigationProvider
/// - Hunted query → TargetProvider
/// - OcclusionWorld (снимок этого тика) → OcclusionProbe
/// - EventWriter<AttackIntent> → CombatExecutor
pub fn tick_agents(
    mut agents: Query<(Entity, &mut AgentBrain, &mut Transform, &mut NavAgent)>,
    hunted: Query<HuntedQueryData, HuntedFilter>,
    occlusion: Res<OcclusionWorld>,
    mut intents: EventWriter<AttackIntent>,
    mut transitions: EventWriter<AgentStateChanged>,
    time: Res<Time<Fixed>>,
) {
    let clock = TickClock {
        now: time.elapsed_secs_f64(),
        delta: time.delta_secs(),
    };
    let targets = HuntedTargets { query: &hunted };

    for (entity, mut brain, mut transform, mut nav) in agents.iter_mut() {
        let mut executor = IntentExecutor {
            attacker: entity,
            intents: &mut intents,
        };
        let mut world = AgentWorld {
            agent: Some(entity),
            navigation: &mut *nav,
            combat: &mut executor,
            targets: &targets,
            occlusion: &*occlusion,
        };

        if let Some(transition) = brain.tick(&mut transform, clock, &mut world) {
            transitions.write(AgentStateChanged {
                agent: entity,
                from: transition.from,
                to: transition.to,
                at: transition.at,
            });
        }
    }
}
