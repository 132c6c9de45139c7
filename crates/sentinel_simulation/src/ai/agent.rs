//! Standalone агент без ECS
//!
//! Коллабораторы передаются в конструктор один раз (никакого поиска в рантайме),
//! цель разрешается при спавне. Хост вызывает `tick` раз в simulation tick.

use bevy::prelude::*;

use super::brain::{
    AgentBrain, AgentWorld, CombatExecutor, NavigationProvider, PatrolRoute, StateTransition,
    TargetProvider, TickClock,
};
use super::config::AgentConfig;
use super::perception::OcclusionProbe;

/// Агент со своими коллабораторами
pub struct Agent<N, C, T, O> {
    entity: Option<Entity>,
    transform: Transform,
    brain: AgentBrain,
    navigation: N,
    combat: C,
    targets: T,
    occlusion: O,
}

impl<N, C, T, O> Agent<N, C, T, O>
where
    N: NavigationProvider,
    C: CombatExecutor,
    T: TargetProvider,
    O: OcclusionProbe,
{
    pub fn spawn(
        config: AgentConfig,
        route: PatrolRoute,
        transform: Transform,
        navigation: N,
        combat: C,
        targets: T,
        occlusion: O,
    ) -> Self {
        let mut brain = AgentBrain::new(config, route);
        brain.acquire_target(&targets);

        Self {
            entity: None,
            transform,
            brain,
            navigation,
            combat,
            targets,
            occlusion,
        }
    }

    /// Entity агента в мире хоста (исключается из occlusion probe)
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn tick(&mut self, now: f64, delta: f32) -> Option<StateTransition> {
        let mut world = AgentWorld {
            agent: self.entity,
            navigation: &mut self.navigation,
            combat: &mut self.combat,
            targets: &self.targets,
            occlusion: &self.occlusion,
        };
        self.brain
            .tick(&mut self.transform, TickClock { now, delta }, &mut world)
    }

    pub fn brain(&self) -> &AgentBrain {
        &self.brain
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn navigation(&self) -> &N {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut N {
        &mut self.navigation
    }

    pub fn combat(&self) -> &C {
        &self.combat
    }

    pub fn combat_mut(&mut self) -> &mut C {
        &mut self.combat
    }

    pub fn targets_mut(&mut self) -> &mut T {
        &mut self.targets
    }

    pub fn occlusion_mut(&mut self) -> &mut O {
        &mut self.occlusion
    }
}
