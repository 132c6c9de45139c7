//! Target locator — Hunted entities как TargetProvider

use bevy::prelude::*;

use crate::ai::{AgentBrain, TargetProvider, TargetSnapshot};
use crate::combat::Dead;
use crate::components::{Health, Hunted};

/// Query-данные Hunted цели: позиция + есть ли damage sink + мертва ли
pub type HuntedQueryData = (Entity, &'static Transform, Has<Health>, Has<Dead>);

/// Hunted цели никогда не агенты (разводит доступ к Transform с FSM системой)
pub type HuntedFilter = (With<Hunted>, Without<AgentBrain>);

/// TargetProvider поверх Query (живёт на время одной системы)
pub struct HuntedTargets<'a, 'w, 's> {
    pub query: &'a Query<'w, 's, HuntedQueryData, HuntedFilter>,
}

impl TargetProvider for HuntedTargets<'_, '_, '_> {
    fn locate(&self) -> Option<Entity> {
        // Детерминированно: живая Hunted с минимальным index
        self.query
            .iter()
            .filter(|(_, _, _, dead)| !dead)
            .map(|(entity, ..)| entity)
            .min_by_key(|entity| entity.index())
    }

    fn snapshot(&self, target: Entity) -> Option<TargetSnapshot> {
        let (entity, transform, damageable, dead) = self.query.get(target).ok()?;
        if dead {
            return None;
        }
        Some(TargetSnapshot {
            entity,
            position: transform.translation,
            damageable,
        })
    }
}

/// Система: одноразовое разрешение цели для новых агентов
///
/// Не нашли — агент живёт без цели (Idle/Patrol), повторный поиск не делаем.
pub fn resolve_agent_targets(
    mut agents: Query<(Entity, &mut AgentBrain), Added<AgentBrain>>,
    hunted: Query<HuntedQueryData, HuntedFilter>,
) {
    let targets = HuntedTargets { query: &hunted };

    for (entity, mut brain) in agents.iter_mut() {
        match brain.acquire_target(&targets) {
            Some(target) => {
                crate::logger::log(&format!("AI: {:?} hunting {:?}", entity, target));
            }
            None => {
                crate::logger::log_warning(&format!("AI: {:?} spawned without a target", entity));
            }
        }
    }
}
