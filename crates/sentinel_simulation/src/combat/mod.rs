//! Combat module
//!
//! ECS ответственность:
//! - Health цели (damage sink), применение урона
//! - Events: AttackIntent → DamageDealt, EntityDied
//! - Смерть: Dead marker, отключение AI, деспавн трупа
//!
//! Contact detection (sweep/raycast оружия) в симуляцию не входит:
//! FSM агента решает когда бить, попадание считается гарантированным.

use bevy::prelude::*;

pub mod damage;


// Re-export основных типов
pub use damage::{
    apply_attack_intents, despawn_after_timeout, handle_deaths, AttackIntent, DamageDealt, Dead,
    DespawnAfter, EntityDied, IntentExecutor, CORPSE_LIFETIME,
};

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок выполнения (SimulationSet::Combat):
/// 1. apply_attack_intents — AttackIntent → Health
/// 2. handle_deaths — Dead marker, отключение AI
/// 3. despawn_after_timeout — уборка трупов
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackIntent>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (apply_attack_intents, handle_deaths, despawn_after_timeout)
                .chain()
                .in_set(SimulationSet::Combat),
        );
    }
}
