//! SENTINEL Simulation Core
//!
//! Hostile agent AI на Bevy 0.16 (headless, FixedUpdate).
//!
//! Слои:
//! - `ai` — FSM агента (Idle/Patrol/Chase/Attack), perception, memory
//! - `combat` — Health цели, AttackIntent → урон, смерть
//! - `components` — NavAgent, Health, Hunted, Occluder
//! - `scenario` — демо арена для headless прогона

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod logger;
pub mod scenario;

// Re-export базовых компонентов для удобства
pub use ai::{
    AIPlugin, Agent, AgentBrain, AgentConfig, AgentState, AgentStateChanged, ConfigError,
    PatrolRoute,
};
pub use combat::{AttackIntent, CombatPlugin, DamageDealt, Dead, DespawnAfter, EntityDied};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel};

/// Порядок подсистем внутри одного FixedUpdate тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Снимок occlusion мира, разрешение целей
    Perception,
    /// Тик FSM агентов
    Decision,
    /// Шаг навигации (NavAgent → Transform)
    Movement,
    /// AttackIntent → Health, смерть
    Combat,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию, create_headless_app переопределяет)
            .init_resource::<DeterministicRng>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Perception,
                    SimulationSet::Decision,
                    SimulationSet::Movement,
                    SimulationSet::Combat,
                )
                    .chain(),
            )
            .register_type::<NavAgent>()
            .register_type::<Health>()
            .add_systems(FixedUpdate, advance_nav_agents.in_set(SimulationSet::Movement))
            // Подсистемы
            .add_plugins((AIPlugin, CombatPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
