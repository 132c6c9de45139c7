//! Демо арена для headless прогона
//!
//! Квадратная арена со стенами по периметру и колонной в центре,
//! один охотник с маршрутом патруля и одна Hunted цель, которая бродит
//! по случайным точкам (DeterministicRng → одинаковый seed, одинаковый прогон).

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{AgentBrain, AgentConfig, NavigationProvider, PatrolRoute};
use crate::combat::Dead;
use crate::components::{Health, Hunted, NavAgent, Occluder};
use crate::DeterministicRng;

/// Половина стороны арены (метры)
pub const ARENA_HALF_SIZE: f32 = 12.0;

/// Бродяга: ходит по случайным точкам внутри квадрата
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(NavAgent)]
pub struct Wander {
    pub center: Vec3,
    pub half_size: f32,
    pub tolerance: f32,
}

impl Wander {
    pub fn new(center: Vec3, half_size: f32) -> Self {
        Self {
            center,
            half_size,
            tolerance: 0.3,
        }
    }

    fn pick(&self, rng: &mut impl Rng) -> Vec3 {
        let x = rng.gen_range(-self.half_size..=self.half_size);
        let z = rng.gen_range(-self.half_size..=self.half_size);
        self.center + Vec3::new(x, 0.0, z)
    }
}

/// Система: новая случайная точка, когда дошли (мёртвые стоят)
pub fn wander(
    mut wanderers: Query<(&Wander, &mut NavAgent, Has<Dead>), Without<AgentBrain>>,
    mut rng: ResMut<DeterministicRng>,
) {
    for (wander, mut nav, dead) in wanderers.iter_mut() {
        if dead {
            nav.halt();
            continue;
        }

        if nav.destination().is_none() || nav.has_arrived(wander.tolerance) {
            let next = wander.pick(&mut rng.rng);
            nav.set_destination(next);
            nav.resume();
        }
    }
}

/// Что заспавнили в арене
#[derive(Debug, Clone, Copy)]
pub struct DemoArena {
    pub hunter: Entity,
    pub quarry: Entity,
}

/// Спавнит стены, охотника (патруль по углам) и Hunted цель
pub fn spawn_demo_arena(world: &mut World, config: AgentConfig) -> DemoArena {
    let half = ARENA_HALF_SIZE;

    // Стены периметра
    let walls = [
        (Vec3::new(0.0, 1.5, -half), Vec3::new(half, 1.5, 0.25)),
        (Vec3::new(0.0, 1.5, half), Vec3::new(half, 1.5, 0.25)),
        (Vec3::new(-half, 1.5, 0.0), Vec3::new(0.25, 1.5, half)),
        (Vec3::new(half, 1.5, 0.0), Vec3::new(0.25, 1.5, half)),
    ];
    for (center, half_extents) in walls {
        world.spawn((Transform::from_translation(center), Occluder::new(half_extents)));
    }

    // Колонна в центре — за ней можно спрятаться
    world.spawn((
        Transform::from_translation(Vec3::new(0.0, 1.5, 0.0)),
        Occluder::new(Vec3::new(1.0, 1.5, 1.0)),
    ));

    let quarry = world
        .spawn((
            Transform::from_translation(Vec3::new(6.0, 0.0, 6.0)),
            Hunted,
            Health::new(100),
            NavAgent::with_speed(2.0),
            Occluder::actor_body(),
            Wander::new(Vec3::ZERO, half - 2.0),
        ))
        .id();

    let corner = half - 3.0;
    let route = PatrolRoute::new([
        Vec3::new(-corner, 0.0, -corner),
        Vec3::new(corner, 0.0, -corner),
        Vec3::new(corner, 0.0, corner),
        Vec3::new(-corner, 0.0, corner),
    ]);

    let hunter = world
        .spawn((
            Transform::from_translation(Vec3::new(-corner, 0.0, -corner)),
            AgentBrain::new(config, route),
            NavAgent::with_speed(3.5),
            Occluder::actor_body(),
        ))
        .id();

    crate::logger::log_info(&format!(
        "Demo arena: hunter {:?}, quarry {:?}",
        hunter, quarry
    ));

    DemoArena { hunter, quarry }
}

/// Plugin демо арены (wander система бродяги)
pub struct ScenarioPlugin;

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Wander>().add_systems(
            FixedUpdate,
            wander.in_set(crate::SimulationSet::Decision),
        );
    }
}
