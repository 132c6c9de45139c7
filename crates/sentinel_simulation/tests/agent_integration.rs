//! Agent integration test
//!
//! Полный FixedUpdate пайплайн: perception → FSM → навигация → урон.
//! Один app.update() = один тик 0.1с (ManualDuration).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use sentinel_simulation::*;

/// Helper: App со всеми plugins и ручным временем
fn create_agent_app() -> App {
    let mut app = create_headless_app(42);
    app.add_plugins(SimulationPlugin)
        .insert_resource(Time::<Fixed>::from_seconds(0.1))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app
}

/// Helper: охотник в начале координат, смотрит в -Z, без маршрута
fn spawn_hunter(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            Transform::default(),
            AgentBrain::new(AgentConfig::default(), PatrolRoute::default()),
            Occluder::actor_body(),
        ))
        .id()
}

fn spawn_quarry(app: &mut App, position: Vec3, health: u32) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            Hunted,
            Health::new(health),
            Occluder::actor_body(),
        ))
        .id()
}

fn state(app: &App, agent: Entity) -> Option<AgentState> {
    app.world().get::<AgentBrain>(agent).map(|brain| brain.state())
}

/// Гоняем update пока не выполнится условие (не больше max_updates)
fn run_until(app: &mut App, max_updates: usize, done: impl Fn(&App) -> bool) -> bool {
    for _ in 0..max_updates {
        app.update();
        if done(app) {
            return true;
        }
    }
    false
}

#[test]
fn test_hunter_chases_and_damages_visible_target() {
    let mut app = create_agent_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -8.0), 100);
    let hunter = spawn_hunter(&mut app);

    assert!(run_until(&mut app, 10, |app| state(app, hunter) == Some(AgentState::Chase)));
    assert_eq!(app.world().get::<AgentBrain>(hunter).and_then(|b| b.target()), Some(quarry));

    assert!(run_until(&mut app, 60, |app| {
        app.world().get::<Health>(quarry).is_some_and(|h| h.current < 100)
    }));
    assert_eq!(state(&app, hunter), Some(AgentState::Attack));

    // Стоим на дистанции атаки, а не внутри цели
    let hunter_pos = app.world().get::<Transform>(hunter).map(|t| t.translation);
    let distance = hunter_pos.map(|p| p.distance(Vec3::new(0.0, 0.0, -8.0)));
    assert!(distance.is_some_and(|d| d <= 2.25 && d > 1.0), "distance = {distance:?}");
}

#[test]
fn test_wall_blocks_sight() {
    let mut app = create_agent_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -8.0), 100);
    app.world_mut().spawn((
        Transform::from_translation(Vec3::new(0.0, 1.5, -4.0)),
        Occluder::new(Vec3::new(2.0, 1.5, 0.25)),
    ));
    let hunter = spawn_hunter(&mut app);

    for _ in 0..30 {
        app.update();
    }

    assert_eq!(state(&app, hunter), Some(AgentState::Idle));
    assert_eq!(app.world().get::<Health>(quarry).map(|h| h.current), Some(100));
}

#[test]
fn test_body_part_of_target_does_not_occlude() {
    let mut app = create_agent_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -8.0), 100);
    // Щит цели стоит между охотником и целью
    app.world_mut().spawn((
        Transform::from_translation(Vec3::new(0.0, 1.0, -7.0)),
        Occluder::new(Vec3::new(1.0, 1.0, 0.1)),
        BodyPartOf(quarry),
    ));
    let hunter = spawn_hunter(&mut app);

    assert!(run_until(&mut app, 10, |app| state(app, hunter) == Some(AgentState::Chase)));
}

#[test]
fn test_removed_target_sends_hunter_idle() {
    let mut app = create_agent_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -11.0), 100);
    let hunter = spawn_hunter(&mut app);

    assert!(run_until(&mut app, 10, |app| state(app, hunter) == Some(AgentState::Chase)));

    app.world_mut().despawn(quarry);

    assert!(run_until(&mut app, 3, |app| state(app, hunter) == Some(AgentState::Idle)));
}

#[test]
fn test_killed_target_stops_attacks() {
    let mut app = create_agent_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -2.0), 20);
    let hunter = spawn_hunter(&mut app);

    assert!(run_until(&mut app, 60, |app| app.world().get::<Dead>(quarry).is_some()));
    assert_eq!(app.world().get::<Health>(quarry).map(|h| h.current), Some(0));

    // Мёртвая цель невалидна → Idle, новых ударов нет
    assert!(run_until(&mut app, 3, |app| state(app, hunter) == Some(AgentState::Idle)));
    for _ in 0..20 {
        app.update();
    }
    assert_eq!(state(&app, hunter), Some(AgentState::Idle));
}

#[test]
fn test_dead_hunter_is_disabled_and_despawned() {
    let mut app = create_agent_app();
    spawn_quarry(&mut app, Vec3::new(0.0, 0.0, 8.0), 100);
    let hunter = app
        .world_mut()
        .spawn((
            Transform::default(),
            AgentBrain::new(AgentConfig::default(), PatrolRoute::default()),
            Health::new(10),
        ))
        .id();

    app.update();
    app.update();
    app.world_mut().send_event(AttackIntent { attacker: hunter, target: hunter, damage: 50 });

    assert!(run_until(&mut app, 3, |app| app.world().get::<Dead>(hunter).is_some()));
    assert!(app.world().get::<AgentBrain>(hunter).is_none());

    // CORPSE_LIFETIME = 2с = 20 тиков
    assert!(run_until(&mut app, 30, |app| app.world().get_entity(hunter).is_err()));
}
