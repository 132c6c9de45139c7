//! Headless симуляция SENTINEL
//!
//! Демо арена: охотник патрулирует, замечает цель, догоняет и атакует.
//! Первый аргумент (опционально) — путь к TOML с AgentConfig.

use sentinel_simulation::scenario::{spawn_demo_arena, ScenarioPlugin};
use sentinel_simulation::{
    create_headless_app, init_logger, log_warning, AgentBrain, AgentConfig, Health,
    SimulationPlugin,
};

fn load_config() -> AgentConfig {
    let Some(path) = std::env::args().nth(1) else {
        return AgentConfig::default();
    };

    match AgentConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            // Битый конфиг не роняет симуляцию — едем на дефолтах
            log_warning(&format!("Agent config {}: {} (using defaults)", path, err));
            AgentConfig::default()
        }
    }
}

fn main() {
    init_logger();
    let config = load_config();

    let seed = 42;
    println!("Starting SENTINEL headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, ScenarioPlugin));
    let arena = spawn_demo_arena(app.world_mut(), config);

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let world = app.world();
            let state = world.get::<AgentBrain>(arena.hunter).map(|brain| brain.state());
            let health = world.get::<Health>(arena.quarry).map(|health| health.current);
            println!("Tick {}: hunter {:?}, quarry health {:?}", tick, state, health);
        }
    }

    println!("Simulation complete!");
}
