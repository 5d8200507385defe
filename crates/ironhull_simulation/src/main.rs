//! Headless симуляция IRONHULL
//!
//! Демо-арена: 5 агентов разных классов, 1000 тиков, лог выстрелов и режимов

use bevy::prelude::*;
use ironhull_simulation::ai::systems::steer_agents;
use ironhull_simulation::logger::{set_log_level, LogLevel};
use ironhull_simulation::*;

/// Счётчик выстрелов за прогон
#[derive(Resource, Default)]
struct ShotCounter {
    total: usize,
}

fn count_shots(mut events: EventReader<AgentFired>, mut counter: ResMut<ShotCounter>) {
    counter.total += events.read().count();
}

fn main() {
    let seed = 42;
    let mut app = create_headless_app(seed);
    set_log_level(LogLevel::Info);
    log_info(&format!("Starting IRONHULL headless simulation (seed: {})", seed));

    let world = TileWorld::arena(40, 40, 8.0, 32.0);
    let home_zone = world.zone_of(Vec2::new(160.0, 292.0));
    let enemy_zone = world.zone_of(Vec2::new(160.0, 28.0));
    app.insert_resource(world)
        .init_resource::<ShotCounter>()
        .add_systems(FixedUpdate, count_shots.after(steer_agents::<TileWorld>));

    let config = SteeringConfig::default();
    let spawns = [
        (Vec2::new(28.0, 28.0), AgentClass::Standard, ThreatAssessment::patrol(home_zone)),
        (Vec2::new(292.0, 28.0), AgentClass::Fast, ThreatAssessment::patrol(home_zone)),
        (Vec2::new(28.0, 292.0), AgentClass::Heavy, ThreatAssessment {
            base_defense: true,
            ..ThreatAssessment::patrol(home_zone)
        }),
        (Vec2::new(292.0, 292.0), AgentClass::Fast, ThreatAssessment {
            base_attack: true,
            target_base_zone: Some(enemy_zone),
            ..ThreatAssessment::patrol(home_zone)
        }),
        (Vec2::new(160.0, 160.0), AgentClass::Standard, ThreatAssessment::patrol(home_zone)),
    ];

    for (position, class, threat) in spawns {
        app.world_mut().spawn((
            Agent::new(position, Direction::Up, class, 16.0, &config),
            threat,
            TickEffects::default(),
        ));
    }

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        step_simulation(&mut app, 1);

        if tick % 100 == 0 {
            let shots = app.world().resource::<ShotCounter>().total;
            let mut query = app.world_mut().query::<&Agent>();
            let alive = query.iter(app.world()).filter(|a| !a.destroyed).count();
            log_info(&format!("Tick {}: {} agents, {} shots so far", tick, alive, shots));
        }
    }

    let mut query = app.world_mut().query::<(Entity, &Agent)>();
    for (entity, agent) in query.iter(app.world()) {
        log_info(&format!(
            "{:?} {:?}: pos {:?}, heading {:?}, mode {:?}",
            entity, agent.class, agent.position, agent.heading, agent.mode
        ));
    }

    log_info("Simulation complete!");
}
