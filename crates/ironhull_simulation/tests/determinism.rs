//! Тесты детерминизма steering core
//!
//! Одинаковый seed + одинаковая карта → идентичные траектории, headings, выстрелы

use bevy::prelude::*;
use ironhull_simulation::{
    agent_snapshot, create_headless_app, step_simulation, Agent, AgentClass, AgentFired,
    Direction, SpatialQuery, SteeringConfig, ThreatAssessment, TileWorld,
};

/// Запускает арену с 8 агентами и возвращает (snapshot, число выстрелов)
fn run_simulation(seed: u64, tick_count: usize) -> (Vec<u8>, usize) {
    let mut app = create_headless_app(seed);
    let world = TileWorld::arena(40, 40, 8.0, 32.0);
    let home = world.zone_of(Vec2::new(160.0, 292.0));
    let enemy = world.zone_of(Vec2::new(160.0, 28.0));
    app.insert_resource(world);

    let config = SteeringConfig::default();
    let classes = [AgentClass::Standard, AgentClass::Fast, AgentClass::Heavy];

    for i in 0..8 {
        let position = Vec2::new(28.0 + (i % 4) as f32 * 88.0, 28.0 + (i / 4) as f32 * 264.0);
        let threat = match i % 3 {
            0 => ThreatAssessment::patrol(home),
            1 => ThreatAssessment {
                base_defense: true,
                ..ThreatAssessment::patrol(home)
            },
            _ => ThreatAssessment {
                base_attack: true,
                target_base_zone: Some(enemy),
                ..ThreatAssessment::patrol(home)
            },
        };
        app.world_mut().spawn((
            Agent::new(position, Direction::Right, classes[i % 3], 16.0, &config),
            threat,
        ));
    }

    step_simulation(&mut app, tick_count);

    let shots = app.world().resource::<Events<AgentFired>>().len();
    (agent_snapshot(app.world_mut()), shots)
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 1000;

    let (snapshot1, shots1) = run_simulation(SEED, TICK_COUNT);
    let (snapshot2, shots2) = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
    assert_eq!(shots1, shots2);
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 500;

    // 3 прогона — все должны совпасть с первым
    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_snapshot_changes_over_time() {
    let (start, _) = run_simulation(7, 1);
    let (later, _) = run_simulation(7, 200);
    assert_ne!(start, later, "Агенты не двигаются");
}
