//! IRONHULL Simulation Core
//!
//! Steering & decision engine для автономных танков (Bevy 0.16 ECS, headless).
//!
//! Каждый тик агент решает:
//! - куда ехать (SteeringScorer + PositionMemory, без pathfinding)
//! - когда менять heading (blockage, dwell timeout, StuckDetector)
//! - когда стрелять (ShotScheduler)
//! - в каком режиме быть (ModeController: Patrol / BaseDefense / BaseAttack)
//!
//! Рендер, звук, карта, физика пуль — внешние коллабораторы (см. `world`, `combat`).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod world;

// Re-export базовых типов для удобства
pub use ai::{ModeController, SideEffects, SteeringPlugin, SteeringScorer, TickEffects, TickInput};
pub use combat::{AgentFired, ShotIntent, ShotScheduler};
pub use components::*;
pub use config::{ClassProfile, ReplanStrategy, SteeringConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use world::{Clock, ManualClock, SimClock, SpatialQuery, TileWorld};

/// Simulation tick rate (Hz)
pub const TICK_RATE_HZ: f64 = 60.0;

/// Главный plugin симуляции на reference `TileWorld`
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ))
            .add_plugins(SteeringPlugin::<TileWorld>::default());
    }
}

/// Общий ChaCha8 поток для `steer_agents`
///
/// Jitter, fallback headings, stop chance и выстрелы всех агентов тянутся
/// из одного потока в порядке Entity index, поэтому seed + карта + спавн
/// однозначно задают весь прогон.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    /// Исходный seed (для логов и повторного прогона)
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Начать поток заново с тем же seed (replay с того же старта)
    pub fn rewind(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Хост должен вставить `TileWorld` resource до первого тика.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Прогнать `ticks` simulation тиков напрямую через FixedUpdate.
///
/// Не зависит от wall-clock: каждый вызов — ровно один fixed step.
pub fn step_simulation(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

/// Snapshot агентов для сравнения детерминизма
///
/// Только детерминированные поля (HashMap памяти не сериализуем — порядок случаен).
pub fn agent_snapshot(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &Agent)>();
    let mut agents: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    agents.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, agent) in agents {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(&agent.position.x.to_bits().to_le_bytes());
        snapshot.extend_from_slice(&agent.position.y.to_bits().to_le_bytes());
        snapshot.extend_from_slice(&agent.shots.reload_timer.to_le_bytes());
        snapshot.extend_from_slice(&agent.dwell_timer.to_le_bytes());
        snapshot.extend_from_slice(
            format!(
                "{:?}|{:?}|{:?}|{}|{}",
                agent.heading,
                agent.mode,
                agent.motion,
                agent.shots.can_fire,
                agent.stuck.counter()
            )
            .as_bytes(),
        );
    }

    snapshot
}
