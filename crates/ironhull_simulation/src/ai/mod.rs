//! AI decision-making module
//!
//! Steering core (без pathfinding):
//! - memory: PositionMemory — штраф за недавно посещённые zones
//! - scoring: SteeringScorer — score 4 cardinal направлений
//! - stuck: StuckDetector — forced смена heading при нулевом displacement
//! - containment: BaseContainment — радиус вокруг home zone
//! - controller: ModeController — state machine тика
//! - systems: Bevy systems поверх controller

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod containment;
pub mod controller;
pub mod memory;
pub mod scoring;
pub mod stuck;
pub mod systems;


// Re-export основных типов
pub use containment::{BaseContainment, ContainmentChoice};
pub use controller::{try_move, ModeController, SideEffects, TickInput};
pub use memory::{MemoryCell, PositionMemory};
pub use scoring::{
    random_other_direction, test_position, CandidateHeading, ExplorationTarget, ScoringStrategy,
    SteeringScorer,
};
pub use stuck::StuckDetector;
pub use systems::TickEffects;

use crate::combat::AgentFired;
use crate::config::SteeringConfig;
use crate::world::{SimClock, SpatialQuery};

/// Steering Plugin
///
/// `W` — ресурс static геометрии (SpatialQuery), вставляется хостом.
/// Регистрирует AI системы в FixedUpdate для детерминизма:
/// 1. advance_sim_clock — injected clock для Stopped dwell
/// 2. steer_agents — ModeController каждого агента + AgentFired events
pub struct SteeringPlugin<W> {
    _world: PhantomData<fn() -> W>,
}

impl<W> Default for SteeringPlugin<W> {
    fn default() -> Self {
        Self {
            _world: PhantomData,
        }
    }
}

impl<W: SpatialQuery + Resource> Plugin for SteeringPlugin<W> {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimClock>()
            .init_resource::<SteeringConfig>()
            .add_event::<AgentFired>()
            .add_systems(
                FixedUpdate,
                (systems::advance_sim_clock, systems::steer_agents::<W>).chain(), // Последовательное выполнение для детерминизма
            );
    }
}
