//! AI systems (Bevy обёртка над ModeController)
//!
//! Порядок в FixedUpdate (chain):
//! 1. advance_sim_clock — SimClock += fixed timestep
//! 2. steer_agents — один ModeController::update на агента, AgentFired events

use bevy::prelude::*;

use crate::ai::controller::{ModeController, SideEffects, TickInput};
use crate::combat::AgentFired;
use crate::components::{Agent, NeighborSnapshot, ThreatAssessment};
use crate::config::SteeringConfig;
use crate::world::{SimClock, SpatialQuery};
use crate::DeterministicRng;

/// Component: результат последнего тика (для рендера/анимации)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct TickEffects(pub SideEffects);

/// Система: двигаем simulation clock на fixed timestep
pub fn advance_sim_clock(mut clock: ResMut<SimClock>, time: Res<Time<Fixed>>) {
    clock.advance(time.timestep());
}

/// Система: steering tick всех живых агентов
///
/// Соседи — snapshot на начало тика (read-only), поэтому порядок обхода
/// не влияет на то, что видят агенты. Обход всё равно по Entity index —
/// RNG общий, и порядок вызовов должен быть стабильным.
pub fn steer_agents<W: SpatialQuery + Resource>(
    mut agents: Query<(
        Entity,
        &mut Agent,
        Option<&ThreatAssessment>,
        Option<&mut TickEffects>,
    )>,
    world: Res<W>,
    config: Res<SteeringConfig>,
    clock: Res<SimClock>,
    mut rng: ResMut<DeterministicRng>,
    mut fired: EventWriter<AgentFired>,
) {
    let mut snapshots: Vec<(Entity, NeighborSnapshot)> = agents
        .iter()
        .filter(|(_, agent, _, _)| !agent.destroyed)
        .map(|(entity, agent, _, _)| (entity, agent.snapshot()))
        .collect();
    snapshots.sort_by_key(|(entity, _)| entity.index());

    let order: Vec<Entity> = snapshots.iter().map(|(entity, _)| *entity).collect();
    let mut neighbors: Vec<NeighborSnapshot> = Vec::with_capacity(snapshots.len());

    for entity in order {
        let Ok((_, mut agent, threat, effects_slot)) = agents.get_mut(entity) else {
            continue;
        };

        neighbors.clear();
        neighbors.extend(
            snapshots
                .iter()
                .filter(|(other, _)| *other != entity)
                .map(|(_, snapshot)| *snapshot),
        );

        let threat = threat
            .copied()
            .unwrap_or_else(|| ThreatAssessment::patrol(world.zone_of(agent.position)));

        let input = TickInput {
            world: &*world,
            neighbors: &neighbors,
            threat: &threat,
            config: &*config,
            clock: &*clock,
        };

        let effects = ModeController::update(&mut agent, &input, &mut rng.rng);

        if let Some(intent) = effects.fire_request {
            fired.write(AgentFired {
                shooter: entity,
                intent,
            });
        }

        if let Some(mut slot) = effects_slot {
            slot.0 = effects;
        }
    }
}
