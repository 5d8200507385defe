//! Agent компонент: позиция, heading, режим + собственные sub-models

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{ExplorationTarget, PositionMemory, StuckDetector};
use crate::combat::ShotScheduler;
use crate::components::{Aabb, Direction};
use crate::config::SteeringConfig;

/// Класс агента — tagged variant, выбирает `ClassProfile` в config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum AgentClass {
    #[default]
    Standard,
    Fast,
    Heavy,
}

/// Behavioral mode (ровно один активен)
///
/// Приоритет при выборе: BaseDefense > BaseAttack > Patrol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum BehaviorMode {
    /// Свободный патруль карты (exploration scoring)
    #[default]
    Patrol,
    /// Держимся в радиусе своей базы
    BaseDefense,
    /// Идём к вражеской базе
    BaseAttack,
}

/// Sub-state движения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum MotionState {
    #[default]
    Moving,
    /// Стоим на месте после смены heading (только PATROL)
    Stopped {
        /// Clock timestamp входа в STOPPED (мс)
        since_ms: u64,
    },
}

/// Агент (танк) — всё, что steering core мутирует каждый тик
///
/// Инварианты:
/// - heading всегда cardinal (гарантирует тип `Direction`)
/// - reload timer ≥ 0 (u32)
/// - ровно один `mode`
///
/// Sub-models (memory, stuck detector, shot scheduler, exploration target)
/// принадлежат только этому агенту и живут столько же, сколько он.
#[derive(Component, Debug, Clone)]
pub struct Agent {
    /// Центр агента (world units)
    pub position: Vec2,
    pub heading: Direction,
    pub mode: BehaviorMode,
    pub motion: MotionState,
    /// Тиков с последней смены heading
    pub dwell_timer: u32,
    /// Порог dwell для forced replanning
    pub max_dwell: u32,
    /// Сторона bounding box
    pub size: f32,
    pub class: AgentClass,
    /// Заморожен (bonus/stun) — не двигается и не стреляет
    pub frozen: bool,
    /// Уничтожен — тик пропускается, соседи его игнорируют
    pub destroyed: bool,

    pub shots: ShotScheduler,
    pub stuck: StuckDetector,
    pub memory: PositionMemory,
    pub exploration: ExplorationTarget,
}

impl Agent {
    pub fn new(
        position: Vec2,
        heading: Direction,
        class: AgentClass,
        size: f32,
        config: &SteeringConfig,
    ) -> Self {
        let profile = config.profile(class);
        Self {
            position,
            heading,
            mode: BehaviorMode::Patrol,
            motion: MotionState::Moving,
            dwell_timer: 0,
            max_dwell: profile.max_dwell_ticks.max(1),
            size: size.max(0.0),
            class,
            frozen: false,
            destroyed: false,
            shots: ShotScheduler::default(),
            stuck: StuckDetector::new(position),
            memory: PositionMemory::new(config.memory),
            exploration: ExplorationTarget::default(),
        }
    }

    /// Bounding box в текущей позиции
    pub fn bounds(&self) -> Aabb {
        Aabb::centered(self.position, self.size)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.motion, MotionState::Stopped { .. })
    }

    /// Read-only проекция для соседей
    pub fn snapshot(&self) -> NeighborSnapshot {
        NeighborSnapshot {
            destroyed: self.destroyed,
            bounds: self.bounds(),
        }
    }
}

/// Публичное состояние другого агента (то, что видят соседи)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct NeighborSnapshot {
    pub destroyed: bool,
    pub bounds: Aabb,
}

impl NeighborSnapshot {
    pub fn live(bounds: Aabb) -> Self {
        Self {
            destroyed: false,
            bounds,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Есть ли живой сосед, пересекающий `bounds`
pub fn collides_with_neighbors(bounds: &Aabb, neighbors: &[NeighborSnapshot]) -> bool {
    neighbors
        .iter()
        .any(|n| !n.is_destroyed() && n.bounds.intersects(bounds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_new_defaults() {
        let config = SteeringConfig::default();
        let agent = Agent::new(Vec2::new(100.0, 50.0), Direction::Left, AgentClass::Heavy, 16.0, &config);

        assert_eq!(agent.mode, BehaviorMode::Patrol);
        assert_eq!(agent.motion, MotionState::Moving);
        assert_eq!(agent.max_dwell, config.heavy.max_dwell_ticks);
        assert!(agent.shots.can_fire);
        assert_eq!(agent.shots.reload_timer, 0);
        assert_eq!(agent.bounds(), Aabb::centered(Vec2::new(100.0, 50.0), 16.0));
    }

    #[test]
    fn test_destroyed_neighbors_ignored() {
        let probe = Aabb::centered(Vec2::ZERO, 10.0);
        let dead = NeighborSnapshot {
            destroyed: true,
            bounds: Aabb::centered(Vec2::new(2.0, 0.0), 10.0),
        };
        assert!(!collides_with_neighbors(&probe, &[dead]));
        assert!(!collides_with_neighbors(&probe, &[]));

        let alive = NeighborSnapshot::live(Aabb::centered(Vec2::new(2.0, 0.0), 10.0));
        assert!(collides_with_neighbors(&probe, &[dead, alive]));
    }
}
