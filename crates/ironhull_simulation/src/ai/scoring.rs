//! SteeringScorer — multi-term scoring 4 cardinal направлений
//!
//! Без pathfinding: каждый кандидат оценивается по test позиции
//! `position + direction × (2 × size)`, побеждает максимальный score.
//!
//! Две стратегии (веса и смысл разные, поэтому не сливаем):
//! - Exploration — патруль: memory штраф, novelty, центр карты, exploration target, jitter
//! - GoalDirected — движение к zone (возврат к базе, атака базы)
//!
//! Общие термы обеих стратегий: static collision (hard veto) и collision с соседями.

use bevy::prelude::*;
use rand::Rng;

use crate::components::{collides_with_neighbors, Aabb, Agent, Direction, NeighborSnapshot, Zone};
use crate::config::{GoalWeights, ScoringWeights, SteeringConfig};
use crate::world::SpatialQuery;

/// Static collision probe в test позиции сжимается на столько units с каждой стороны
pub const PROBE_SHRINK: f32 = 2.0;

/// Кандидат на новый heading (transient, живёт только внутри replanning)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateHeading {
    pub direction: Direction,
    pub score: f32,
    /// Test позиция упирается в static геометрию (hard veto)
    pub blocked: bool,
}

/// Какой формулой считать score
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringStrategy {
    /// Memory-based патруль
    Exploration,
    /// Движение к цели
    GoalDirected {
        /// World точка цели
        goal: Vec2,
        /// Zone цели
        goal_zone: Zone,
    },
}

/// Exploration target: точка, к которой агент сейчас "тянется"
///
/// Генерируется лениво, перегенерируется когда достигнута.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExplorationTarget {
    point: Option<Vec2>,
}

impl ExplorationTarget {
    pub fn point(&self) -> Option<Vec2> {
        self.point
    }

    /// Текущий target; новый если его нет или агент уже ближе `reach_distance`.
    ///
    /// Новая точка — uniform внутри `bounds`, сжатых на `margin`
    /// (если margin съедает весь мир — центр мира).
    pub fn ensure<R: Rng + ?Sized>(
        &mut self,
        position: Vec2,
        bounds: Aabb,
        margin: f32,
        reach_distance: f32,
        rng: &mut R,
    ) -> Vec2 {
        if let Some(point) = self.point {
            if position.distance(point) >= reach_distance {
                return point;
            }
        }

        let area = bounds.shrink(margin);
        let point = Vec2::new(
            rng.gen_range(area.min.x..=area.max.x),
            rng.gen_range(area.min.y..=area.max.y),
        );
        self.point = Some(point);
        point
    }
}

/// Test позиция кандидата: два корпуса вперёд
pub fn test_position(agent: &Agent, direction: Direction) -> Vec2 {
    agent.position + direction.to_vec2() * (2.0 * agent.size)
}

/// Случайное из 3 направлений кроме `current`
pub fn random_other_direction<R: Rng + ?Sized>(current: Direction, rng: &mut R) -> Direction {
    let others = current.others();
    others[rng.gen_range(0..others.len())]
}

/// Scorer с явно переданными world query и соседями (никаких глобалов)
pub struct SteeringScorer<'a, W: SpatialQuery + ?Sized> {
    world: &'a W,
    neighbors: &'a [NeighborSnapshot],
    weights: ScoringWeights,
    goal_weights: GoalWeights,
    min_acceptable_score: f32,
    exploration_margin: f32,
    exploration_reach: f32,
}

impl<'a, W: SpatialQuery + ?Sized> SteeringScorer<'a, W> {
    pub fn new(
        world: &'a W,
        neighbors: &'a [NeighborSnapshot],
        weights: ScoringWeights,
        goal_weights: GoalWeights,
    ) -> Self {
        let defaults = SteeringConfig::default();
        Self {
            world,
            neighbors,
            weights,
            goal_weights,
            min_acceptable_score: defaults.min_acceptable_score,
            exploration_margin: defaults.exploration_margin,
            exploration_reach: defaults.exploration_reach_distance,
        }
    }

    /// Scorer с весами класса агента и порогами из config
    pub fn for_agent(
        world: &'a W,
        neighbors: &'a [NeighborSnapshot],
        agent: &Agent,
        config: &SteeringConfig,
    ) -> Self {
        let profile = config.profile(agent.class);
        Self {
            world,
            neighbors,
            weights: profile.weights,
            goal_weights: profile.goal_weights,
            min_acceptable_score: config.min_acceptable_score,
            exploration_margin: config.exploration_margin,
            exploration_reach: config.exploration_reach_distance,
        }
    }

    pub fn with_min_acceptable_score(mut self, score: f32) -> Self {
        self.min_acceptable_score = score;
        self
    }

    /// Score всех 4 кандидатов (порядок `Direction::ALL`)
    pub fn score_candidates<R: Rng + ?Sized>(
        &self,
        agent: &mut Agent,
        strategy: &ScoringStrategy,
        rng: &mut R,
    ) -> [CandidateHeading; 4] {
        // Exploration target генерируем до scoring — он общий для всех кандидатов
        let target = match strategy {
            ScoringStrategy::Exploration => Some(agent.exploration.ensure(
                agent.position,
                self.world.world_bounds(),
                self.exploration_margin,
                self.exploration_reach,
                rng,
            )),
            ScoringStrategy::GoalDirected { .. } => None,
        };

        let agent = &*agent;
        Direction::ALL.map(|direction| {
            let test = test_position(agent, direction);
            let (hazard, blocked) = self.hazard_score(test, agent.size);

            let score = match strategy {
                ScoringStrategy::Exploration => {
                    hazard + self.exploration_terms(agent, direction, test, target, rng)
                }
                ScoringStrategy::GoalDirected { goal, goal_zone } => {
                    hazard + self.goal_terms(agent, direction, test, *goal, *goal_zone)
                }
            };

            CandidateHeading {
                direction,
                score,
                blocked,
            }
        })
    }

    /// Выбрать heading.
    ///
    /// Static-blocked кандидаты участвуют только если заблокированы все 4.
    /// Если лучший ниже `min_acceptable_score` — случайная смена heading.
    pub fn select_heading<R: Rng + ?Sized>(
        &self,
        agent: &mut Agent,
        strategy: &ScoringStrategy,
        rng: &mut R,
    ) -> Direction {
        let candidates = self.score_candidates(agent, strategy, rng);
        let any_open = candidates.iter().any(|c| !c.blocked);

        let mut best: Option<CandidateHeading> = None;
        for candidate in candidates.iter().filter(|c| !any_open || !c.blocked) {
            if best.map_or(true, |b| candidate.score > b.score) {
                best = Some(*candidate);
            }
        }

        match best {
            Some(best) if best.score >= self.min_acceptable_score => best.direction,
            _ => {
                let fallback = fallback_direction(&candidates, agent.heading, rng);
                crate::log(&format!(
                    "🎲 Scorer: all candidates below {:.0}, random fallback {:?} → {:?}",
                    self.min_acceptable_score, agent.heading, fallback
                ));
                fallback
            }
        }
    }

    /// Static collision + соседи (общие для обеих стратегий)
    ///
    /// Shrink только для static геометрии; соседей проверяем полным box.
    fn hazard_score(&self, test: Vec2, size: f32) -> (f32, bool) {
        let body = Aabb::centered(test, size);
        let mut score = 0.0;

        let blocked = self.world.is_blocked(&body.shrink(PROBE_SHRINK));
        if blocked {
            score -= self.weights.collision_penalty;
        }
        if collides_with_neighbors(&body, self.neighbors) {
            score -= self.weights.neighbor_penalty;
        }

        (score, blocked)
    }

    fn exploration_terms<R: Rng + ?Sized>(
        &self,
        agent: &Agent,
        direction: Direction,
        test: Vec2,
        target: Option<Vec2>,
        rng: &mut R,
    ) -> f32 {
        let mut score = -agent.memory.penalty(self.world.zone_of(test));

        if direction != agent.heading {
            score += self.weights.novelty_bonus;
        }

        let center = self.world.world_center();
        if test.distance(center) < agent.position.distance(center) {
            score += self.weights.center_bonus;
        }

        if let Some(target) = target {
            if test.distance(target) < agent.position.distance(target) {
                score += self.weights.exploration_bonus;
            }
        }

        if self.weights.jitter > 0.0 {
            score += rng.gen_range(0.0..self.weights.jitter);
        }

        score
    }

    fn goal_terms(
        &self,
        agent: &Agent,
        direction: Direction,
        test: Vec2,
        goal: Vec2,
        goal_zone: Zone,
    ) -> f32 {
        let w = &self.goal_weights;
        let mut score = 0.0;

        if test.distance(goal) < agent.position.distance(goal) {
            score += w.closer_bonus;
        } else {
            score -= w.farther_penalty;
        }

        if Direction::toward(agent.position, goal) == Some(direction) {
            score += w.straight_line_bonus;
        }

        if direction == agent.heading {
            score += w.stability_bonus;
        }

        if self.world.zone_of(test) == goal_zone {
            score += w.goal_zone_bonus;
        }

        score
    }
}

/// Случайная смена heading, не нарушая veto: сначала открытые направления кроме текущего
fn fallback_direction<R: Rng + ?Sized>(
    candidates: &[CandidateHeading; 4],
    current: Direction,
    rng: &mut R,
) -> Direction {
    let open: Vec<Direction> = candidates
        .iter()
        .filter(|c| !c.blocked && c.direction != current)
        .map(|c| c.direction)
        .collect();

    if !open.is_empty() {
        return open[rng.gen_range(0..open.len())];
    }

    let current_open = candidates
        .iter()
        .any(|c| c.direction == current && !c.blocked);
    if current_open {
        current
    } else {
        random_other_direction(current, rng)
    }
}
