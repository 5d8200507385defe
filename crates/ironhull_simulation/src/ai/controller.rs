//! ModeController — top-level state machine одного агента за один тик
//!
//! States: {Patrol, BaseDefense, BaseAttack} × {Moving, Stopped}
//!
//! Порядок за тик:
//! 1. mode из ThreatAssessment (BaseDefense > BaseAttack > Patrol)
//! 2. memory: decay + запись текущей zone
//! 3. Stopped → Moving по injected clock (только Patrol)
//! 4. Moving: шаг по heading; blockage или dwell timeout → replanning
//! 5. StuckDetector (независимо от replanning, может его перебить)
//! 6. Patrol: после смены heading с шансом stop_chance → Stopped
//! 7. ShotScheduler — всегда

use rand::Rng;

use crate::ai::containment::BaseContainment;
use crate::ai::scoring::{random_other_direction, ScoringStrategy, SteeringScorer};
use crate::combat::{fire_probability, ShotIntent, ShotRequest};
use crate::components::{
    Aabb, Agent, BehaviorMode, Direction, MotionState, NeighborSnapshot, ThreatAssessment,
};
use crate::config::{ClassProfile, ReplanStrategy, SteeringConfig};
use crate::world::{Clock, SpatialQuery};

/// Результат тика для game loop (projectile spawner, рендер)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SideEffects {
    pub moved: bool,
    pub heading_changed: bool,
    pub fire_request: Option<ShotIntent>,
    /// Активный режим после тика
    pub mode: BehaviorMode,
    /// max(0, radius − distance + 1) до базы режима (0 в Patrol)
    pub engagement_priority: u32,
    /// Heading сменил StuckDetector
    pub stuck_recovery: bool,
}

/// Всё, что агент читает извне за тик (explicit injection, без глобалов)
pub struct TickInput<'a, W: SpatialQuery + ?Sized> {
    pub world: &'a W,
    /// Другие агенты (без себя)
    pub neighbors: &'a [NeighborSnapshot],
    pub threat: &'a ThreatAssessment,
    pub config: &'a SteeringConfig,
    pub clock: &'a dyn Clock,
}

pub struct ModeController;

impl ModeController {
    /// Один тик агента
    pub fn update<W, R>(agent: &mut Agent, input: &TickInput<'_, W>, rng: &mut R) -> SideEffects
    where
        W: SpatialQuery + ?Sized,
        R: Rng + ?Sized,
    {
        if agent.destroyed {
            return SideEffects::default();
        }

        let config = input.config;
        let profile = *config.profile(agent.class);
        let mode = Self::apply_mode(agent, input.threat);

        let mut effects = SideEffects {
            mode,
            ..Default::default()
        };

        agent.memory.decay();
        agent.memory.record(input.world.zone_of(agent.position));

        if !agent.frozen {
            Self::resume_if_dwell_elapsed(agent, config, input.clock);

            if !agent.is_stopped() {
                Self::movement_step(agent, input, &profile, rng, &mut effects);

                if let Some(direction) = agent.stuck.sample(
                    agent.position,
                    agent.heading,
                    config.stuck_distance,
                    config.stuck_ticks,
                    rng,
                ) {
                    crate::log(&format!(
                        "🧱 Stuck at {:?}: {:?} → {:?}",
                        agent.position, agent.heading, direction
                    ));
                    Self::change_heading(agent, direction, &profile, rng);
                    effects.heading_changed = true;
                    effects.stuck_recovery = true;
                }

                let stop_chance = config.stop_chance.clamp(0.0, 1.0);
                if effects.heading_changed && mode == BehaviorMode::Patrol && rng.gen_bool(stop_chance) {
                    let since_ms = input.clock.now_ms();
                    agent.motion = MotionState::Stopped { since_ms };
                    crate::log(&format!("⏸️ Patrol: Moving → Stopped at {} ms", since_ms));
                }
            }
        }

        let priority_direction = Self::priority_fire_direction(agent, input);
        effects.fire_request = agent.shots.update(
            ShotRequest {
                origin: agent.position,
                heading: agent.heading,
                priority_direction,
                frozen: agent.frozen,
                fire_probability: fire_probability(&profile, mode, config),
                reload_ticks: profile.reload_ticks,
            },
            rng,
        );
        if let Some(shot) = effects.fire_request {
            crate::log(&format!(
                "💥 Fire {:?} from {:?} (prioritized: {})",
                shot.direction, shot.origin, shot.prioritized
            ));
        }

        effects.engagement_priority = Self::engagement_priority(agent, input);
        effects
    }

    /// Флаги threat → mode. Смена режима сбрасывает Stopped.
    fn apply_mode(agent: &mut Agent, threat: &ThreatAssessment) -> BehaviorMode {
        let mode = threat.resolve_mode();
        if mode != agent.mode {
            crate::log(&format!("AI: mode {:?} → {:?}", agent.mode, mode));
            agent.mode = mode;
            if mode != BehaviorMode::Patrol {
                agent.motion = MotionState::Moving;
            }
        }
        mode
    }

    fn resume_if_dwell_elapsed(agent: &mut Agent, config: &SteeringConfig, clock: &dyn Clock) {
        if let MotionState::Stopped { since_ms } = agent.motion {
            if clock.now_ms().saturating_sub(since_ms) >= config.stop_duration_ms {
                agent.motion = MotionState::Moving;
                crate::log(&format!("▶️ Patrol: Stopped → Moving at {} ms", clock.now_ms()));
            }
        }
    }

    /// Шаг по heading; blockage или dwell timeout → replanning
    fn movement_step<W, R>(
        agent: &mut Agent,
        input: &TickInput<'_, W>,
        profile: &ClassProfile,
        rng: &mut R,
        effects: &mut SideEffects,
    ) where
        W: SpatialQuery + ?Sized,
        R: Rng + ?Sized,
    {
        agent.dwell_timer = agent.dwell_timer.saturating_add(1);
        effects.moved = !Self::step_leaves_home_radius(agent, input, profile.speed)
            && try_move(agent, input.world, input.neighbors, profile.speed);

        let timed_out = agent.dwell_timer >= agent.max_dwell;
        if effects.moved && !timed_out {
            return;
        }

        let direction = Self::replan(agent, input, profile, rng);
        if direction != agent.heading {
            Self::change_heading(agent, direction, profile, rng);
            effects.heading_changed = true;
        } else {
            // Тот же heading — новый dwell отсчёт, иначе timeout срабатывал бы каждый тик
            agent.dwell_timer = 0;
        }
    }

    /// BaseDefense: шаг выводит из радиуса home zone → считаем blockage
    fn step_leaves_home_radius<W: SpatialQuery + ?Sized>(agent: &Agent, input: &TickInput<'_, W>, speed: f32) -> bool {
        if agent.mode != BehaviorMode::BaseDefense {
            return false;
        }

        let containment = BaseContainment::new(input.threat.home_zone, input.config.protection_radius);
        let current = input.world.zone_of(agent.position);
        let next = input.world.zone_of(agent.position + agent.heading.to_vec2() * speed);

        // Снаружи радиуса не держим — там работает goal-directed возврат
        containment.contains(current) && !containment.contains(next)
    }

    /// Новый heading по режиму
    fn replan<W, R>(agent: &mut Agent, input: &TickInput<'_, W>, profile: &ClassProfile, rng: &mut R) -> Direction
    where
        W: SpatialQuery + ?Sized,
        R: Rng + ?Sized,
    {
        let world = input.world;
        let scorer = SteeringScorer::for_agent(world, input.neighbors, agent, input.config);

        let mode = agent.mode;
        match mode {
            BehaviorMode::Patrol => match profile.replan {
                ReplanStrategy::Random => random_other_direction(agent.heading, rng),
                ReplanStrategy::Scored => scorer.select_heading(agent, &ScoringStrategy::Exploration, rng),
            },

            BehaviorMode::BaseDefense => {
                let home = input.threat.home_zone;
                let containment = BaseContainment::new(home, input.config.protection_radius);
                if containment.contains(world.zone_of(agent.position)) {
                    containment.choose_patrol_direction(world, agent, rng).direction
                } else {
                    let strategy = ScoringStrategy::GoalDirected {
                        goal: world.zone_center(home),
                        goal_zone: home,
                    };
                    scorer.select_heading(agent, &strategy, rng)
                }
            }

            BehaviorMode::BaseAttack => {
                let strategy = match input.threat.target_base_zone {
                    Some(target) => ScoringStrategy::GoalDirected {
                        goal: world.zone_center(target),
                        goal_zone: target,
                    },
                    None => ScoringStrategy::Exploration,
                };
                scorer.select_heading(agent, &strategy, rng)
            }
        }
    }

    /// Смена heading: dwell с нуля, новый max_dwell из диапазона класса
    fn change_heading<R: Rng + ?Sized>(agent: &mut Agent, direction: Direction, profile: &ClassProfile, rng: &mut R) {
        agent.heading = direction;
        agent.dwell_timer = 0;
        let min = profile.min_dwell_ticks.max(1);
        let max = profile.max_dwell_ticks.max(min);
        agent.max_dwell = rng.gen_range(min..=max);
    }

    /// BaseAttack: если вражеская база в той же строке/столбце zones — стреляем в неё
    fn priority_fire_direction<W: SpatialQuery + ?Sized>(agent: &Agent, input: &TickInput<'_, W>) -> Option<Direction> {
        if agent.mode != BehaviorMode::BaseAttack {
            return None;
        }

        let target = input.threat.target_base_zone?;
        let current = input.world.zone_of(agent.position);
        if !current.is_aligned_with(target) {
            return None;
        }

        Direction::toward(agent.position, input.world.zone_center(target))
    }

    fn engagement_priority<W: SpatialQuery + ?Sized>(agent: &Agent, input: &TickInput<'_, W>) -> u32 {
        let base = match agent.mode {
            BehaviorMode::Patrol => return 0,
            BehaviorMode::BaseDefense => input.threat.home_zone,
            BehaviorMode::BaseAttack => match input.threat.target_base_zone {
                Some(zone) => zone,
                None => return 0,
            },
        };

        BaseContainment::new(base, input.config.protection_radius)
            .engagement_priority(input.world.zone_of(agent.position))
    }
}

/// Сдвинуть агента на `speed` по heading.
///
/// Blocked: static геометрия, граница мира, или живой сосед, к которому шаг приближает.
/// Шаг прочь от уже пересекающегося соседа разрешён (иначе слипшиеся агенты застынут).
pub fn try_move<W: SpatialQuery + ?Sized>(
    agent: &mut Agent,
    world: &W,
    neighbors: &[NeighborSnapshot],
    speed: f32,
) -> bool {
    if speed <= 0.0 {
        return false;
    }

    let next = agent.position + agent.heading.to_vec2() * speed;
    let bounds = Aabb::centered(next, agent.size);

    if world.is_blocked(&bounds) {
        return false;
    }

    let neighbor_blocks = neighbors.iter().any(|n| {
        if n.is_destroyed() || !n.bounds.intersects(&bounds) {
            return false;
        }
        let center = n.bounds.center();
        next.distance(center) <= agent.position.distance(center)
    });
    if neighbor_blocks {
        return false;
    }

    agent.position = next;
    true
}
