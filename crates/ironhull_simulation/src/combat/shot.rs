//! ShotScheduler — reload timer + probability-gated решение стрелять
//!
//! Architecture:
//! - Core: решает "стреляем ли в этот тик и куда" → ShotIntent
//! - Projectile система (внешняя): спавнит пулю по AgentFired event
//!
//! Работает каждый тик в любом режиме; reload считается даже когда агент frozen.

use bevy::prelude::*;
use rand::Rng;

use crate::components::{BehaviorMode, Direction};
use crate::config::{ClassProfile, SteeringConfig};

/// Запрос на выстрел (core → projectile spawner)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotIntent {
    /// Откуда стреляем (центр агента)
    pub origin: Vec2,
    /// Куда летит пуля
    pub direction: Direction,
    /// Выстрел по priority направлению (вражеская база), а не по heading
    pub prioritized: bool,
}

/// Event: агент выстрелил (ECS → projectile collaborator)
#[derive(Event, Debug, Clone, Copy)]
pub struct AgentFired {
    pub shooter: Entity,
    pub intent: ShotIntent,
}

/// Входные данные решения на один тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    pub origin: Vec2,
    pub heading: Direction,
    /// Line-of-sight направление на приоритетную цель
    pub priority_direction: Option<Direction>,
    pub frozen: bool,
    /// Итоговая вероятность за тик (уже с учётом режима)
    pub fire_probability: f64,
    pub reload_ticks: u32,
}

/// Reload state агента
///
/// Инвариант: пока `reload_timer > 0`, `can_fire == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotScheduler {
    pub reload_timer: u32,
    pub can_fire: bool,
}

impl Default for ShotScheduler {
    fn default() -> Self {
        Self {
            reload_timer: 0,
            can_fire: true,
        }
    }
}

/// Вероятность выстрела за тик для класса и режима (BASE_ATTACK × multiplier)
pub fn fire_probability(profile: &ClassProfile, mode: BehaviorMode, config: &SteeringConfig) -> f64 {
    let base = profile.fire_probability;
    let p = match mode {
        BehaviorMode::BaseAttack => base * config.base_attack_fire_multiplier,
        BehaviorMode::Patrol | BehaviorMode::BaseDefense => base,
    };
    p.clamp(0.0, 1.0)
}

impl ShotScheduler {
    /// Один тик перезарядки.
    ///
    /// Timer уменьшается до 0; `can_fire` возвращается на тике после того,
    /// как timer уже был 0 — т.е. после выстрела с reload N агент не может
    /// стрелять ровно N тиков, на тике N+1 снова может.
    pub fn tick_reload(&mut self) {
        if self.can_fire {
            return;
        }

        if self.reload_timer > 0 {
            self.reload_timer -= 1;
        } else {
            self.can_fire = true;
        }
    }

    /// Запустить перезарядку после выстрела
    pub fn start_reload(&mut self, reload_ticks: u32) {
        self.can_fire = false;
        self.reload_timer = reload_ticks;
    }

    /// Reload tick + решение о выстреле
    pub fn update<R: Rng + ?Sized>(&mut self, request: ShotRequest, rng: &mut R) -> Option<ShotIntent> {
        self.tick_reload();

        if !self.can_fire || request.frozen {
            return None;
        }

        let p = request.fire_probability.clamp(0.0, 1.0);
        if !rng.gen_bool(p) {
            return None;
        }

        self.start_reload(request.reload_ticks);

        let (direction, prioritized) = match request.priority_direction {
            Some(dir) => (dir, true),
            None => (request.heading, false),
        };

        Some(ShotIntent {
            origin: request.origin,
            direction,
            prioritized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::AgentClass;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn request(p: f64, reload_ticks: u32) -> ShotRequest {
        ShotRequest {
            origin: Vec2::new(10.0, 10.0),
            heading: Direction::Left,
            priority_direction: None,
            frozen: false,
            fire_probability: p,
            reload_ticks,
        }
    }

    /// После выстрела: `can_fire == false` ровно `reload` тиков, на тике reload+1 — true
    fn assert_reload_cadence(class: AgentClass, expected: u32) {
        let config = SteeringConfig::default();
        let profile = config.profile(class);
        assert_eq!(profile.reload_ticks, expected);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut shots = ShotScheduler::default();
        let fired = shots.update(request(1.0, profile.reload_ticks), &mut rng);
        assert!(fired.is_some());
        assert!(!shots.can_fire);

        for tick in 1..=expected {
            shots.tick_reload();
            assert!(!shots.can_fire, "{:?}: can_fire слишком рано на тике {}", class, tick);
        }

        shots.tick_reload();
        assert!(shots.can_fire, "{:?}: can_fire не вернулся на тике {}", class, expected + 1);
        assert_eq!(shots.reload_timer, 0);
    }

    #[test]
    fn test_reload_cadence_heavy() {
        assert_reload_cadence(AgentClass::Heavy, 60);
    }

    #[test]
    fn test_reload_cadence_fast() {
        assert_reload_cadence(AgentClass::Fast, 25);
    }

    #[test]
    fn test_reload_cadence_standard() {
        assert_reload_cadence(AgentClass::Standard, 40);
    }

    #[test]
    fn test_priority_direction_overrides_heading() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut shots = ShotScheduler::default();
        let req = ShotRequest {
            priority_direction: Some(Direction::Down),
            ..request(1.0, 40)
        };

        let intent = shots.update(req, &mut rng).expect("p = 1.0 всегда стреляет");
        assert_eq!(intent.direction, Direction::Down);
        assert!(intent.prioritized);
        assert_eq!(intent.origin, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_frozen_never_fires_but_reload_counts() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut shots = ShotScheduler::default();
        shots.start_reload(3);

        let frozen = ShotRequest {
            frozen: true,
            ..request(1.0, 40)
        };
        for _ in 0..10 {
            assert!(shots.update(frozen, &mut rng).is_none());
        }
        assert!(shots.can_fire);
        assert_eq!(shots.reload_timer, 0);
    }

    #[test]
    fn test_zero_probability_never_fires() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut shots = ShotScheduler::default();
        for _ in 0..1000 {
            assert!(shots.update(request(0.0, 40), &mut rng).is_none());
        }
        assert!(shots.can_fire);
    }

    #[test]
    fn test_base_attack_triples_probability() {
        let config = SteeringConfig::default();
        let profile = config.profile(AgentClass::Standard);
        let patrol = fire_probability(profile, BehaviorMode::Patrol, &config);
        let defense = fire_probability(profile, BehaviorMode::BaseDefense, &config);
        let attack = fire_probability(profile, BehaviorMode::BaseAttack, &config);

        assert_eq!(patrol, 0.02);
        assert_eq!(defense, 0.02);
        assert!((attack - 0.06).abs() < 1e-12);
    }
}
