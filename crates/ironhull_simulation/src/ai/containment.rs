//! Base-zone containment (BASE_DEFENSE): держимся в Chebyshev радиусе home zone

use rand::Rng;

use crate::ai::scoring::test_position;
use crate::components::{Agent, Direction, Zone};
use crate::world::SpatialQuery;

/// Результат выбора направления
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainmentChoice {
    pub direction: Direction,
    /// Safe направлений не нашлось — axis-aligned возврат к home zone
    pub fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseContainment {
    pub home_zone: Zone,
    /// Chebyshev радиус (zone units)
    pub radius: u32,
}

impl BaseContainment {
    pub fn new(home_zone: Zone, radius: u32) -> Self {
        Self { home_zone, radius }
    }

    pub fn distance(&self, zone: Zone) -> u32 {
        self.home_zone.chebyshev(zone)
    }

    pub fn contains(&self, zone: Zone) -> bool {
        self.distance(zone) <= self.radius
    }

    /// Zone, в которой окажется test позиция кандидата
    pub fn resulting_zone<W: SpatialQuery + ?Sized>(
        world: &W,
        agent: &Agent,
        direction: Direction,
    ) -> Zone {
        world.zone_of(test_position(agent, direction))
    }

    /// Направления, которые оставляют агента в радиусе (порядок `Direction::ALL`)
    pub fn safe_headings<W: SpatialQuery + ?Sized>(&self, world: &W, agent: &Agent) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.contains(Self::resulting_zone(world, agent, dir)))
            .collect()
    }

    /// Patrol-направление внутри радиуса: uniform среди safe, иначе fallback по оси
    pub fn choose_patrol_direction<W: SpatialQuery + ?Sized, R: Rng + ?Sized>(
        &self,
        world: &W,
        agent: &Agent,
        rng: &mut R,
    ) -> ContainmentChoice {
        let safe = self.safe_headings(world, agent);
        if !safe.is_empty() {
            return ContainmentChoice {
                direction: safe[rng.gen_range(0..safe.len())],
                fallback: false,
            };
        }

        let current_zone = world.zone_of(agent.position);
        let direction = self.return_direction(current_zone).unwrap_or(agent.heading);
        crate::log(&format!(
            "🏠 Containment: no safe heading from {:?} (home {:?}, r={}), fallback {:?}",
            current_zone, self.home_zone, self.radius, direction
        ));

        ContainmentChoice {
            direction,
            fallback: true,
        }
    }

    /// Ось с наибольшим zone offset к home: горизонталь если |dx| > |dy|, иначе вертикаль.
    ///
    /// `None` когда агент уже в home zone.
    pub fn return_direction(&self, current: Zone) -> Option<Direction> {
        let offset = current.offset_to(self.home_zone);
        if offset.x == 0 && offset.y == 0 {
            return None;
        }

        let dir = if offset.x.abs() > offset.y.abs() {
            if offset.x > 0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if offset.y > 0 {
            Direction::Down
        } else {
            Direction::Up
        };

        Some(dir)
    }

    /// Priority вовлечения базы: max(0, radius − distance + 1)
    pub fn engagement_priority(&self, current: Zone) -> u32 {
        (self.radius + 1).saturating_sub(self.distance(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SteeringConfig;
    use crate::components::AgentClass;
    use crate::world::TileWorld;
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// 20×20 zones по 32 units, без стен
    fn open_world() -> TileWorld {
        TileWorld::new(80, 80, 8.0, 32.0)
    }

    fn agent_in_zone(world: &TileWorld, zone: Zone) -> Agent {
        let config = SteeringConfig::default();
        Agent::new(world.zone_center(zone), Direction::Up, AgentClass::Standard, 16.0, &config)
    }

    #[test]
    fn test_scenario_all_four_safe_at_home() {
        let world = open_world();
        let agent = agent_in_zone(&world, Zone::new(5, 5));
        let containment = BaseContainment::new(Zone::new(5, 5), 2);

        let safe = containment.safe_headings(&world, &agent);
        assert_eq!(safe.len(), 4);

        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..200 {
            let choice = containment.choose_patrol_direction(&world, &agent, &mut rng);
            assert!(!choice.fallback);
            assert!(safe.contains(&choice.direction));
        }
    }

    #[test]
    fn test_edge_of_radius_excludes_outward() {
        let world = open_world();
        let agent = agent_in_zone(&world, Zone::new(7, 5));
        let containment = BaseContainment::new(Zone::new(5, 5), 2);

        let safe = containment.safe_headings(&world, &agent);
        assert!(!safe.contains(&Direction::Right));
        assert!(safe.contains(&Direction::Left));
        assert_eq!(safe.len(), 3);
    }

    #[test]
    fn test_fallback_axis_toward_home() {
        let world = open_world();
        // Далеко за радиусом: любое направление оставляет снаружи
        let agent = agent_in_zone(&world, Zone::new(12, 7));
        let containment = BaseContainment::new(Zone::new(5, 5), 2);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let choice = containment.choose_patrol_direction(&world, &agent, &mut rng);
        assert!(choice.fallback);
        assert_eq!(choice.direction, Direction::Left);

        assert_eq!(containment.return_direction(Zone::new(6, 9)), Some(Direction::Up));
        // |dx| == |dy| → вертикаль
        assert_eq!(containment.return_direction(Zone::new(3, 3)), Some(Direction::Down));
        assert_eq!(containment.return_direction(Zone::new(5, 5)), None);
    }

    #[test]
    fn test_randomized_trials_never_leave_radius() {
        let world = open_world();
        let containment = BaseContainment::new(Zone::new(5, 5), 2);
        let mut rng = ChaCha8Rng::seed_from_u64(2024);

        for _ in 0..1000 {
            let zone = Zone::new(rng.gen_range(3..=7), rng.gen_range(3..=7));
            let mut agent = agent_in_zone(&world, zone);
            // Случайное смещение внутри zone
            agent.position += Vec2::new(rng.gen_range(-8.0..8.0), rng.gen_range(-8.0..8.0));

            let choice = containment.choose_patrol_direction(&world, &agent, &mut rng);
            let resulting = BaseContainment::resulting_zone(&world, &agent, choice.direction);
            assert!(
                containment.distance(resulting) <= 2,
                "zone {:?} → {:?} вышла из радиуса",
                zone,
                resulting
            );
        }
    }

    #[test]
    fn test_engagement_priority() {
        let containment = BaseContainment::new(Zone::new(5, 5), 2);
        assert_eq!(containment.engagement_priority(Zone::new(5, 5)), 3);
        assert_eq!(containment.engagement_priority(Zone::new(6, 5)), 2);
        assert_eq!(containment.engagement_priority(Zone::new(7, 7)), 1);
        assert_eq!(containment.engagement_priority(Zone::new(8, 5)), 0);
        assert_eq!(containment.engagement_priority(Zone::new(20, 5)), 0);
    }
}
