//! StuckDetector — net displacement против последней записанной позиции

use bevy::prelude::*;
use rand::Rng;

use crate::ai::scoring::random_other_direction;
use crate::components::Direction;

/// Детектор застревания
///
/// Позиция запоминается только когда агент реально сдвинулся на порог,
/// поэтому медленный дрейф в пределах порога копится как "стоим".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StuckDetector {
    last_position: Vec2,
    counter: u32,
}

impl StuckDetector {
    pub fn new(position: Vec2) -> Self {
        Self {
            last_position: position,
            counter: 0,
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn last_position(&self) -> Vec2 {
        self.last_position
    }

    /// Один sample.
    ///
    /// Возвращает `Some(direction)` когда counter превысил `limit` —
    /// forced смена на случайное из 3 других направлений, counter → 0.
    pub fn sample<R: Rng + ?Sized>(
        &mut self,
        position: Vec2,
        heading: Direction,
        min_distance: f32,
        limit: u32,
        rng: &mut R,
    ) -> Option<Direction> {
        let moved = position.distance(self.last_position);

        if moved < min_distance {
            self.counter += 1;
        } else {
            self.counter = 0;
            self.last_position = position;
        }

        if self.counter > limit {
            self.counter = 0;
            return Some(random_other_direction(heading, rng));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_triggers_once_at_tick_61() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut detector = StuckDetector::new(Vec2::ZERO);
        let mut triggers = Vec::new();

        for tick in 1..=80 {
            // Шумное дрожание < 2 units от исходной точки
            let position = Vec2::new((tick % 3) as f32 * 0.5, 0.0);
            if let Some(dir) = detector.sample(position, Direction::Up, 2.0, 60, &mut rng) {
                assert_ne!(dir, Direction::Up);
                triggers.push(tick);
                assert_eq!(detector.counter(), 0);
            }
        }

        assert_eq!(triggers, vec![61]);
        assert_eq!(detector.counter(), 19);
    }

    #[test]
    fn test_real_movement_resets_counter() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut detector = StuckDetector::new(Vec2::ZERO);

        for _ in 0..30 {
            assert!(detector.sample(Vec2::ZERO, Direction::Left, 2.0, 60, &mut rng).is_none());
        }
        assert_eq!(detector.counter(), 30);

        detector.sample(Vec2::new(5.0, 0.0), Direction::Left, 2.0, 60, &mut rng);
        assert_eq!(detector.counter(), 0);
        assert_eq!(detector.last_position(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_slow_drift_accumulates_against_recorded_position() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut detector = StuckDetector::new(Vec2::ZERO);

        // 1 unit/тик: 1-й sample < 2, 2-й уже 2 от записанной точки → reset
        detector.sample(Vec2::new(1.0, 0.0), Direction::Right, 2.0, 60, &mut rng);
        assert_eq!(detector.counter(), 1);
        detector.sample(Vec2::new(2.0, 0.0), Direction::Right, 2.0, 60, &mut rng);
        assert_eq!(detector.counter(), 0);
    }
}
