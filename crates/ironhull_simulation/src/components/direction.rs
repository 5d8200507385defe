//! Cardinal heading (4 направления, value equality)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Heading агента — всегда одно из 4 cardinal направлений
///
/// Координаты: +X вправо, +Y вниз (screen-space, как у tile карты).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Default for Direction {
    fn default() -> Self {
        Self::Up
    }
}

impl Direction {
    /// Фиксированный порядок перебора кандидатов (важен для детерминизма)
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Единичный вектор направления
    pub fn to_vec2(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Смещение в zone-координатах
    pub fn to_ivec2(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Три направления кроме `self` (в порядке `ALL`)
    pub fn others(self) -> [Direction; 3] {
        let mut out = [Direction::Up; 3];
        let mut i = 0;
        for dir in Self::ALL {
            if dir != self {
                out[i] = dir;
                i += 1;
            }
        }
        out
    }

    /// Straight-line направление к цели: доминирующая ось смещения.
    ///
    /// `None` если цель совпадает с позицией. При |dx| == |dy| берём вертикаль.
    pub fn toward(from: Vec2, to: Vec2) -> Option<Direction> {
        let delta = to - from;
        if delta.x == 0.0 && delta.y == 0.0 {
            return None;
        }

        let dir = if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };

        Some(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_others_excludes_self() {
        for dir in Direction::ALL {
            let others = dir.others();
            assert_eq!(others.len(), 3);
            assert!(!others.contains(&dir));
        }
    }

    #[test]
    fn test_toward_dominant_axis() {
        let origin = Vec2::ZERO;
        assert_eq!(Direction::toward(origin, Vec2::new(10.0, 2.0)), Some(Direction::Right));
        assert_eq!(Direction::toward(origin, Vec2::new(-10.0, 2.0)), Some(Direction::Left));
        assert_eq!(Direction::toward(origin, Vec2::new(1.0, -5.0)), Some(Direction::Up));
        assert_eq!(Direction::toward(origin, Vec2::new(3.0, 3.0)), Some(Direction::Down));
        assert_eq!(Direction::toward(origin, origin), None);
    }

    #[test]
    fn test_vectors_match_opposite() {
        for dir in Direction::ALL {
            assert_eq!(dir.to_vec2(), -dir.opposite().to_vec2());
            assert_eq!(dir.to_ivec2(), -dir.opposite().to_ivec2());
        }
    }
}
