//! Zone — грубая grid-ячейка (ключ памяти, base proximity)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Zone coordinates (integer pair)
///
/// Выводится детерминированно из world координат через `SpatialQuery::zone_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub struct Zone(pub IVec2);

impl Zone {
    pub const fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    /// Zone по world позиции (floor деления на размер zone)
    pub fn from_world(position: Vec2, zone_size: f32) -> Self {
        let size = zone_size.max(f32::EPSILON);
        Self(IVec2::new(
            (position.x / size).floor() as i32,
            (position.y / size).floor() as i32,
        ))
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn y(&self) -> i32 {
        self.0.y
    }

    /// Смещение `other - self`
    pub fn offset_to(&self, other: Zone) -> IVec2 {
        other.0 - self.0
    }

    /// Chebyshev distance: max(|dx|, |dy|)
    pub fn chebyshev(&self, other: Zone) -> u32 {
        let d = self.offset_to(other);
        d.x.unsigned_abs().max(d.y.unsigned_abs())
    }

    /// Zones в одной строке или столбце
    pub fn is_aligned_with(&self, other: Zone) -> bool {
        self.0.x == other.0.x || self.0.y == other.0.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_world_floors_negative() {
        assert_eq!(Zone::from_world(Vec2::new(31.9, 0.0), 32.0), Zone::new(0, 0));
        assert_eq!(Zone::from_world(Vec2::new(32.0, 64.0), 32.0), Zone::new(1, 2));
        assert_eq!(Zone::from_world(Vec2::new(-0.1, -33.0), 32.0), Zone::new(-1, -2));
    }

    #[test]
    fn test_chebyshev() {
        let home = Zone::new(5, 5);
        assert_eq!(home.chebyshev(home), 0);
        assert_eq!(home.chebyshev(Zone::new(7, 4)), 2);
        assert_eq!(home.chebyshev(Zone::new(2, 6)), 3);
        assert_eq!(Zone::new(2, 6).chebyshev(home), 3);
    }

    #[test]
    fn test_alignment() {
        let a = Zone::new(3, 8);
        assert!(a.is_aligned_with(Zone::new(3, 1)));
        assert!(a.is_aligned_with(Zone::new(0, 8)));
        assert!(!a.is_aligned_with(Zone::new(4, 7)));
    }
}
