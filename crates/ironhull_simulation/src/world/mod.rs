//! World collaborators: static geometry queries + injectable clock
//!
//! Steering core не знает, как хранится карта — только `SpatialQuery`.
//! `TileWorld` — reference реализация (tile grid) для headless прогонов и тестов.

pub mod clock;
pub mod tile_world;

use bevy::prelude::*;

use crate::components::{Aabb, Zone};

pub use clock::{Clock, ManualClock, SimClock};
pub use tile_world::TileWorld;

/// Read-only запросы к static геометрии мира
pub trait SpatialQuery {
    /// Пересекает ли box static геометрию
    fn check_collision(&self, bounds: &Aabb) -> bool;

    /// Zone по world координатам
    fn zone_of(&self, position: Vec2) -> Zone;

    /// Прямоугольник мира (центр карты, exploration targets, границы движения)
    fn world_bounds(&self) -> Aabb;

    /// World точка центра zone (цель goal-directed scoring)
    fn zone_center(&self, zone: Zone) -> Vec2;

    fn world_center(&self) -> Vec2 {
        self.world_bounds().center()
    }

    /// Blocked для движения: static collision или выход за границы мира
    fn is_blocked(&self, bounds: &Aabb) -> bool {
        !self.world_bounds().contains(bounds) || self.check_collision(bounds)
    }
}
