//! TileWorld — reference SpatialQuery на tile сетке
//!
//! Не часть steering core: карта хранится снаружи, здесь — минимальная
//! реализация для headless прогонов, демо и тестов.

use bevy::prelude::*;

use crate::components::{Aabb, Zone};
use crate::world::SpatialQuery;

/// Tile grid: solid тайлы блокируют движение
#[derive(Resource, Debug, Clone)]
pub struct TileWorld {
    width: usize,
    height: usize,
    tile_size: f32,
    zone_size: f32,
    solid: Vec<bool>,
}

impl TileWorld {
    /// Пустая карта `width × height` тайлов
    pub fn new(width: usize, height: usize, tile_size: f32, zone_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size: tile_size.max(f32::EPSILON),
            zone_size: zone_size.max(f32::EPSILON),
            solid: vec![false; width * height],
        }
    }

    /// Карта из ASCII: `#` — стена, всё остальное — пусто.
    ///
    /// Ширина = самая длинная строка, короткие строки дополняются пустыми тайлами.
    pub fn from_ascii(rows: &str, tile_size: f32, zone_size: f32) -> Self {
        let lines: Vec<&str> = rows
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let mut world = Self::new(width, lines.len(), tile_size, zone_size);

        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                if ch == '#' {
                    world.set_solid(x, y, true);
                }
            }
        }

        world
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_solid(&mut self, x: usize, y: usize, solid: bool) {
        if x < self.width && y < self.height {
            self.solid[y * self.width + x] = solid;
        }
    }

    /// Залить прямоугольник тайлов [x0, x1) × [y0, y1)
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.solid[y * self.width + x] = true;
            }
        }
    }

    /// Стены по периметру карты
    pub fn with_border(mut self) -> Self {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            return self;
        }
        self.fill_rect(0, 0, w, 1);
        self.fill_rect(0, h - 1, w, h);
        self.fill_rect(0, 0, 1, h);
        self.fill_rect(w - 1, 0, w, h);
        self
    }

    /// Демо-арена: периметр + сетка колонн 2×2 каждые 8 тайлов
    pub fn arena(width: usize, height: usize, tile_size: f32, zone_size: f32) -> Self {
        let mut world = Self::new(width, height, tile_size, zone_size).with_border();
        for y in (6..height.saturating_sub(4)).step_by(8) {
            for x in (6..width.saturating_sub(4)).step_by(8) {
                world.fill_rect(x, y, x + 2, y + 2);
            }
        }
        world
    }

    pub fn is_solid(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.solid[y as usize * self.width + x as usize]
    }
}

impl SpatialQuery for TileWorld {
    fn check_collision(&self, bounds: &Aabb) -> bool {
        // Диапазон тайлов, которые box строго пересекает
        let x0 = (bounds.min.x / self.tile_size).floor() as i64;
        let y0 = (bounds.min.y / self.tile_size).floor() as i64;
        let x1 = (bounds.max.x / self.tile_size).ceil() as i64 - 1;
        let y1 = (bounds.max.y / self.tile_size).ceil() as i64 - 1;

        for y in y0..=y1 {
            for x in x0..=x1 {
                if !self.is_solid(x, y) {
                    continue;
                }
                let tile = Aabb::new(
                    Vec2::new(x as f32 * self.tile_size, y as f32 * self.tile_size),
                    Vec2::new((x + 1) as f32 * self.tile_size, (y + 1) as f32 * self.tile_size),
                );
                if tile.intersects(bounds) {
                    return true;
                }
            }
        }

        false
    }

    fn zone_of(&self, position: Vec2) -> Zone {
        Zone::from_world(position, self.zone_size)
    }

    fn world_bounds(&self) -> Aabb {
        Aabb::new(
            Vec2::ZERO,
            Vec2::new(
                self.width as f32 * self.tile_size,
                self.height as f32 * self.tile_size,
            ),
        )
    }

    fn zone_center(&self, zone: Zone) -> Vec2 {
        Vec2::new(
            (zone.x() as f32 + 0.5) * self.zone_size,
            (zone.y() as f32 + 0.5) * self.zone_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ascii_walls() {
        let world = TileWorld::from_ascii(
            "####\n\
             #..#\n\
             ####",
            8.0,
            16.0,
        );
        assert_eq!(world.width(), 4);
        assert_eq!(world.height(), 3);
        assert!(world.is_solid(0, 0));
        assert!(!world.is_solid(1, 1));
        assert!(!world.is_solid(-1, 0));
    }

    #[test]
    fn test_check_collision_strict_overlap() {
        let mut world = TileWorld::new(10, 10, 8.0, 32.0);
        world.set_solid(5, 5, true);

        // Box ровно касается тайла (40..48) гранью — не collision
        let touching = Aabb::new(Vec2::new(32.0, 40.0), Vec2::new(40.0, 48.0));
        assert!(!world.check_collision(&touching));

        let overlapping = Aabb::new(Vec2::new(33.0, 40.0), Vec2::new(41.0, 48.0));
        assert!(world.check_collision(&overlapping));
    }

    #[test]
    fn test_is_blocked_outside_bounds() {
        let world = TileWorld::new(10, 10, 8.0, 32.0);
        let inside = Aabb::centered(Vec2::new(40.0, 40.0), 8.0);
        let outside = Aabb::centered(Vec2::new(2.0, 40.0), 8.0);
        assert!(!world.is_blocked(&inside));
        assert!(world.is_blocked(&outside));
    }

    #[test]
    fn test_zone_center_roundtrip() {
        let world = TileWorld::new(20, 20, 8.0, 32.0);
        let zone = Zone::new(3, 2);
        assert_eq!(world.zone_of(world.zone_center(zone)), zone);
        assert_eq!(world.world_center(), Vec2::new(80.0, 80.0));
    }
}
