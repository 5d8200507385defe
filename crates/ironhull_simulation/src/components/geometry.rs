//! Axis-aligned bounding box (world units)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// AABB в world координатах
///
/// Инвариант: min.x ≤ max.x, min.y ≤ max.y (shrink не выворачивает box).
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Квадрат со стороной `size` с центром в `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = Vec2::splat(size.max(0.0) * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Сжать на `margin` с каждой стороны (не меньше точки в центре)
    pub fn shrink(&self, margin: f32) -> Self {
        let center = self.center();
        let half = ((self.max - self.min) * 0.5 - Vec2::splat(margin)).max(Vec2::ZERO);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: касание гранями не считается пересечением
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// `other` целиком внутри `self`
    pub fn contains(&self, other: &Aabb) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }
}
