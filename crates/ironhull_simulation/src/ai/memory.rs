//! PositionMemory — недавно посещённые zones с затухающим весом
//!
//! Чем свежее посещение, тем больше вес → тем сильнее штраф в scoring.
//! Отбивает у агента желание сразу возвращаться туда, откуда он приехал.

use std::collections::HashMap;

use crate::components::Zone;
use crate::config::MemoryConfig;

/// (zone, recency weight)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryCell {
    pub zone: Zone,
    pub weight: f32,
}

#[derive(Debug, Clone)]
pub struct PositionMemory {
    config: MemoryConfig,
    cells: HashMap<Zone, f32>,
}

impl Default for PositionMemory {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

impl PositionMemory {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            cells: HashMap::with_capacity(config.capacity.max(1)),
        }
    }

    /// Отметить посещение: вес zone сбрасывается на `visit_weight`.
    ///
    /// При переполнении вытесняется самая "старая" (наименьший вес) zone.
    pub fn record(&mut self, zone: Zone) {
        if !self.cells.contains_key(&zone) && self.cells.len() >= self.config.capacity.max(1) {
            if let Some(weakest) = self.weakest_zone() {
                self.cells.remove(&weakest);
            }
        }
        self.cells.insert(zone, self.config.visit_weight);
    }

    /// Один тик затухания + pruning
    pub fn decay(&mut self) {
        let factor = self.config.decay_per_tick;
        let floor = self.config.prune_floor;
        self.cells.retain(|_, weight| {
            *weight *= factor;
            *weight >= floor
        });
    }

    /// Штраф для zone (0 если не помним)
    pub fn penalty(&self, zone: Zone) -> f32 {
        self.cells.get(&zone).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Снимок памяти: по убыванию веса, tie-break по координатам zone
    pub fn cells(&self) -> Vec<MemoryCell> {
        let mut cells: Vec<MemoryCell> = self
            .cells
            .iter()
            .map(|(&zone, &weight)| MemoryCell { zone, weight })
            .collect();
        cells.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| (a.zone.x(), a.zone.y()).cmp(&(b.zone.x(), b.zone.y())))
        });
        cells
    }

    // HashMap order случаен → tie-break по координатам, иначе eviction недетерминирован
    fn weakest_zone(&self) -> Option<Zone> {
        self.cells
            .iter()
            .min_by(|(za, wa), (zb, wb)| {
                wa.total_cmp(wb)
                    .then_with(|| (za.x(), za.y()).cmp(&(zb.x(), zb.y())))
            })
            .map(|(&zone, _)| zone)
    }
}
