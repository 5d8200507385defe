//! Steering config: все константы поведения + профили классов агентов
//!
//! Вместо наследования AI (базовый бот vs "умный" бот) — один ModeController,
//! параметризованный `ClassProfile`, который выбирается по tagged variant `AgentClass`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::AgentClass;

/// Как агент выбирает новый heading при blockage/timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum ReplanStrategy {
    /// Случайное из 3 других направлений (простой бот)
    Random,
    /// Multi-term scoring через SteeringScorer
    Scored,
}

/// Веса exploration (memory-based) варианта scoring
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Штраф за static collision в test позиции
    pub collision_penalty: f32,
    /// Штраф за пересечение с живым соседом
    pub neighbor_penalty: f32,
    /// Бонус за смену направления
    pub novelty_bonus: f32,
    /// Бонус за приближение к центру карты
    pub center_bonus: f32,
    /// Бонус за приближение к exploration target
    pub exploration_bonus: f32,
    /// Верхняя граница jitter [0, jitter)
    pub jitter: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            collision_penalty: 1000.0,
            neighbor_penalty: 500.0,
            novelty_bonus: 100.0,
            center_bonus: 50.0,
            exploration_bonus: 30.0,
            jitter: 30.0,
        }
    }
}

/// Веса goal-directed варианта (возврат к базе, атака базы)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct GoalWeights {
    /// Кандидат строго уменьшает расстояние до цели
    pub closer_bonus: f32,
    /// Кандидат не приближает к цели
    pub farther_penalty: f32,
    /// Кандидат совпадает со straight-line направлением к цели
    pub straight_line_bonus: f32,
    /// Кандидат совпадает с текущим heading (стабильность)
    pub stability_bonus: f32,
    /// Zone кандидата == zone цели
    pub goal_zone_bonus: f32,
}

impl Default for GoalWeights {
    fn default() -> Self {
        Self {
            closer_bonus: 400.0,
            farther_penalty: 300.0,
            straight_line_bonus: 200.0,
            stability_bonus: 300.0,
            goal_zone_bonus: 200.0,
        }
    }
}

/// Параметры PositionMemory
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Вес zone сразу после посещения
    pub visit_weight: f32,
    /// Множитель затухания за тик (0..1)
    pub decay_per_tick: f32,
    /// Веса ниже floor удаляются
    pub prune_floor: f32,
    /// Максимум zones в памяти
    pub capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            visit_weight: 150.0,
            decay_per_tick: 0.98,
            prune_floor: 1.0,
            capacity: 32,
        }
    }
}

/// Профиль класса агента (reload, fire probability, скорость, scoring веса)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct ClassProfile {
    /// Тиков перезарядки после выстрела
    pub reload_ticks: u32,
    /// Вероятность выстрела за тик (до BASE_ATTACK множителя)
    pub fire_probability: f64,
    /// Units за тик
    pub speed: f32,
    /// Диапазон max-dwell (тики), перевыбирается при каждой смене heading
    pub min_dwell_ticks: u32,
    pub max_dwell_ticks: u32,
    pub replan: ReplanStrategy,
    pub weights: ScoringWeights,
    pub goal_weights: GoalWeights,
}

impl ClassProfile {
    pub fn standard() -> Self {
        Self {
            reload_ticks: 40,
            fire_probability: 0.02,
            speed: 1.0,
            min_dwell_ticks: 90,
            max_dwell_ticks: 180,
            replan: ReplanStrategy::Scored,
            weights: ScoringWeights::default(),
            goal_weights: GoalWeights::default(),
        }
    }

    /// Быстрый разведчик: короткая перезарядка, частая смена курса
    pub fn fast() -> Self {
        Self {
            reload_ticks: 25,
            fire_probability: 0.025,
            speed: 2.0,
            min_dwell_ticks: 45,
            max_dwell_ticks: 120,
            ..Self::standard()
        }
    }

    /// Тяжёлый: медленный, долгая перезарядка
    pub fn heavy() -> Self {
        Self {
            reload_ticks: 60,
            fire_probability: 0.015,
            speed: 0.75,
            min_dwell_ticks: 120,
            max_dwell_ticks: 240,
            ..Self::standard()
        }
    }

    /// Clamp значений в допустимые диапазоны (config не может уронить tick)
    pub fn sanitized(mut self) -> Self {
        self.fire_probability = self.fire_probability.clamp(0.0, 1.0);
        self.speed = self.speed.max(0.0);
        self.min_dwell_ticks = self.min_dwell_ticks.max(1);
        self.max_dwell_ticks = self.max_dwell_ticks.max(self.min_dwell_ticks);
        self.weights.jitter = self.weights.jitter.max(0.0);
        self
    }
}

/// Глобальный steering config (Resource)
#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
pub struct SteeringConfig {
    pub standard: ClassProfile,
    pub fast: ClassProfile,
    pub heavy: ClassProfile,

    pub memory: MemoryConfig,

    /// Множитель fire probability в BASE_ATTACK
    pub base_attack_fire_multiplier: f64,

    /// Шанс перейти в STOPPED сразу после смены heading (PATROL)
    pub stop_chance: f64,
    /// Длительность STOPPED (мс, injected clock)
    pub stop_duration_ms: u64,

    /// Порог displacement за тик для stuck detection
    pub stuck_distance: f32,
    /// Counter > stuck_ticks → forced смена heading
    pub stuck_ticks: u32,

    /// Chebyshev радиус защиты базы (zone units)
    pub protection_radius: u32,

    /// Отступ от границ мира для exploration targets
    pub exploration_margin: f32,
    /// Target считается достигнутым ближе этой дистанции
    pub exploration_reach_distance: f32,

    /// Если лучший кандидат ниже — fallback на случайную смену heading
    pub min_acceptable_score: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            standard: ClassProfile::standard(),
            fast: ClassProfile::fast(),
            heavy: ClassProfile::heavy(),
            memory: MemoryConfig::default(),
            base_attack_fire_multiplier: 3.0,
            stop_chance: 0.3,
            stop_duration_ms: 1000,
            stuck_distance: 2.0,
            stuck_ticks: 60,
            protection_radius: 2,
            exploration_margin: 48.0,
            exploration_reach_distance: 16.0,
            min_acceptable_score: -400.0,
        }
    }
}

impl SteeringConfig {
    /// Профиль по tagged variant класса
    pub fn profile(&self, class: AgentClass) -> &ClassProfile {
        match class {
            AgentClass::Standard => &self.standard,
            AgentClass::Fast => &self.fast,
            AgentClass::Heavy => &self.heavy,
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.standard = self.standard.sanitized();
        self.fast = self.fast.sanitized();
        self.heavy = self.heavy.sanitized();
        self.memory.capacity = self.memory.capacity.max(1);
        self.memory.decay_per_tick = self.memory.decay_per_tick.clamp(0.0, 1.0);
        self.memory.prune_floor = self.memory.prune_floor.max(0.0);
        self.base_attack_fire_multiplier = self.base_attack_fire_multiplier.max(0.0);
        self.stop_chance = self.stop_chance.clamp(0.0, 1.0);
        self.stuck_distance = self.stuck_distance.max(0.0);
        self.exploration_margin = self.exploration_margin.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_reload_table() {
        let config = SteeringConfig::default();
        assert_eq!(config.profile(AgentClass::Standard).reload_ticks, 40);
        assert_eq!(config.profile(AgentClass::Fast).reload_ticks, 25);
        assert_eq!(config.profile(AgentClass::Heavy).reload_ticks, 60);
        assert_eq!(config.profile(AgentClass::Standard).fire_probability, 0.02);
        assert_eq!(config.stop_chance, 0.3);
        assert_eq!(config.stop_duration_ms, 1000);
    }

    #[test]
    fn test_sanitized_clamps() {
        let mut config = SteeringConfig::default();
        config.stop_chance = 4.0;
        config.memory.capacity = 0;
        config.heavy.fire_probability = -1.0;
        config.fast.max_dwell_ticks = 0;

        let config = config.sanitized();
        assert_eq!(config.stop_chance, 1.0);
        assert_eq!(config.memory.capacity, 1);
        assert_eq!(config.heavy.fire_probability, 0.0);
        assert!(config.fast.max_dwell_ticks >= config.fast.min_dwell_ticks);
    }
}
