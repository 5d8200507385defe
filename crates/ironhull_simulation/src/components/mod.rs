//! ECS Components для steering core
//!
//! Организация по доменам:
//! - direction: cardinal heading (Direction)
//! - geometry: bounding boxes (Aabb)
//! - zone: грубая сетка для памяти и base proximity (Zone)
//! - agent: агент и его режимы (Agent, AgentClass, BehaviorMode, MotionState, NeighborSnapshot)
//! - threat: внешние флаги режима (ThreatAssessment)

pub mod agent;
pub mod direction;
pub mod geometry;
pub mod threat;
pub mod zone;

// Re-exports для удобного импорта
pub use agent::*;
pub use direction::*;
pub use geometry::*;
pub use threat::*;
pub use zone::*;
