//! Combat module: только решение о выстреле
//!
//! Core ответственность:
//! - Reload timer + can_fire (ShotScheduler)
//! - ShotIntent → AgentFired event
//!
//! Внешняя ответственность (projectile collaborator):
//! - spawn пули, физика, попадания, урон

pub mod shot;

pub use shot::{fire_probability, AgentFired, ShotIntent, ShotRequest, ShotScheduler};
