//! ThreatAssessment — флаги режима от внешнего threat-assessment коллаборатора

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{BehaviorMode, Zone};

/// Обновляется снаружи каждый тик, steering core только читает
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct ThreatAssessment {
    pub base_defense: bool,
    pub base_attack: bool,
    /// Своя база (центр защиты)
    pub home_zone: Zone,
    /// Вражеская база (цель атаки)
    pub target_base_zone: Option<Zone>,
}

impl ThreatAssessment {
    pub fn patrol(home_zone: Zone) -> Self {
        Self {
            home_zone,
            ..Default::default()
        }
    }

    /// Режим по приоритету флагов: BaseDefense > BaseAttack > Patrol.
    ///
    /// BaseAttack без известной target zone деградирует в Patrol.
    pub fn resolve_mode(&self) -> BehaviorMode {
        if self.base_defense {
            BehaviorMode::BaseDefense
        } else if self.base_attack && self.target_base_zone.is_some() {
            BehaviorMode::BaseAttack
        } else {
            BehaviorMode::Patrol
        }
    }
}
