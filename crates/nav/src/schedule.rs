use glam::Vec2;
use riftgrid_common::Cell;
use serde::{Deserialize, Serialize};

use crate::flow::FlowField;

/// When to rebuild the flow field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowScheduleConfig {
    /// Minimum simulation time between target-driven rebuilds.
    pub interval_secs: f32,
    /// Target displacement that forces a rebuild before the interval elapses.
    pub max_drift: f32,
}

impl Default for FlowScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 0.2,
            max_drift: 4.0,
        }
    }
}

/// Why a rebuild was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    NoField,
    Invalidated,
    ObstaclesChanged,
    TargetMoved,
    TargetDrifted,
}

/// Throttles flow field rebuilds.
///
/// Obstacle changes always rebuild on the same tick so agents never steer by
/// a field older than the index. Target movement rebuilds at most once per
/// interval, unless the target drifted far enough to make the field wrong.
#[derive(Debug, Clone, Default)]
pub struct FlowSchedule {
    config: FlowScheduleConfig,
    since_rebuild: f32,
    invalidated: bool,
}

impl FlowSchedule {
    pub fn new(config: FlowScheduleConfig) -> Self {
        Self {
            config,
            since_rebuild: 0.0,
            invalidated: false,
        }
    }

    pub fn config(&self) -> &FlowScheduleConfig {
        &self.config
    }

    /// Advance simulation time.
    pub fn advance(&mut self, dt: f32) {
        self.since_rebuild += dt.max(0.0);
    }

    /// Force the next check to rebuild.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn mark_rebuilt(&mut self) {
        self.since_rebuild = 0.0;
        self.invalidated = false;
    }

    /// Decide whether `field` must be rebuilt for `target` against the
    /// index at `revision`.
    pub fn check(&self, field: Option<&FlowField>, target: Vec2, revision: u64) -> Option<RebuildReason> {
        let Some(field) = field else {
            return Some(RebuildReason::NoField);
        };
        if self.invalidated {
            return Some(RebuildReason::Invalidated);
        }
        if field.revision() != revision {
            return Some(RebuildReason::ObstaclesChanged);
        }
        if Cell::containing(target.x, target.y) == field.target_cell() {
            return None;
        }
        if field.target().distance(target) >= self.config.max_drift {
            return Some(RebuildReason::TargetDrifted);
        }
        if self.since_rebuild >= self.config.interval_secs {
            return Some(RebuildReason::TargetMoved);
        }
        None
    }
}
