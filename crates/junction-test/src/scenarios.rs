//! Predefined traffic scenarios

use junction_runtime::{RuntimeResult, SessionConfig};
use junction_timing::TimingConfig;

use crate::{FrameJitterModel, IntersectionSimulator};

/// Equal traffic on every approach
pub fn balanced() -> RuntimeResult<IntersectionSimulator> {
    IntersectionSimulator::new([8, 8, 8, 8], FrameJitterModel::steady(), 0)
}

/// Heavy north-south corridor, light cross street
pub fn north_south_corridor() -> RuntimeResult<IntersectionSimulator> {
    IntersectionSimulator::new([10, 2, 10, 2], FrameJitterModel::steady(), 0)
}

/// One saturated approach, the others empty
pub fn single_busy_approach() -> RuntimeResult<IntersectionSimulator> {
    IntersectionSimulator::new([25, 0, 0, 0], FrameJitterModel::jittery(), 1)
}

/// Rush-hour policy under a stuttering render loop
pub fn rush_hour() -> RuntimeResult<IntersectionSimulator> {
    let config = SessionConfig {
        timing: TimingConfig::rush_hour(),
        ..SessionConfig::default()
    };
    IntersectionSimulator::with_config([30, 12, 25, 6], FrameJitterModel::stuttering(), 2, config)
}
