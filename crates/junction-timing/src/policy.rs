//! Timing policy - converts vehicle counts into green-time allocations
//!
//! green = clamp(count × time_per_vehicle, min_green, max_green)
//!
//! The rule is applied independently per direction, once at session start.

use junction_core::{Direction, GreenDurations, SignalError, SignalResult, VehicleCounts};

/// Timing policy configuration
#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    /// Green seconds granted per waiting vehicle
    pub time_per_vehicle: f64,
    /// Lower bound on any green phase (seconds)
    pub min_green: f64,
    /// Upper bound on any green phase (seconds)
    pub max_green: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            time_per_vehicle: 1.5,
            min_green: 5.0,
            max_green: 20.0,
        }
    }
}

impl TimingConfig {
    /// Configuration for saturated approaches: longer phases, higher ceiling
    pub fn rush_hour() -> Self {
        TimingConfig {
            time_per_vehicle: 2.0,
            min_green: 8.0,
            max_green: 45.0,
        }
    }

    /// Configuration for light traffic: short ceiling keeps the cycle brisk
    pub fn quiet() -> Self {
        TimingConfig {
            time_per_vehicle: 1.5,
            min_green: 5.0,
            max_green: 12.0,
        }
    }

    /// Check the bounds are usable
    pub fn validate(&self) -> SignalResult<()> {
        let all_finite = self.time_per_vehicle.is_finite()
            && self.min_green.is_finite()
            && self.max_green.is_finite();
        if !all_finite {
            return Err(SignalError::InvalidTiming(
                "timing values must be finite".into(),
            ));
        }
        if self.time_per_vehicle < 0.0 {
            return Err(SignalError::InvalidTiming(format!(
                "time_per_vehicle must be >= 0, got {}",
                self.time_per_vehicle
            )));
        }
        if self.min_green <= 0.0 {
            return Err(SignalError::InvalidTiming(format!(
                "min_green must be > 0, got {}",
                self.min_green
            )));
        }
        if self.min_green > self.max_green {
            return Err(SignalError::InvalidTiming(format!(
                "min_green ({}) exceeds max_green ({})",
                self.min_green, self.max_green
            )));
        }
        Ok(())
    }

    /// Smallest count that earns the full max_green
    pub fn saturation_count(&self) -> Option<u64> {
        if self.time_per_vehicle <= 0.0 {
            return None;
        }
        Some((self.max_green / self.time_per_vehicle).ceil() as u64)
    }
}

/// Timing policy - pure count → duration mapping
#[derive(Clone, Debug, Default)]
pub struct TimingPolicy {
    config: TimingConfig,
}

impl TimingPolicy {
    /// Create a policy with the default bounds (1.5s/vehicle, 5s–20s)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy with custom bounds
    pub fn with_config(config: TimingConfig) -> SignalResult<Self> {
        config.validate()?;
        Ok(TimingPolicy { config })
    }

    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Green seconds for a single approach
    pub fn green_time(&self, count: u64) -> f64 {
        let cfg = &self.config;
        let raw = count as f64 * cfg.time_per_vehicle;
        raw.clamp(cfg.min_green, cfg.max_green)
    }

    /// Green seconds for all four approaches
    pub fn allocate(&self, counts: &VehicleCounts) -> SignalResult<GreenDurations> {
        let mut durations = [0.0; 4];
        for direction in Direction::ALL {
            durations[direction.index()] = self.green_time(counts.get(direction));
        }

        tracing::debug!(
            north = durations[0],
            east = durations[1],
            south = durations[2],
            west = durations[3],
            "green times allocated"
        );

        GreenDurations::new(durations)
    }

    /// Full cycle length the policy would produce for these counts
    pub fn cycle_length(&self, counts: &VehicleCounts) -> f64 {
        counts.iter().map(|(_, c)| self.green_time(c)).sum()
    }
}
