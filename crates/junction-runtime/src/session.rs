//! Junction Session - one run of the controller from counts to shutdown

use std::time::Duration;

use junction_core::{Acquisition, Direction, GreenDurations, VehicleCounts};
use junction_scheduler::{BoardWriter, PhaseChange, SignalBoard, SignalScheduler, SignalSnapshot};
use junction_timing::{
    FixedStepClock, MonotonicClock, TickClock, TimingConfig, TimingPolicy, DEFAULT_MAX_STEP,
    DEFAULT_TICK_RATE_HZ,
};

use crate::{IntersectionView, RuntimeError, RuntimeResult, DEFAULT_AMBER_THRESHOLD};

/// Session configuration
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Green-time policy bounds
    pub timing: TimingConfig,
    /// Frame rate of the deterministic clock (Hz)
    pub tick_rate: f64,
    /// Largest step the live clock reports
    pub max_step: Duration,
    /// Amber window shown at the end of each green phase (seconds)
    pub amber_threshold: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            timing: TimingConfig::default(),
            tick_rate: DEFAULT_TICK_RATE_HZ,
            max_step: DEFAULT_MAX_STEP,
            amber_threshold: DEFAULT_AMBER_THRESHOLD,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> RuntimeResult<()> {
        self.timing.validate()?;

        if !self.tick_rate.is_finite() || self.tick_rate <= 0.0 {
            return Err(RuntimeError::InvalidConfig(format!(
                "tick_rate must be a finite value > 0, got {}",
                self.tick_rate
            )));
        }
        if self.max_step.is_zero() {
            return Err(RuntimeError::InvalidConfig("max_step must be non-zero".into()));
        }
        if !self.amber_threshold.is_finite() || self.amber_threshold < 0.0 {
            return Err(RuntimeError::InvalidConfig(format!(
                "amber_threshold must be a finite value >= 0, got {}",
                self.amber_threshold
            )));
        }
        Ok(())
    }

    /// Deterministic clock stepping by `1 / tick_rate`
    pub fn fixed_clock(&self) -> FixedStepClock {
        FixedStepClock::from_rate(self.tick_rate)
    }

    /// Wall clock clamped to `max_step`
    pub fn live_clock(&self) -> MonotonicClock {
        MonotonicClock::with_max_step(self.max_step)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SessionStats {
    pub ticks: u64,
    pub phase_changes: u64,
    /// Seconds fed to the scheduler
    pub elapsed: f64,
    /// Ticks whose delta breached the single-transition precondition
    pub oversized_steps: u64,
    /// Overshoot dropped at phase boundaries (seconds)
    pub discarded_overshoot: f64,
}

/// A running controller session
pub struct Session {
    config: SessionConfig,
    counts: VehicleCounts,
    scheduler: SignalScheduler,
    writer: BoardWriter,
    board: SignalBoard,
    stats: SessionStats,
}

impl Session {
    /// Start from an acquisition result.
    /// Aborted acquisitions and all-zero counts never produce a session.
    pub fn start(acquisition: Acquisition, config: SessionConfig) -> RuntimeResult<Self> {
        config.validate()?;

        let counts = match acquisition {
            Acquisition::Counts(counts) => counts,
            Acquisition::Aborted(reason) => {
                tracing::warn!(%reason, "acquisition aborted, session not started");
                return Err(RuntimeError::AcquisitionAborted(reason));
            }
        };

        let policy = TimingPolicy::with_config(config.timing.clone())?;
        let scheduler = SignalScheduler::from_counts(&counts, &policy)?;
        let (writer, board) = SignalBoard::channel(scheduler.query());

        tracing::info!(
            north = counts.get(Direction::North),
            east = counts.get(Direction::East),
            south = counts.get(Direction::South),
            west = counts.get(Direction::West),
            "session started"
        );

        Ok(Session {
            config,
            counts,
            scheduler,
            writer,
            board,
            stats: SessionStats::default(),
        })
    }

    /// Acquire from `source`, then start
    pub fn from_source<S: crate::CountSource>(
        source: &mut S,
        config: SessionConfig,
    ) -> RuntimeResult<Self> {
        Self::start(source.acquire(), config)
    }

    /// One loop iteration: read the clock, advance, publish
    pub fn tick<C: TickClock>(&mut self, clock: &mut C) -> Option<PhaseChange> {
        let delta = clock.tick();
        self.step(delta)
    }

    /// One loop iteration with an explicit delta
    pub fn step(&mut self, delta: f64) -> Option<PhaseChange> {
        self.stats.ticks += 1;
        if delta > 0.0 {
            self.stats.elapsed += delta;
            if !self.scheduler.accepts_step(delta) {
                self.stats.oversized_steps += 1;
            }
        }

        let change = self.scheduler.advance(delta);
        if let Some(change) = &change {
            self.stats.phase_changes += 1;
            self.stats.discarded_overshoot += change.overshoot;
        }

        self.writer.publish(self.scheduler.query());
        change
    }

    /// Run `n` ticks and return the handovers that happened
    pub fn run_ticks<C: TickClock>(&mut self, n: u64, clock: &mut C) -> Vec<PhaseChange> {
        (0..n).filter_map(|_| self.tick(clock)).collect()
    }

    /// Tick until `cycles` full cycles are done or `max_ticks` elapse.
    /// Returns the number of ticks run.
    pub fn run_until_cycles<C: TickClock>(
        &mut self,
        cycles: u64,
        clock: &mut C,
        max_ticks: u64,
    ) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && self.scheduler.query().cycles_completed < cycles {
            self.tick(clock);
            ran += 1;
        }
        ran
    }

    pub fn query(&self) -> SignalSnapshot {
        self.scheduler.query()
    }

    /// Read handle for renderers on other threads
    pub fn board(&self) -> SignalBoard {
        self.board.clone()
    }

    /// Light board for the current state
    pub fn view(&self) -> IntersectionView {
        IntersectionView::build(
            &self.scheduler.query(),
            self.scheduler.durations(),
            &self.counts,
            self.config.amber_threshold,
        )
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn counts(&self) -> &VehicleCounts {
        &self.counts
    }

    pub fn durations(&self) -> &GreenDurations {
        self.scheduler.durations()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LightColor, StaticCounts};
    use junction_core::{AbortReason, SignalError};

    fn scenario_b() -> Session {
        let mut src = StaticCounts::new([10, 2, 10, 2]);
        Session::from_source(&mut src, SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_aborted_acquisition_rejected() {
        let result = Session::start(
            Acquisition::Aborted(AbortReason::Cancelled),
            SessionConfig::default(),
        );
        assert!(matches!(
            result,
            Err(RuntimeError::AcquisitionAborted(AbortReason::Cancelled))
        ));
    }

    #[test]
    fn test_zero_measurement_rejected() {
        let result = Session::start(
            Acquisition::Counts(VehicleCounts::new([0; 4])),
            SessionConfig::default(),
        );
        assert!(matches!(
            result,
            Err(RuntimeError::Signal(SignalError::DegenerateCounts))
        ));
    }

    #[test]
    fn test_zero_batch_is_reported_as_abort() {
        let mut src = crate::BatchSource::new(vec![Some(0); 4]);
        let result = Session::from_source(&mut src, SessionConfig::default());
        assert!(matches!(
            result,
            Err(RuntimeError::AcquisitionAborted(
                AbortReason::LegacyZeroSentinel
            ))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SessionConfig {
            amber_threshold: -1.0,
            ..SessionConfig::default()
        };
        let result = Session::start(VehicleCounts::new([1, 2, 3, 4]).into(), config);
        assert!(matches!(result, Err(RuntimeError::InvalidConfig(_))));

        let config = SessionConfig {
            timing: TimingConfig {
                min_green: 50.0,
                ..TimingConfig::default()
            },
            ..SessionConfig::default()
        };
        let result = Session::start(VehicleCounts::new([1, 2, 3, 4]).into(), config);
        assert!(matches!(
            result,
            Err(RuntimeError::Signal(SignalError::InvalidTiming(_)))
        ));
    }

    #[test]
    fn test_session_start_state() {
        let session = scenario_b();
        assert_eq!(session.durations().as_array(), &[15.0, 5.0, 15.0, 5.0]);

        let q = session.query();
        assert_eq!(q.active_direction, Direction::North);
        assert_eq!(q.display_remaining, 15.0);
        assert_eq!(q.total_vehicles, 24);
        assert_eq!(session.board().snapshot(), q);
    }

    #[test]
    fn test_one_cycle_at_30hz() {
        let mut session = scenario_b();
        let mut clock = FixedStepClock::from_rate(30.0);

        let changes = session.run_ticks(1200, &mut clock);

        assert_eq!(changes.len(), 4);
        assert!(changes[3].cycle_completed);
        let q = session.query();
        assert_eq!(q.cycles_completed, 1);
        assert_eq!(q.active_direction, Direction::North);

        let stats = session.stats();
        assert_eq!(stats.ticks, 1200);
        assert_eq!(stats.phase_changes, 4);
        assert_eq!(stats.oversized_steps, 0);
        assert!((stats.elapsed - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_board_tracks_ticks() {
        let mut session = scenario_b();
        let board = session.board();

        session.step(15.0);

        let snap = board.snapshot();
        assert_eq!(snap.active_direction, Direction::East);
        assert_eq!(snap.display_remaining, 5.0);
        assert_eq!(board.versioned().0, 1);
    }

    #[test]
    fn test_oversized_steps_counted() {
        let mut session = scenario_b();
        session.step(6.0);
        session.step(0.1);
        session.step(0.0);

        let stats = session.stats();
        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.oversized_steps, 1);
        assert_eq!(stats.phase_changes, 0);
    }

    #[test]
    fn test_run_until_cycles() {
        let mut session = scenario_b();
        let mut clock = session.config().fixed_clock();

        let ran = session.run_until_cycles(2, &mut clock, 10_000);

        assert_eq!(ran, 2400);
        assert_eq!(session.query().cycles_completed, 2);
    }

    #[test]
    fn test_view_follows_phase() {
        let mut session = scenario_b();
        session.step(12.5);

        let view = session.view();
        assert_eq!(view.aspect(Direction::North).color, LightColor::Amber);
        assert_eq!(view.aspect(Direction::East).color, LightColor::Red);
        assert_eq!(view.aspect(Direction::East).countdown, 5.0);
    }
}
