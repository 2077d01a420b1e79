//! Intersection Simulator - drives a full session under an imperfect loop
//!
//! Simulates:
//! - Render loops whose frame time jitters around the nominal rate
//! - Loop clocks that drift fast or slow against wall time
//! - Dropped frames that deliver a doubled delta
//! - Per-direction green time actually served versus allocated

use junction_core::{Acquisition, Direction, VehicleCounts, DIRECTION_COUNT};
use junction_runtime::{RuntimeResult, Session, SessionConfig};
use junction_scheduler::{PhaseChange, SignalBoard};
use junction_timing::TickClock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Frame timing model for a simulated render loop
#[derive(Clone, Debug)]
pub struct FrameJitterModel {
    /// Nominal frame rate (Hz)
    pub rate_hz: f64,
    /// Relative jitter per frame (0.1 = ±10%)
    pub jitter: f64,
    /// Probability that a frame is dropped and the next delta doubles
    pub drop_probability: f64,
    /// Drift rate (1.0 = perfect, >1.0 = fast, <1.0 = slow)
    pub drift_rate: f64,
}

impl FrameJitterModel {
    pub fn new(rate_hz: f64, jitter: f64, drop_probability: f64) -> Self {
        FrameJitterModel {
            rate_hz,
            jitter: jitter.clamp(0.0, 0.9),
            drop_probability: drop_probability.clamp(0.0, 1.0),
            drift_rate: 1.0,
        }
    }

    /// Same model with every frame scaled by `drift_rate`
    pub fn with_drift(mut self, drift_rate: f64) -> Self {
        self.drift_rate = drift_rate.clamp(0.5, 2.0);
        self
    }

    /// Perfect 30 Hz loop
    pub fn steady() -> Self {
        Self::new(30.0, 0.0, 0.0)
    }

    /// 30 Hz with ±25% frame time noise
    pub fn jittery() -> Self {
        Self::new(30.0, 0.25, 0.0)
    }

    /// 30 Hz that regularly drops frames
    pub fn stuttering() -> Self {
        Self::new(30.0, 0.1, 0.05)
    }

    /// Slightly fast loop clock
    pub fn fast() -> Self {
        Self::new(30.0, 0.05, 0.0).with_drift(1.001)
    }

    /// Slightly slow loop clock
    pub fn slow() -> Self {
        Self::new(30.0, 0.05, 0.0).with_drift(0.999)
    }

    /// Largest delta this model can produce
    pub fn max_step(&self) -> f64 {
        2.0 * self.drift_rate * (1.0 + self.jitter) / self.rate_hz
    }
}

/// Seeded clock following a [`FrameJitterModel`]
pub struct JitteryClock {
    model: FrameJitterModel,
    rng: StdRng,
    elapsed: f64,
    ticks: u64,
}

impl JitteryClock {
    pub fn new(model: FrameJitterModel, seed: u64) -> Self {
        JitteryClock {
            model,
            rng: StdRng::seed_from_u64(seed),
            elapsed: 0.0,
            ticks: 0,
        }
    }

    pub fn model(&self) -> &FrameJitterModel {
        &self.model
    }

    /// Seconds reported beyond (or short of) the nominal frame schedule
    pub fn accumulated_drift(&self) -> f64 {
        self.elapsed - self.ticks as f64 / self.model.rate_hz
    }
}

impl TickClock for JitteryClock {
    fn tick(&mut self) -> f64 {
        let nominal = 1.0 / self.model.rate_hz;
        let noise = if self.model.jitter > 0.0 {
            self.rng.gen_range(-self.model.jitter..=self.model.jitter)
        } else {
            0.0
        };
        let mut dt = nominal * self.model.drift_rate * (1.0 + noise);

        if self.model.drop_probability > 0.0 && self.rng.gen_bool(self.model.drop_probability) {
            dt *= 2.0;
        }

        self.elapsed += dt;
        self.ticks += 1;
        dt
    }

    fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// One logged handover
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseRecord {
    pub tick: u64,
    /// Simulated seconds at the handover
    pub at: f64,
    pub change: PhaseChange,
}

/// Full session under a simulated loop
pub struct IntersectionSimulator {
    session: Session,
    clock: JitteryClock,
    log: Vec<PhaseRecord>,
    served: [f64; DIRECTION_COUNT],
    max_delta: f64,
}

impl IntersectionSimulator {
    /// Create a simulator with default session configuration
    pub fn new(
        counts: [u64; DIRECTION_COUNT],
        model: FrameJitterModel,
        seed: u64,
    ) -> RuntimeResult<Self> {
        Self::with_config(counts, model, seed, SessionConfig::default())
    }

    pub fn with_config(
        counts: [u64; DIRECTION_COUNT],
        model: FrameJitterModel,
        seed: u64,
        config: SessionConfig,
    ) -> RuntimeResult<Self> {
        let session = Session::start(Acquisition::Counts(VehicleCounts::new(counts)), config)?;
        Ok(IntersectionSimulator {
            session,
            clock: JitteryClock::new(model, seed),
            log: Vec::new(),
            served: [0.0; DIRECTION_COUNT],
            max_delta: 0.0,
        })
    }

    /// Run for `seconds` of simulated time
    pub fn run(&mut self, seconds: f64) -> SimulationReport {
        let start = self.clock.elapsed();
        while self.clock.elapsed() - start < seconds {
            self.tick();
        }
        self.report()
    }

    /// Run until `cycles` cycles have completed (bounded by `max_ticks`)
    pub fn run_cycles(&mut self, cycles: u64, max_ticks: u64) -> SimulationReport {
        let mut ran = 0;
        while ran < max_ticks && self.session.query().cycles_completed < cycles {
            self.tick();
            ran += 1;
        }
        self.report()
    }

    fn tick(&mut self) {
        let serving = self.session.query().active_direction;
        let dt = self.clock.tick();
        self.max_delta = self.max_delta.max(dt);

        // Time up to the handover belongs to the phase being served
        let change = self.session.step(dt);
        let served = match &change {
            Some(c) => dt - c.overshoot,
            None => dt,
        };
        self.served[serving.index()] += served;

        if let Some(change) = change {
            self.log.push(PhaseRecord {
                tick: self.session.stats().ticks,
                at: self.clock.elapsed(),
                change,
            });
        }
    }

    /// Summary of everything run so far
    pub fn report(&self) -> SimulationReport {
        let stats = self.session.stats();
        SimulationReport {
            total_ticks: stats.ticks,
            cycles_completed: self.session.query().cycles_completed,
            phase_log: self.log.clone(),
            served: self.served,
            allocated: *self.session.durations().as_array(),
            max_delta: self.max_delta,
            oversized_steps: stats.oversized_steps,
            discarded_overshoot: stats.discarded_overshoot,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn clock(&self) -> &JitteryClock {
        &self.clock
    }

    /// Reader handle for concurrent observers
    pub fn board(&self) -> SignalBoard {
        self.session.board()
    }
}

/// Simulation result and statistics
#[derive(Clone, Debug, Default)]
pub struct SimulationReport {
    pub total_ticks: u64,
    pub cycles_completed: u64,
    pub phase_log: Vec<PhaseRecord>,
    /// Seconds of green each direction actually received
    pub served: [f64; DIRECTION_COUNT],
    /// Seconds of green each direction was allocated per cycle
    pub allocated: [f64; DIRECTION_COUNT],
    pub max_delta: f64,
    pub oversized_steps: u64,
    pub discarded_overshoot: f64,
}

impl SimulationReport {
    /// Directions in the order they received priority, starting with North
    pub fn service_order(&self) -> Vec<Direction> {
        let mut order = vec![Direction::North];
        order.extend(self.phase_log.iter().map(|r| r.change.to));
        order
    }

    /// True if every handover went to the next direction in cyclic order
    pub fn is_cyclic(&self) -> bool {
        self.service_order().windows(2).all(|w| w[1] == w[0].next())
    }

    /// Fraction of served green time given to `direction`
    pub fn green_share(&self, direction: Direction) -> f64 {
        let total: f64 = self.served.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.served[direction.index()] / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_loop_one_cycle() {
        let mut sim =
            IntersectionSimulator::new([10, 2, 10, 2], FrameJitterModel::steady(), 1).unwrap();
        let report = sim.run_cycles(1, 10_000);

        assert_eq!(report.total_ticks, 1200);
        assert_eq!(report.cycles_completed, 1);
        assert_eq!(report.phase_log.len(), 4);
        assert!(report.is_cyclic());
        assert_eq!(report.oversized_steps, 0);

        let ticks: Vec<u64> = report.phase_log.iter().map(|r| r.tick).collect();
        assert_eq!(ticks, vec![450, 600, 1050, 1200]);
    }

    #[test]
    fn test_served_time_matches_allocation() {
        let mut sim =
            IntersectionSimulator::new([10, 2, 10, 2], FrameJitterModel::jittery(), 7).unwrap();
        let report = sim.run_cycles(3, 100_000);

        assert_eq!(report.cycles_completed, 3);
        for d in Direction::ALL {
            let expected = report.allocated[d.index()] * 3.0;
            // Overshoot is never counted as served time
            assert!((report.served[d.index()] - expected).abs() < 3.0 * report.max_delta);
        }
    }

    #[test]
    fn test_stuttering_loop_stays_cyclic() {
        let mut sim =
            IntersectionSimulator::new([14, 3, 14, 3], FrameJitterModel::stuttering(), 42).unwrap();
        let report = sim.run(600.0);

        assert!(report.is_cyclic());
        assert!(report.max_delta < 5.0);
        assert_eq!(report.oversized_steps, 0);
        assert!(report.cycles_completed >= 11);
    }

    #[test]
    fn test_same_seed_same_log() {
        let run = |seed| {
            let mut sim =
                IntersectionSimulator::new([5, 9, 1, 20], FrameJitterModel::stuttering(), seed)
                    .unwrap();
            sim.run(120.0).phase_log
        };

        assert_eq!(run(3), run(3));
    }

    #[test]
    fn test_green_share_follows_counts() {
        let mut sim =
            IntersectionSimulator::new([14, 3, 14, 3], FrameJitterModel::steady(), 0).unwrap();
        let report = sim.run_cycles(2, 100_000);

        // 20s : 5s : 20s : 5s
        assert!((report.green_share(Direction::North) - 0.4).abs() < 0.01);
        assert!((report.green_share(Direction::East) - 0.1).abs() < 0.01);
    }

    #[test]
    fn test_fast_clock_shortens_the_cycle_in_ticks() {
        let model = FrameJitterModel::steady().with_drift(1.25);
        let mut sim = IntersectionSimulator::new([10, 2, 10, 2], model, 0).unwrap();
        let report = sim.run_cycles(1, 10_000);

        // 1.25 × 1/30 s = 1/24 s per frame, 40 s cycle
        assert!((959..=961).contains(&report.total_ticks));
        assert!(report.is_cyclic());

        // 40 s fed to the scheduler against 32 s of nominal frames
        assert!((sim.clock().accumulated_drift() - 8.0).abs() < 0.1);
    }

    #[test]
    fn test_drift_presets() {
        let mut fast = JitteryClock::new(FrameJitterModel::fast(), 5);
        let mut slow = JitteryClock::new(FrameJitterModel::slow(), 5);
        for _ in 0..30_000 {
            fast.tick();
            slow.tick();
        }

        assert!(fast.accumulated_drift() > 0.0);
        assert!(slow.accumulated_drift() < 0.0);
        assert_eq!(FrameJitterModel::steady().with_drift(10.0).drift_rate, 2.0);
    }

    #[test]
    fn test_jitter_model_bounds() {
        let model = FrameJitterModel::stuttering();
        let mut clock = JitteryClock::new(model.clone(), 9);
        for _ in 0..10_000 {
            let dt = clock.tick();
            assert!(dt > 0.0);
            assert!(dt <= model.max_step() + 1e-12);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn any_loop_serves_in_cyclic_order(
                counts in prop::array::uniform4(1u64..20),
                seed in any::<u64>(),
            ) {
                let mut sim =
                    IntersectionSimulator::new(counts, FrameJitterModel::stuttering(), seed).unwrap();
                let report = sim.run_cycles(2, 100_000);

                prop_assert_eq!(report.cycles_completed, 2);
                prop_assert_eq!(report.phase_log.len(), 8);
                prop_assert!(report.is_cyclic());
                prop_assert_eq!(report.oversized_steps, 0);
            }
        }
    }
}
