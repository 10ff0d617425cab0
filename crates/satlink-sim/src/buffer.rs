//! Onboard Buffer Drain Simulator
//!
//! Steps the occupancy of a fixed-capacity data buffer that the downlink
//! empties at a constant rate while the payload interface refills it at
//! another constant rate.
//!
//! ## Model
//!
//! ```text
//!            fill_rate                drain_rate
//! payload ─────────────►┌──────────┐─────────────► downlink
//!                       │  buffer  │
//!                       │ [0, cap] │
//!                       └──────────┘
//!
//! occ[0] = initial
//! occ[i] = clamp(occ[i-1] - drain*dt + fill*dt, 0, capacity)
//! ```
//!
//! The recurrence is deterministic and saturating: a buffer that hits either
//! bound stays there for as long as the net rate pushes it outward.

use serde::Serialize;
use tracing::debug;

use satlink_core::error::{
    ensure_finite, require_non_negative, require_positive, LinkError, LinkResult,
};
use satlink_core::BufferConfig;

/// Upper bound on the number of steps a single run may produce.
pub const MAX_STEPS: usize = 50_000_000;

/// Occupancy series produced by one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BufferTrace {
    /// Buffer capacity in bits.
    pub capacity_bits: f64,
    /// Time step in seconds.
    pub step_s: f64,
    /// Start time of each sample, seconds.
    pub times_s: Vec<f64>,
    /// Occupancy at each sample, bits.
    pub occupancy_bits: Vec<f64>,
    /// Bits sent over the downlink during each step (one fewer than samples).
    pub downlinked_per_step_bits: Vec<f64>,
}

impl BufferTrace {
    /// Number of samples in the trace.
    pub fn len(&self) -> usize {
        self.occupancy_bits.len()
    }

    /// Whether the trace holds no samples.
    pub fn is_empty(&self) -> bool {
        self.occupancy_bits.is_empty()
    }

    /// Occupancy at the final sample.
    pub fn final_bits(&self) -> f64 {
        self.occupancy_bits.last().copied().unwrap_or(0.0)
    }

    /// Time of the first sample at which the buffer is empty.
    pub fn time_to_empty_s(&self) -> Option<f64> {
        self.occupancy_bits
            .iter()
            .position(|&occ| occ <= 0.0)
            .map(|i| self.times_s[i])
    }

    /// Time of the first sample at which the buffer is full.
    pub fn time_to_full_s(&self) -> Option<f64> {
        self.occupancy_bits
            .iter()
            .position(|&occ| occ >= self.capacity_bits)
            .map(|i| self.times_s[i])
    }

    /// Total bits sent over the downlink across the run.
    pub fn downlinked_bits(&self) -> f64 {
        self.downlinked_per_step_bits.iter().sum()
    }
}

/// Buffer drain/refill simulator.
///
/// Wraps a validated [`BufferConfig`].
#[derive(Debug, Clone)]
pub struct BufferDrainSimulator {
    config: BufferConfig,
}

impl BufferDrainSimulator {
    /// Create a simulator, rejecting out-of-domain parameters.
    pub fn new(config: BufferConfig) -> LinkResult<Self> {
        validate(&config)?;
        Ok(Self { config })
    }

    /// The configuration this simulator runs.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Number of samples a run produces: `ceil(duration / step)`.
    pub fn num_steps(&self) -> usize {
        (self.config.duration_s / self.config.step_s).ceil() as usize
    }

    /// Run the simulation.
    pub fn run(&self) -> BufferTrace {
        let c = &self.config;
        let n = self.num_steps();
        let drain_per_step = c.drain_rate_bps * c.step_s;
        let fill_per_step = c.fill_rate_bps * c.step_s;

        let mut times_s = Vec::with_capacity(n);
        let mut occupancy_bits = Vec::with_capacity(n);
        let mut downlinked_per_step_bits = Vec::with_capacity(n.saturating_sub(1));

        let mut occ = c.initial_bits;
        times_s.push(0.0);
        occupancy_bits.push(occ);

        for i in 1..n {
            let available = occ + fill_per_step;
            downlinked_per_step_bits.push(drain_per_step.min(available));
            occ = (occ - drain_per_step + fill_per_step).clamp(0.0, c.capacity_bits);
            times_s.push(i as f64 * c.step_s);
            occupancy_bits.push(occ);
        }

        let trace = BufferTrace {
            capacity_bits: c.capacity_bits,
            step_s: c.step_s,
            times_s,
            occupancy_bits,
            downlinked_per_step_bits,
        };

        debug!(
            steps = trace.len(),
            final_bits = trace.final_bits(),
            empty_at_s = ?trace.time_to_empty_s(),
            full_at_s = ?trace.time_to_full_s(),
            "buffer simulation complete"
        );

        trace
    }

    /// Closed-form time to refill an empty buffer from the payload interface.
    pub fn refill_time_s(&self) -> LinkResult<f64> {
        refill_time_s(self.config.capacity_bits, self.config.fill_rate_bps)
    }
}

/// Closed-form refill time: `capacity / fill_rate` seconds.
pub fn refill_time_s(capacity_bits: f64, fill_rate_bps: f64) -> LinkResult<f64> {
    let capacity = require_positive("capacity_bits", capacity_bits)?;
    let fill = require_positive("fill_rate_bps", fill_rate_bps)?;
    ensure_finite("refill_time_s", capacity / fill)
}

/// Check a buffer configuration against its domain.
pub fn validate(config: &BufferConfig) -> LinkResult<()> {
    let capacity = require_positive("buffer.capacity_bits", config.capacity_bits)?;
    let drain = require_non_negative("buffer.drain_rate_bps", config.drain_rate_bps)?;
    let fill = require_non_negative("buffer.fill_rate_bps", config.fill_rate_bps)?;
    let initial = require_non_negative("buffer.initial_bits", config.initial_bits)?;
    if initial > capacity {
        return Err(LinkError::InvalidParameter {
            field: "buffer.initial_bits",
            value: initial,
            reason: "initial occupancy exceeds capacity",
        });
    }
    let duration = require_positive("buffer.duration_s", config.duration_s)?;
    let step = require_positive("buffer.step_s", config.step_s)?;
    if duration / step > MAX_STEPS as f64 {
        return Err(LinkError::InvalidParameter {
            field: "buffer.duration_s",
            value: duration,
            reason: "duration / step exceeds the step limit",
        });
    }
    // Both per-step volumes must be finite or `occ - inf + inf` turns into NaN.
    for (field, rate) in [("buffer.drain_rate_bps", drain), ("buffer.fill_rate_bps", fill)] {
        if !(rate * step).is_finite() {
            return Err(LinkError::InvalidParameter {
                field,
                value: rate,
                reason: "rate times step overflows",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn draining(duration_s: f64) -> BufferConfig {
        BufferConfig {
            duration_s,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_pass_length() {
        let sim = BufferDrainSimulator::new(BufferConfig::default()).unwrap();
        let trace = sim.run();
        assert_eq!(trace.len(), 480);
        assert_eq!(trace.occupancy_bits[0], 64e9);
        assert_eq!(trace.times_s[479], 479.0);
        // 100 Mbps net drain over 479 steps
        assert!(approx_eq(trace.final_bits(), 64e9 - 479.0 * 1e8, 1.0));
        assert_eq!(trace.time_to_empty_s(), None);
    }

    #[test]
    fn test_drains_strictly_then_clamps_at_zero() {
        let trace = BufferDrainSimulator::new(draining(700.0)).unwrap().run();
        let empty_idx = trace
            .occupancy_bits
            .iter()
            .position(|&b| b == 0.0)
            .expect("buffer should empty");
        assert_eq!(empty_idx, 640);

        for w in trace.occupancy_bits[..=empty_idx].windows(2) {
            assert!(w[1] < w[0], "not strictly decreasing: {} -> {}", w[0], w[1]);
        }
        assert!(trace.occupancy_bits[empty_idx..].iter().all(|&b| b == 0.0));
        assert_eq!(trace.time_to_empty_s(), Some(640.0));
    }

    #[test]
    fn test_fill_faster_than_drain_saturates() {
        let config = BufferConfig {
            drain_rate_bps: 0.5e9,
            fill_rate_bps: 0.9e9,
            initial_bits: 0.0,
            duration_s: 400.0,
            ..Default::default()
        };
        let trace = BufferDrainSimulator::new(config).unwrap().run();
        let full_idx = trace
            .occupancy_bits
            .iter()
            .position(|&b| b == 64e9)
            .expect("buffer should fill");

        for w in trace.occupancy_bits[..=full_idx].windows(2) {
            assert!(w[1] > w[0]);
        }
        assert!(trace.occupancy_bits.iter().all(|&b| b <= 64e9));
        assert!(trace.occupancy_bits[full_idx..].iter().all(|&b| b == 64e9));
    }

    #[test]
    fn test_values_always_within_bounds() {
        for (drain, fill) in [(1e9, 0.0), (0.0, 1e9), (3e9, 2.9e9), (2e9, 7e9)] {
            let config = BufferConfig {
                drain_rate_bps: drain,
                fill_rate_bps: fill,
                initial_bits: 10e9,
                duration_s: 200.0,
                ..Default::default()
            };
            let trace = BufferDrainSimulator::new(config).unwrap().run();
            assert!(trace
                .occupancy_bits
                .iter()
                .all(|&b| (0.0..=64e9).contains(&b)));
        }
    }

    #[test]
    fn test_refill_time_matches_simulation() {
        let config = BufferConfig {
            drain_rate_bps: 0.0,
            initial_bits: 0.0,
            duration_s: 200.0,
            ..Default::default()
        };
        let sim = BufferDrainSimulator::new(config).unwrap();
        let closed_form = sim.refill_time_s().unwrap();
        assert!(approx_eq(closed_form, 71.11, 0.01));

        let simulated = sim.run().time_to_full_s().unwrap();
        assert!(
            (simulated - closed_form).abs() <= 1.0,
            "simulated {simulated} vs closed form {closed_form}"
        );
    }

    #[test]
    fn test_fractional_step() {
        let config = BufferConfig {
            duration_s: 10.0,
            step_s: 0.25,
            ..Default::default()
        };
        let trace = BufferDrainSimulator::new(config).unwrap().run();
        assert_eq!(trace.len(), 40);
        assert!(approx_eq(trace.occupancy_bits[4], 64e9 - 1e8, 1.0));
    }

    #[test]
    fn test_downlinked_bits() {
        let trace = BufferDrainSimulator::new(BufferConfig::default()).unwrap().run();
        assert!(approx_eq(trace.downlinked_bits(), 479e9, 1.0));

        // Once empty, only the refill can go out
        let trace = BufferDrainSimulator::new(BufferConfig {
            initial_bits: 0.0,
            duration_s: 11.0,
            ..Default::default()
        })
        .unwrap()
        .run();
        assert!(approx_eq(trace.downlinked_bits(), 10.0 * 0.9e9, 1.0));
    }

    #[test]
    fn test_invalid_parameters() {
        let cases = [
            (
                BufferConfig {
                    capacity_bits: 0.0,
                    ..Default::default()
                },
                "buffer.capacity_bits",
            ),
            (
                BufferConfig {
                    drain_rate_bps: -1.0,
                    ..Default::default()
                },
                "buffer.drain_rate_bps",
            ),
            (
                BufferConfig {
                    initial_bits: 65e9,
                    ..Default::default()
                },
                "buffer.initial_bits",
            ),
            (
                BufferConfig {
                    duration_s: 0.0,
                    ..Default::default()
                },
                "buffer.duration_s",
            ),
            (
                BufferConfig {
                    step_s: 0.0,
                    ..Default::default()
                },
                "buffer.step_s",
            ),
            (
                BufferConfig {
                    duration_s: 1e12,
                    ..Default::default()
                },
                "buffer.duration_s",
            ),
        ];
        for (config, field) in cases {
            let err = BufferDrainSimulator::new(config).unwrap_err();
            assert_eq!(err.subject(), field);
        }
    }

    #[test]
    fn test_refill_time_requires_fill() {
        assert!(refill_time_s(64e9, 0.0).is_err());
    }

    #[test]
    fn test_refill_time_overflow_is_domain_error() {
        let err = refill_time_s(64e9, 1e-320).unwrap_err();
        assert!(!err.is_invalid_parameter());
        assert_eq!(err.subject(), "refill_time_s");
    }

    #[test]
    fn test_overflowing_step_volume_rejected() {
        let config = BufferConfig {
            drain_rate_bps: 1e308,
            fill_rate_bps: 1e308,
            step_s: 10.0,
            duration_s: 30.0,
            ..Default::default()
        };
        let err = BufferDrainSimulator::new(config).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert_eq!(err.subject(), "buffer.drain_rate_bps");

        let config = BufferConfig {
            fill_rate_bps: 1e308,
            step_s: 10.0,
            duration_s: 30.0,
            ..Default::default()
        };
        let err = BufferDrainSimulator::new(config).unwrap_err();
        assert_eq!(err.subject(), "buffer.fill_rate_bps");
    }

    #[test]
    fn test_huge_finite_rates_stay_within_bounds() {
        let config = BufferConfig {
            drain_rate_bps: 1e307,
            fill_rate_bps: 1e307,
            step_s: 10.0,
            duration_s: 30.0,
            ..Default::default()
        };
        let trace = BufferDrainSimulator::new(config).unwrap().run();
        assert!(trace
            .occupancy_bits
            .iter()
            .all(|&b| (0.0..=64e9).contains(&b)));
    }
}
