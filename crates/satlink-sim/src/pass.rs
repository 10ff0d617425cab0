//! Ground-station pass planning.
//!
//! Runs the buffer simulator over one pass and scales the downlinked volume
//! to the number of passes needed to clear a data backlog.

use serde::Serialize;
use tracing::{debug, warn};

use satlink_core::error::{require_positive, LinkResult};
use satlink_core::{BufferConfig, PassConfig};

use crate::buffer::{BufferDrainSimulator, BufferTrace};

/// Outcome of planning a backlog against a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassPlan {
    /// Bits sent over the downlink during one pass.
    pub bits_per_pass: f64,
    /// Backlog to clear, bits.
    pub data_to_downlink_bits: f64,
    /// Passes needed to clear the backlog, `None` if nothing drains.
    pub passes_required: Option<u64>,
    /// Buffer occupancy at the end of the pass, bits.
    pub final_occupancy_bits: f64,
    /// Time into the pass at which the buffer emptied, if it did.
    pub emptied_at_s: Option<f64>,
}

/// Simulate one pass of `pass.pass_duration_s` with the given buffer and
/// size the backlog against it.
pub fn plan_passes(
    buffer: &BufferConfig,
    pass: &PassConfig,
) -> LinkResult<(PassPlan, BufferTrace)> {
    let backlog = require_positive("pass.data_to_downlink_bits", pass.data_to_downlink_bits)?;
    let duration = require_positive("pass.pass_duration_s", pass.pass_duration_s)?;

    let sim = BufferDrainSimulator::new(BufferConfig {
        duration_s: duration,
        ..buffer.clone()
    })?;
    let trace = sim.run();
    let bits_per_pass = trace.downlinked_bits();

    let passes_required = if bits_per_pass > 0.0 {
        Some((backlog / bits_per_pass).ceil() as u64)
    } else {
        warn!("no data leaves the buffer during a pass");
        None
    };

    let plan = PassPlan {
        bits_per_pass,
        data_to_downlink_bits: backlog,
        passes_required,
        final_occupancy_bits: trace.final_bits(),
        emptied_at_s: trace.time_to_empty_s(),
    };
    debug!(bits_per_pass, passes = ?plan.passes_required, "pass plan");

    Ok((plan, trace))
}
