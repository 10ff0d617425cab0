//! Parabolic Antenna Approximations
//!
//! Beamwidth, peak gain and pointing loss for the transmit and receive
//! antennas, using the small-dish approximations from *Space Mission Analysis
//! and Design* (eqs. 13-19 to 13-21).
//!
//! ```rust
//! use satlink_core::antenna::{beamwidth_deg, pointing_loss_db};
//!
//! // 2.5 m dish at 2245 MHz
//! let theta = beamwidth_deg(2.245e9, 2.5).unwrap();
//! assert!((theta - 3.74).abs() < 0.01);
//!
//! // Auto-tracking to 10% of the beamwidth costs 0.12 dB
//! let loss = pointing_loss_db(0.1 * theta, theta).unwrap();
//! assert!((loss + 0.12).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{
    ensure_finite, require_non_negative, require_positive, require_unit_fraction, LinkError,
    LinkResult,
};
use crate::units::hz_to_ghz;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Beamwidth constant: θ[deg] = 21 / (f[GHz] · D[m]).
const BEAMWIDTH_CONSTANT: f64 = 21.0;

/// Peak gain intercept for the beamwidth form: G = 44.3 − 10·log10(θ).
const BEAMWIDTH_GAIN_INTERCEPT_DB: f64 = 44.3;

/// Aperture gain intercept: G = −159.59 + 20·log10(D) + 20·log10(f) + 20·log10(η).
const APERTURE_GAIN_INTERCEPT_DB: f64 = -159.59;

/// Pointing loss coefficient: L = −12·(e/θ)².
const POINTING_LOSS_COEFFICIENT: f64 = 12.0;

// ---------------------------------------------------------------------------
// Antenna descriptions
// ---------------------------------------------------------------------------

/// How the receive antenna pointing error is specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum PointingError {
    /// Absolute pointing error in degrees.
    Degrees(f64),
    /// Pointing error as a fraction of the antenna's own beamwidth
    /// (an auto-tracking ground station holds roughly 0.1).
    BeamwidthFraction(f64),
}

impl PointingError {
    /// Resolve to degrees for an antenna of the given beamwidth.
    pub fn resolve_deg(&self, beamwidth_deg: f64) -> LinkResult<f64> {
        match *self {
            PointingError::Degrees(deg) => require_non_negative("rx_pointing_error_deg", deg),
            PointingError::BeamwidthFraction(fraction) => {
                let fraction = require_non_negative("rx_pointing_fraction", fraction)?;
                Ok(fraction * beamwidth_deg)
            }
        }
    }
}

impl Default for PointingError {
    fn default() -> Self {
        PointingError::BeamwidthFraction(0.1)
    }
}

/// Spacecraft (transmit) antenna.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmitAntenna {
    /// Dish diameter in metres.
    pub diameter_m: f64,
    /// Maximum boresight offset from the ground station in degrees.
    pub pointing_offset_deg: f64,
}

impl Default for TransmitAntenna {
    fn default() -> Self {
        Self {
            diameter_m: 0.1,
            pointing_offset_deg: 27.0,
        }
    }
}

impl TransmitAntenna {
    /// Check the antenna inputs without evaluating any formula.
    pub fn validate(&self) -> LinkResult<()> {
        require_positive("tx_antenna.diameter_m", self.diameter_m)?;
        require_non_negative("tx_antenna.pointing_offset_deg", self.pointing_offset_deg)?;
        Ok(())
    }

    /// Evaluate the transmit antenna at `frequency_hz` using the
    /// beamwidth-based peak gain.
    pub fn budget(&self, frequency_hz: f64) -> LinkResult<AntennaBudget> {
        self.validate()?;
        let beamwidth = beamwidth_deg(frequency_hz, self.diameter_m)?;
        let peak_gain = beamwidth_peak_gain_dbi(beamwidth)?;
        AntennaBudget::assemble(beamwidth, self.pointing_offset_deg, peak_gain)
    }
}

/// Ground station (receive) antenna.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiveAntenna {
    /// Dish diameter in metres.
    pub diameter_m: f64,
    /// Aperture efficiency in (0, 1].
    pub efficiency: f64,
    /// Pointing error specification.
    pub pointing: PointingError,
}

impl Default for ReceiveAntenna {
    fn default() -> Self {
        Self {
            diameter_m: 2.5,
            efficiency: 0.55,
            pointing: PointingError::default(),
        }
    }
}

impl ReceiveAntenna {
    /// Check the antenna inputs without evaluating any formula.
    pub fn validate(&self) -> LinkResult<()> {
        require_positive("rx_antenna.diameter_m", self.diameter_m)?;
        require_unit_fraction("rx_antenna.efficiency", self.efficiency)?;
        match self.pointing {
            PointingError::Degrees(deg) => {
                require_non_negative("rx_antenna.pointing", deg)?;
            }
            PointingError::BeamwidthFraction(fraction) => {
                require_non_negative("rx_antenna.pointing", fraction)?;
            }
        }
        Ok(())
    }

    /// Evaluate the receive antenna at `frequency_hz` using the
    /// aperture-efficiency peak gain.
    pub fn budget(&self, frequency_hz: f64) -> LinkResult<AntennaBudget> {
        self.validate()?;
        let beamwidth = beamwidth_deg(frequency_hz, self.diameter_m)?;
        let pointing_error = self.pointing.resolve_deg(beamwidth)?;
        let peak_gain = aperture_peak_gain_dbi(self.diameter_m, frequency_hz, self.efficiency)?;
        AntennaBudget::assemble(beamwidth, pointing_error, peak_gain)
    }
}

/// Derived figures for one antenna.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AntennaBudget {
    /// Half-power beamwidth in degrees.
    pub beamwidth_deg: f64,
    /// Pointing error used for the loss term, degrees.
    pub pointing_error_deg: f64,
    /// Peak (boresight) gain in dBi.
    pub peak_gain_dbi: f64,
    /// Pointing loss in dB (never positive).
    pub pointing_loss_db: f64,
    /// Peak gain plus pointing loss, dBi.
    pub net_gain_dbi: f64,
}

impl AntennaBudget {
    fn assemble(beamwidth: f64, pointing_error: f64, peak_gain: f64) -> LinkResult<Self> {
        let pointing_loss = pointing_loss_db(pointing_error, beamwidth)?;
        let net_gain = ensure_finite("net_gain_dbi", peak_gain + pointing_loss)?;
        Ok(Self {
            beamwidth_deg: beamwidth,
            pointing_error_deg: pointing_error,
            peak_gain_dbi: peak_gain,
            pointing_loss_db: pointing_loss,
            net_gain_dbi: net_gain,
        })
    }
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// Half-power beamwidth in degrees: θ = 21 / (f_GHz · D_m).
pub fn beamwidth_deg(frequency_hz: f64, diameter_m: f64) -> LinkResult<f64> {
    let f = require_positive("frequency_hz", frequency_hz)?;
    let d = require_positive("diameter_m", diameter_m)?;
    let theta = BEAMWIDTH_CONSTANT / (hz_to_ghz(f) * d);
    if theta.is_finite() && theta > 0.0 {
        Ok(theta)
    } else {
        Err(LinkError::InvalidParameter {
            field: "beamwidth_deg",
            value: theta,
            reason: "beamwidth must be finite and non-zero",
        })
    }
}

/// Peak gain in dBi from the beamwidth: G = 44.3 − 10·log10(θ).
pub fn beamwidth_peak_gain_dbi(beamwidth_deg: f64) -> LinkResult<f64> {
    if !(beamwidth_deg.is_finite() && beamwidth_deg > 0.0) {
        return Err(LinkError::InvalidParameter {
            field: "beamwidth_deg",
            value: beamwidth_deg,
            reason: "beamwidth must be finite and non-zero",
        });
    }
    ensure_finite(
        "peak_gain_dbi",
        BEAMWIDTH_GAIN_INTERCEPT_DB - 10.0 * beamwidth_deg.log10(),
    )
}

/// Peak gain in dBi from aperture and efficiency:
/// G = −159.59 + 20·log10(D) + 20·log10(f_Hz) + 20·log10(η).
pub fn aperture_peak_gain_dbi(
    diameter_m: f64,
    frequency_hz: f64,
    efficiency: f64,
) -> LinkResult<f64> {
    let d = require_positive("diameter_m", diameter_m)?;
    let f = require_positive("frequency_hz", frequency_hz)?;
    let eta = require_unit_fraction("efficiency", efficiency)?;
    ensure_finite(
        "peak_gain_dbi",
        APERTURE_GAIN_INTERCEPT_DB + 20.0 * d.log10() + 20.0 * f.log10() + 20.0 * eta.log10(),
    )
}

/// Pointing loss in dB: L = −12·(e/θ)². Zero for a perfectly pointed antenna.
pub fn pointing_loss_db(pointing_error_deg: f64, beamwidth_deg: f64) -> LinkResult<f64> {
    let e = require_non_negative("pointing_error_deg", pointing_error_deg)?;
    if !(beamwidth_deg.is_finite() && beamwidth_deg > 0.0) {
        return Err(LinkError::InvalidParameter {
            field: "beamwidth_deg",
            value: beamwidth_deg,
            reason: "beamwidth must be finite and non-zero",
        });
    }
    let ratio = e / beamwidth_deg;
    ensure_finite("pointing_loss_db", -POINTING_LOSS_COEFFICIENT * ratio * ratio)
}
