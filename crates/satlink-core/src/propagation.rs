//! Propagation losses: free-space (space) loss and atmospheric absorption.
//!
//! Both terms are expressed the way the link equation consumes them: space
//! loss is a negative number added to the budget, atmospheric loss is summed
//! from the slant-path zenith attenuation plus fixed polarisation and radome
//! terms.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{
    ensure_finite, require_finite, require_non_negative, require_positive, LinkError, LinkResult,
};
use crate::units::km_to_m;

/// Space loss intercept: L_s = 147.55 − 20·log10(d_m) − 20·log10(f_Hz).
const SPACE_LOSS_INTERCEPT_DB: f64 = 147.55;

/// Space loss in dB (negative) for a path length in km and carrier in Hz.
///
/// ```rust
/// use satlink_core::propagation::space_loss_db;
///
/// let ls = space_loss_db(2_569.0, 2.245e9).unwrap();
/// assert!((ls + 167.67).abs() < 0.01);
/// ```
pub fn space_loss_db(path_length_km: f64, frequency_hz: f64) -> LinkResult<f64> {
    let km = require_positive("path_length_km", path_length_km)?;
    let f = require_positive("frequency_hz", frequency_hz)?;
    let d_m = km_to_m(km);
    ensure_finite(
        "space_loss_db",
        SPACE_LOSS_INTERCEPT_DB - 20.0 * d_m.log10() - 20.0 * f.log10(),
    )
}

/// How `min_elevation_deg` is handed to the sine in the slant-path term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationConvention {
    /// Treat the elevation as degrees and convert to radians before `sin`.
    #[default]
    Degrees,
    /// Pass the configured number straight to `sin` as radians. Reproduces
    /// spreadsheets that forgot the conversion; 10 "degrees" then yields a
    /// negative slant factor.
    LiteralRadians,
}

/// Atmospheric and ground-segment absorption terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Atmosphere {
    /// Zenith attenuation in dB.
    pub zenith_attenuation_db: f64,
    /// Minimum operational elevation angle.
    pub min_elevation_deg: f64,
    /// Polarisation mismatch loss in dB.
    pub polarisation_loss_db: f64,
    /// Radome loss in dB.
    pub radome_loss_db: f64,
    /// Interpretation of `min_elevation_deg`.
    pub elevation_convention: ElevationConvention,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            zenith_attenuation_db: 1e-2,
            min_elevation_deg: 10.0,
            polarisation_loss_db: 0.3,
            radome_loss_db: 1.0,
            elevation_convention: ElevationConvention::Degrees,
        }
    }
}

impl Atmosphere {
    /// Check inputs without evaluating the loss.
    pub fn validate(&self) -> LinkResult<()> {
        require_non_negative("atmosphere.zenith_attenuation_db", self.zenith_attenuation_db)?;
        require_finite("atmosphere.polarisation_loss_db", self.polarisation_loss_db)?;
        require_finite("atmosphere.radome_loss_db", self.radome_loss_db)?;
        match self.elevation_convention {
            ElevationConvention::Degrees => {
                let el = self.min_elevation_deg;
                if !(el.is_finite() && el > 0.0 && el <= 90.0) {
                    return Err(LinkError::InvalidParameter {
                        field: "atmosphere.min_elevation_deg",
                        value: el,
                        reason: "elevation must lie in (0, 90] degrees",
                    });
                }
            }
            ElevationConvention::LiteralRadians => {
                require_finite("atmosphere.min_elevation_deg", self.min_elevation_deg)?;
            }
        }
        Ok(())
    }

    /// Sine argument in radians under the configured convention.
    pub fn elevation_rad(&self) -> f64 {
        match self.elevation_convention {
            ElevationConvention::Degrees => self.min_elevation_deg * PI / 180.0,
            ElevationConvention::LiteralRadians => self.min_elevation_deg,
        }
    }

    /// L_a = zenith / sin(elevation) + polarisation + radome, in dB.
    pub fn loss_db(&self) -> LinkResult<f64> {
        self.validate()?;
        let sin_el = self.elevation_rad().sin();
        if sin_el == 0.0 {
            return Err(LinkError::NumericDomainError {
                quantity: "atmospheric_loss_db",
                value: f64::INFINITY,
            });
        }
        ensure_finite(
            "atmospheric_loss_db",
            self.zenith_attenuation_db / sin_el + self.polarisation_loss_db + self.radome_loss_db,
        )
    }
}
