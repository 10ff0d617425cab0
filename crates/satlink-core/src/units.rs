//! Unit conversions and physical constants
//!
//! All frequencies are carried in Hz internally; helpers here convert from the
//! MHz/GHz values that appear in configuration files and on the command line.

use crate::error::{ensure_finite, require_positive, LinkResult};

/// Boltzmann's constant expressed as a gain term in dBW/K/Hz
/// (`-10*log10(1.380649e-23)`).
pub const BOLTZMANN_DBW_K_HZ: f64 = 228.6;

/// Speed of light in m/s.
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Offset between dBW and dBm.
pub const DBW_TO_DBM_OFFSET: f64 = 30.0;

/// Convert power in watts to dBW.
///
/// Fails for non-positive power, where the logarithm is undefined.
pub fn watts_to_dbw(watts: f64) -> LinkResult<f64> {
    let watts = require_positive("power_w", watts)?;
    ensure_finite("power_dbw", 10.0 * watts.log10())
}

/// Convert dBW back to watts.
pub fn dbw_to_watts(dbw: f64) -> f64 {
    10.0_f64.powf(dbw / 10.0)
}

/// Convert dBW to dBm.
pub fn dbw_to_dbm(dbw: f64) -> f64 {
    dbw + DBW_TO_DBM_OFFSET
}

/// `10*log10(x)` for a named positive quantity.
pub fn to_db(field: &'static str, value: f64) -> LinkResult<f64> {
    let value = require_positive(field, value)?;
    Ok(10.0 * value.log10())
}

/// MHz to Hz.
pub fn mhz_to_hz(mhz: f64) -> f64 {
    mhz * 1e6
}

/// Hz to MHz.
pub fn hz_to_mhz(hz: f64) -> f64 {
    hz / 1e6
}

/// Hz to GHz.
pub fn hz_to_ghz(hz: f64) -> f64 {
    hz / 1e9
}

/// Kilometres to metres.
pub fn km_to_m(km: f64) -> f64 {
    km * 1e3
}

/// Free-space wavelength in metres for a carrier in Hz.
pub fn wavelength_m(frequency_hz: f64) -> LinkResult<f64> {
    let f = require_positive("frequency_hz", frequency_hz)?;
    Ok(SPEED_OF_LIGHT_M_S / f)
}
