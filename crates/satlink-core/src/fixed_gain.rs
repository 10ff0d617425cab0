//! Fixed-gain link budget.
//!
//! A coarser budget for early sizing: antenna gains are given directly in dBi
//! and all pointing, line and absorption losses are lumped into one
//! `system_losses_db` term.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_finite, require_finite, require_positive, LinkResult};
use crate::propagation::space_loss_db;
use crate::units::{dbw_to_dbm, to_db, wavelength_m, watts_to_dbw, BOLTZMANN_DBW_K_HZ};

/// Inputs for a fixed-gain budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedGainLinkConfig {
    /// Carrier frequency in Hz.
    pub frequency_hz: f64,
    /// Transmitter power in W.
    pub tx_power_w: f64,
    /// Transmit antenna gain in dBi.
    pub tx_antenna_gain_dbi: f64,
    /// Slant range in km.
    pub path_length_km: f64,
    /// Lumped system losses in dB (negative).
    pub system_losses_db: f64,
    /// Receive antenna gain in dBi.
    pub rx_antenna_gain_dbi: f64,
    /// System noise temperature in K.
    pub system_noise_temp_k: f64,
    /// Data rate in bits per second.
    pub data_rate_bps: f64,
    /// Required Eb/No in dB.
    pub required_eb_no_db: f64,
}

impl Default for FixedGainLinkConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 2.2e9,
            tx_power_w: 5.6,
            tx_antenna_gain_dbi: 0.0, // omni patch
            path_length_km: 2.569e3,
            system_losses_db: -5.0,
            rx_antenna_gain_dbi: 40.0,
            system_noise_temp_k: 250.0,
            data_rate_bps: 5e6,
            required_eb_no_db: 9.6,
        }
    }
}

/// Result of a fixed-gain budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixedGainLinkResult {
    /// Carrier wavelength in metres.
    pub wavelength_m: f64,
    /// Transmitter power in dBW.
    pub tx_power_dbw: f64,
    /// Transmitter power in dBm.
    pub tx_power_dbm: f64,
    /// EIRP in dBW.
    pub eirp_dbw: f64,
    /// Space loss in dB (negative).
    pub space_loss_db: f64,
    /// Received Eb/No in dB.
    pub eb_no_db: f64,
    /// Carrier-to-noise-density ratio in dB-Hz.
    pub c_no_db_hz: f64,
    /// Eb/No minus requirement in dB.
    pub link_margin_db: f64,
    /// Margin is non-negative.
    pub link_closes: bool,
}

impl FixedGainLinkConfig {
    /// Check every input against its physical domain.
    pub fn validate(&self) -> LinkResult<()> {
        require_positive("frequency_hz", self.frequency_hz)?;
        require_positive("tx_power_w", self.tx_power_w)?;
        require_finite("tx_antenna_gain_dbi", self.tx_antenna_gain_dbi)?;
        require_positive("path_length_km", self.path_length_km)?;
        require_finite("system_losses_db", self.system_losses_db)?;
        require_finite("rx_antenna_gain_dbi", self.rx_antenna_gain_dbi)?;
        require_positive("system_noise_temp_k", self.system_noise_temp_k)?;
        require_positive("data_rate_bps", self.data_rate_bps)?;
        require_finite("required_eb_no_db", self.required_eb_no_db)?;
        Ok(())
    }

    /// Evaluate the budget.
    pub fn compute(&self) -> LinkResult<FixedGainLinkResult> {
        self.validate()?;

        let wavelength_m = wavelength_m(self.frequency_hz)?;
        let tx_power_dbw = watts_to_dbw(self.tx_power_w)?;
        let eirp_dbw = ensure_finite("eirp_dbw", tx_power_dbw + self.tx_antenna_gain_dbi)?;
        let space_loss_db = space_loss_db(self.path_length_km, self.frequency_hz)?;

        let rate_db = to_db("data_rate_bps", self.data_rate_bps)?;
        let temp_db = to_db("system_noise_temp_k", self.system_noise_temp_k)?;
        let eb_no_db = ensure_finite(
            "eb_no_db",
            eirp_dbw
                + space_loss_db
                + self.system_losses_db
                + self.rx_antenna_gain_dbi
                + BOLTZMANN_DBW_K_HZ
                - rate_db
                - temp_db,
        )?;
        let c_no_db_hz = ensure_finite("c_no_db_hz", eb_no_db + rate_db)?;
        let link_margin_db = ensure_finite("link_margin_db", eb_no_db - self.required_eb_no_db)?;

        debug!(eirp_dbw, space_loss_db, eb_no_db, link_margin_db, "fixed-gain budget");

        Ok(FixedGainLinkResult {
            wavelength_m,
            tx_power_dbw,
            tx_power_dbm: dbw_to_dbm(tx_power_dbw),
            eirp_dbw,
            space_loss_db,
            eb_no_db,
            c_no_db_hz,
            link_margin_db,
            link_closes: link_margin_db >= 0.0,
        })
    }
}
