//! Satellite Downlink Budget
//!
//! Chains the transmit chain, propagation path and ground receiver into the
//! energy-per-bit to noise-density ratio and compares it against the
//! requirement for the chosen modulation and coding.
//!
//! ## Formula chain
//!
//! ```text
//! P_dBW ──┐
//! L_line ─┼─► EIRP ─┐
//! G_t,net ┘         │
//! L_s ──────────────┤
//! L_a ──────────────┼─► Eb/No ─► C/No
//! G_r,net, L_pr ────┤      │
//! k, R, T_s ────────┘      └─► margin ◄─ Eb/No_req + L_impl
//! ```
//!
//! Every stage is a pure function of the configuration; a failing stage
//! aborts the whole evaluation and no partial result is returned.
//!
//! ## Example
//!
//! ```rust
//! use satlink_core::link_budget::LinkBudgetConfig;
//!
//! let result = LinkBudgetConfig::default().compute().unwrap();
//! assert!(result.link_closes);
//! assert!((result.link_margin_db - 15.60).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::antenna::{AntennaBudget, ReceiveAntenna, TransmitAntenna};
use crate::error::{ensure_finite, require_finite, require_positive, LinkResult};
use crate::propagation::{space_loss_db, Atmosphere, ElevationConvention};
use crate::units::{dbw_to_dbm, to_db, watts_to_dbw, BOLTZMANN_DBW_K_HZ};

/// Margin the reference mission design aims to exceed, in dB.
pub const DESIGN_MARGIN_DB: f64 = 3.0;

// ---------------------------------------------------------------------------
// LinkBudgetConfig
// ---------------------------------------------------------------------------

/// Inputs for one downlink budget evaluation.
///
/// The default is an S-band space-operations downlink: a 20 W transmitter
/// on a 10 cm dish over a 2569 km slant range into a 2.5 m auto-tracking
/// ground station at 86 Mbps QPSK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkBudgetConfig {
    /// Carrier frequency in Hz.
    pub frequency_hz: f64,
    /// Transmitter RF output power in W.
    pub tx_power_w: f64,
    /// Transmitter line loss in dB (negative).
    pub tx_line_loss_db: f64,
    /// Spacecraft antenna.
    pub tx_antenna: TransmitAntenna,
    /// Slant range in km.
    pub path_length_km: f64,
    /// Absorption terms.
    pub atmosphere: Atmosphere,
    /// Ground station antenna.
    pub rx_antenna: ReceiveAntenna,
    /// Receiver system noise temperature in K.
    pub system_noise_temp_k: f64,
    /// Information data rate in bits per second.
    pub data_rate_bps: f64,
    /// Eb/No required for the target BER with the chosen modulation, dB.
    pub required_eb_no_db: f64,
    /// Implementation loss added on top of the requirement, dB.
    pub implementation_loss_db: f64,
    /// Target bit error rate the requirement was read off for.
    pub target_ber: f64,
}

impl Default for LinkBudgetConfig {
    fn default() -> Self {
        Self {
            // centre of 2200-2290 MHz SO band
            frequency_hz: 2_245e6,
            tx_power_w: 20.0,
            tx_line_loss_db: -1.0,
            tx_antenna: TransmitAntenna::default(),
            path_length_km: 2.569e3,
            atmosphere: Atmosphere::default(),
            rx_antenna: ReceiveAntenna::default(),
            system_noise_temp_k: 135.0,
            data_rate_bps: 86e6,
            // QPSK, BER 1e-5
            required_eb_no_db: 9.6,
            implementation_loss_db: 2.0,
            target_ber: 1e-5,
        }
    }
}

impl LinkBudgetConfig {
    /// Check every input against its physical domain.
    ///
    /// Runs before any formula so the first offending field is reported by
    /// name instead of surfacing as a NaN further down the chain.
    pub fn validate(&self) -> LinkResult<()> {
        require_positive("frequency_hz", self.frequency_hz)?;
        require_positive("tx_power_w", self.tx_power_w)?;
        require_finite("tx_line_loss_db", self.tx_line_loss_db)?;
        self.tx_antenna.validate()?;
        require_positive("path_length_km", self.path_length_km)?;
        self.atmosphere.validate()?;
        self.rx_antenna.validate()?;
        require_positive("system_noise_temp_k", self.system_noise_temp_k)?;
        require_positive("data_rate_bps", self.data_rate_bps)?;
        require_finite("required_eb_no_db", self.required_eb_no_db)?;
        require_finite("implementation_loss_db", self.implementation_loss_db)?;
        require_positive("target_ber", self.target_ber)?;
        Ok(())
    }

    /// Evaluate the full budget.
    pub fn compute(&self) -> LinkResult<LinkBudgetResult> {
        LinkBudgetCalculator::new(self.clone()).compute()
    }
}

// ---------------------------------------------------------------------------
// LinkBudgetResult
// ---------------------------------------------------------------------------

/// Every derived figure of one budget evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkBudgetResult {
    /// Transmitter power in dBW.
    pub tx_power_dbw: f64,
    /// Transmitter power in dBm.
    pub tx_power_dbm: f64,
    /// Spacecraft antenna figures.
    pub tx_antenna: AntennaBudget,
    /// Effective isotropic radiated power, dBW.
    pub eirp_dbw: f64,
    /// Space loss, dB (negative).
    pub space_loss_db: f64,
    /// Atmospheric, polarisation and radome losses, dB.
    pub atmospheric_loss_db: f64,
    /// Ground station antenna figures.
    pub rx_antenna: AntennaBudget,
    /// Received Eb/No, dB.
    pub eb_no_db: f64,
    /// Carrier-to-noise-density ratio, dB-Hz.
    pub c_no_db_hz: f64,
    /// Required Eb/No including implementation loss, dB.
    pub required_eb_no_db: f64,
    /// Eb/No minus requirement, dB.
    pub link_margin_db: f64,
    /// Margin is non-negative.
    pub link_closes: bool,
}

impl LinkBudgetResult {
    /// Whether the margin clears `threshold_db`.
    pub fn meets_design_margin(&self, threshold_db: f64) -> bool {
        self.link_margin_db > threshold_db
    }
}

// ---------------------------------------------------------------------------
// LinkBudgetCalculator
// ---------------------------------------------------------------------------

/// Downlink budget calculator.
///
/// Wraps a [`LinkBudgetConfig`] and evaluates the formula chain.
#[derive(Debug, Clone)]
pub struct LinkBudgetCalculator {
    config: LinkBudgetConfig,
}

impl LinkBudgetCalculator {
    /// Create a calculator from the given configuration.
    pub fn new(config: LinkBudgetConfig) -> Self {
        Self { config }
    }

    /// The configuration this calculator evaluates.
    pub fn config(&self) -> &LinkBudgetConfig {
        &self.config
    }

    /// Compute the budget and return every derived figure.
    pub fn compute(&self) -> LinkResult<LinkBudgetResult> {
        let c = &self.config;
        c.validate()?;

        if c.atmosphere.elevation_convention == ElevationConvention::LiteralRadians {
            warn!(
                min_elevation = c.atmosphere.min_elevation_deg,
                "elevation passed to sin() without degree conversion"
            );
        }

        let tx_power_dbw = watts_to_dbw(c.tx_power_w)?;
        let tx_power_dbm = dbw_to_dbm(tx_power_dbw);

        let tx_antenna = c.tx_antenna.budget(c.frequency_hz)?;
        let eirp_dbw = eirp_dbw(tx_power_dbw, c.tx_line_loss_db, &tx_antenna)?;
        debug!(
            tx_power_dbw,
            beamwidth_deg = tx_antenna.beamwidth_deg,
            net_gain_dbi = tx_antenna.net_gain_dbi,
            eirp_dbw,
            "transmit chain"
        );

        let space_loss_db = space_loss_db(c.path_length_km, c.frequency_hz)?;
        let atmospheric_loss_db = c.atmosphere.loss_db()?;
        debug!(space_loss_db, atmospheric_loss_db, "propagation");

        let rx_antenna = c.rx_antenna.budget(c.frequency_hz)?;
        debug!(
            beamwidth_deg = rx_antenna.beamwidth_deg,
            peak_gain_dbi = rx_antenna.peak_gain_dbi,
            net_gain_dbi = rx_antenna.net_gain_dbi,
            "receive antenna"
        );

        let rate_db = to_db("data_rate_bps", c.data_rate_bps)?;
        let temp_db = to_db("system_noise_temp_k", c.system_noise_temp_k)?;

        // The receive pointing loss enters a second time on top of the net
        // receive gain, matching the reference budget sheet.
        let eb_no_db = ensure_finite(
            "eb_no_db",
            eirp_dbw
                + rx_antenna.pointing_loss_db
                + space_loss_db
                + atmospheric_loss_db
                + rx_antenna.net_gain_dbi
                + BOLTZMANN_DBW_K_HZ
                - rate_db
                - temp_db,
        )?;
        let c_no_db_hz = ensure_finite("c_no_db_hz", eb_no_db + rate_db)?;

        let required_eb_no_db = ensure_finite(
            "required_eb_no_db",
            c.required_eb_no_db + c.implementation_loss_db,
        )?;
        let link_margin_db = ensure_finite("link_margin_db", eb_no_db - required_eb_no_db)?;
        let link_closes = link_margin_db >= 0.0;

        debug!(eb_no_db, c_no_db_hz, required_eb_no_db, link_margin_db, "link margin");
        if !link_closes {
            warn!(link_margin_db, "link does not close");
        }

        Ok(LinkBudgetResult {
            tx_power_dbw,
            tx_power_dbm,
            tx_antenna,
            eirp_dbw,
            space_loss_db,
            atmospheric_loss_db,
            rx_antenna,
            eb_no_db,
            c_no_db_hz,
            required_eb_no_db,
            link_margin_db,
            link_closes,
        })
    }
}

/// EIRP in dBW: transmitter power plus (negative) line loss plus net antenna gain.
pub fn eirp_dbw(tx_power_dbw: f64, line_loss_db: f64, antenna: &AntennaBudget) -> LinkResult<f64> {
    ensure_finite("eirp_dbw", tx_power_dbw + line_loss_db + antenna.net_gain_dbi)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antenna::PointingError;
    use crate::error::LinkError;

    const EPSILON: f64 = 0.01;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_reference_downlink() {
        let r = LinkBudgetConfig::default().compute().unwrap();
        assert!(approx_eq(r.tx_power_dbw, 13.01, EPSILON));
        assert!(approx_eq(r.tx_power_dbm, 43.01, EPSILON));
        assert!(approx_eq(r.tx_antenna.peak_gain_dbi, 24.59, EPSILON));
        assert!(approx_eq(r.tx_antenna.net_gain_dbi, 23.59, EPSILON));
        assert!(approx_eq(r.eirp_dbw, 35.60, EPSILON));
        assert!(approx_eq(r.space_loss_db, -167.67, EPSILON));
        assert!(approx_eq(r.atmospheric_loss_db, 1.36, EPSILON));
        assert!(approx_eq(r.rx_antenna.peak_gain_dbi, 30.20, EPSILON));
        assert!(approx_eq(r.rx_antenna.net_gain_dbi, 30.08, EPSILON));
        assert!(approx_eq(r.eb_no_db, 27.20, EPSILON), "Eb/No = {}", r.eb_no_db);
        assert!(approx_eq(r.required_eb_no_db, 11.6, 1e-12));
        assert!(approx_eq(r.link_margin_db, 15.60, EPSILON));
        assert!(approx_eq(r.c_no_db_hz, 106.55, EPSILON));
        assert!(r.link_closes);
        assert!(r.meets_design_margin(DESIGN_MARGIN_DB));
    }

    #[test]
    fn test_reference_downlink_literal_radians() {
        let mut cfg = LinkBudgetConfig::default();
        cfg.atmosphere.elevation_convention = ElevationConvention::LiteralRadians;
        let r = cfg.compute().unwrap();
        assert!(approx_eq(r.eb_no_db, 27.12, EPSILON), "Eb/No = {}", r.eb_no_db);
        assert!(approx_eq(r.link_margin_db, 15.52, EPSILON));
    }

    #[test]
    fn test_reproducible() {
        let cfg = LinkBudgetConfig::default();
        let a = cfg.compute().unwrap();
        let b = cfg.compute().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.eb_no_db.to_bits(), b.eb_no_db.to_bits());
    }

    #[test]
    fn test_all_outputs_finite() {
        let r = LinkBudgetConfig::default().compute().unwrap();
        for v in [
            r.tx_power_dbw,
            r.tx_power_dbm,
            r.eirp_dbw,
            r.space_loss_db,
            r.atmospheric_loss_db,
            r.eb_no_db,
            r.c_no_db_hz,
            r.required_eb_no_db,
            r.link_margin_db,
            r.tx_antenna.net_gain_dbi,
            r.rx_antenna.net_gain_dbi,
        ] {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn test_c_no_relation() {
        let r = LinkBudgetConfig::default().compute().unwrap();
        let rate_db = 10.0 * 86e6_f64.log10();
        assert!(approx_eq(r.c_no_db_hz - r.eb_no_db, rate_db, 1e-9));
    }

    #[test]
    fn test_doubling_rate_costs_3db() {
        let base = LinkBudgetConfig::default().compute().unwrap();
        let fast = LinkBudgetConfig {
            data_rate_bps: 172e6,
            ..Default::default()
        }
        .compute()
        .unwrap();
        assert!(approx_eq(base.eb_no_db - fast.eb_no_db, 3.01, EPSILON));
        // C/No does not depend on the data rate
        assert!(approx_eq(base.c_no_db_hz, fast.c_no_db_hz, 1e-9));
    }

    #[test]
    fn test_more_power_more_margin() {
        let low = LinkBudgetConfig {
            tx_power_w: 5.0,
            ..Default::default()
        }
        .compute()
        .unwrap();
        let high = LinkBudgetConfig::default().compute().unwrap();
        assert!(high.link_margin_db > low.link_margin_db);
    }

    #[test]
    fn test_link_fails_at_long_range_high_rate() {
        let r = LinkBudgetConfig {
            path_length_km: 40_000.0,
            data_rate_bps: 500e6,
            ..Default::default()
        }
        .compute()
        .unwrap();
        assert!(!r.link_closes, "margin = {}", r.link_margin_db);
        assert!(!r.meets_design_margin(DESIGN_MARGIN_DB));
    }

    #[test]
    fn test_validation_names_field() {
        let cases: Vec<(LinkBudgetConfig, &str)> = vec![
            (
                LinkBudgetConfig {
                    tx_power_w: 0.0,
                    ..Default::default()
                },
                "tx_power_w",
            ),
            (
                LinkBudgetConfig {
                    frequency_hz: -1.0,
                    ..Default::default()
                },
                "frequency_hz",
            ),
            (
                LinkBudgetConfig {
                    path_length_km: 0.0,
                    ..Default::default()
                },
                "path_length_km",
            ),
            (
                LinkBudgetConfig {
                    data_rate_bps: 0.0,
                    ..Default::default()
                },
                "data_rate_bps",
            ),
            (
                LinkBudgetConfig {
                    system_noise_temp_k: -10.0,
                    ..Default::default()
                },
                "system_noise_temp_k",
            ),
            (
                LinkBudgetConfig {
                    tx_antenna: TransmitAntenna {
                        diameter_m: 0.0,
                        ..Default::default()
                    },
                    ..Default::default()
                },
                "tx_antenna.diameter_m",
            ),
            (
                LinkBudgetConfig {
                    rx_antenna: ReceiveAntenna {
                        efficiency: 0.0,
                        ..Default::default()
                    },
                    ..Default::default()
                },
                "rx_antenna.efficiency",
            ),
            (
                LinkBudgetConfig {
                    tx_line_loss_db: f64::NAN,
                    ..Default::default()
                },
                "tx_line_loss_db",
            ),
        ];

        for (cfg, field) in cases {
            match cfg.compute() {
                Err(LinkError::InvalidParameter { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected InvalidParameter({field}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_perfect_pointing_recovers_loss() {
        let mut cfg = LinkBudgetConfig::default();
        cfg.tx_antenna.pointing_offset_deg = 0.0;
        cfg.rx_antenna.pointing = PointingError::Degrees(0.0);
        let ideal = cfg.compute().unwrap();
        let base = LinkBudgetConfig::default().compute().unwrap();
        // tx pointing (1.00 dB) + rx pointing counted twice (2 x 0.12 dB)
        assert!(approx_eq(ideal.eb_no_db - base.eb_no_db, 1.24, EPSILON));
    }

    #[test]
    fn test_calculator_exposes_config() {
        let calc = LinkBudgetCalculator::new(LinkBudgetConfig::default());
        assert_eq!(calc.config().data_rate_bps, 86e6);
    }

    #[test]
    fn test_result_serializes() {
        let r = LinkBudgetConfig::default().compute().unwrap();
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"link_margin_db\""));
        assert!(json.contains("\"beamwidth_deg\""));
    }
}
