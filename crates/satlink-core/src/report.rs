//! Text reports.
//!
//! One labelled line per input or derived figure, two decimals and the
//! physical unit, in budget-sheet order.

use std::fmt;

use crate::fixed_gain::{FixedGainLinkConfig, FixedGainLinkResult};
use crate::link_budget::{LinkBudgetConfig, LinkBudgetResult};
use crate::units::hz_to_mhz;

/// Scientific notation with a signed, at least two-digit exponent
/// (`8.60e+07`, `1e-05`), as budget sheets print it.
struct Sci {
    value: f64,
    precision: usize,
}

impl Sci {
    fn new(value: f64, precision: usize) -> Self {
        Self { value, precision }
    }
}

impl fmt::Display for Sci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = format!("{:.*e}", self.precision, self.value);
        let Some((mantissa, exponent)) = plain.split_once('e') else {
            return f.write_str(&plain);
        };
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        write!(f, "{mantissa}e{sign}{digits:0>2}")
    }
}

/// Detailed downlink budget report.
pub struct LinkBudgetReport<'a> {
    pub config: &'a LinkBudgetConfig,
    pub result: &'a LinkBudgetResult,
}

impl<'a> LinkBudgetReport<'a> {
    pub fn new(config: &'a LinkBudgetConfig, result: &'a LinkBudgetResult) -> Self {
        Self { config, result }
    }
}

impl fmt::Display for LinkBudgetReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.config;
        let r = self.result;
        writeln!(f, "Frequency: {:.2} MHz", hz_to_mhz(c.frequency_hz))?;
        writeln!(f, "Transmitter Power: {:.2} W", c.tx_power_w)?;
        writeln!(f, "    -> {:.2} dBW", r.tx_power_dbw)?;
        writeln!(f, "    -> {:.2} dBm", r.tx_power_dbm)?;
        writeln!(f, "Transmitter Line Losses: {:.2} dB", c.tx_line_loss_db)?;
        writeln!(f, "Transmit Antenna Beamwidth: {:.2} degree", r.tx_antenna.beamwidth_deg)?;
        writeln!(
            f,
            "Transmit Antenna Pointing Offset: {:.2} degree",
            r.tx_antenna.pointing_error_deg
        )?;
        writeln!(f, "Transmit Antenna Gain (peak): {:.2} dBi", r.tx_antenna.peak_gain_dbi)?;
        writeln!(f, "Transmit Antenna Gain (net): {:.2} dBi", r.tx_antenna.net_gain_dbi)?;
        writeln!(f, "EIRP: {:.2} dBW", r.eirp_dbw)?;
        writeln!(f, "Space Loss: {:.2} dB", r.space_loss_db)?;
        writeln!(f, "Atmospheric Loss: {:.2} dB", r.atmospheric_loss_db)?;
        writeln!(f, "Receiver Antenna Beamwidth: {:.2} degree", r.rx_antenna.beamwidth_deg)?;
        writeln!(
            f,
            "Receiver Antenna Pointing Error: {:.2} degree",
            r.rx_antenna.pointing_error_deg
        )?;
        writeln!(f, "Receiver Antenna Diameter: {:.2} m", c.rx_antenna.diameter_m)?;
        writeln!(f, "Receiver Antenna Gain (peak): {:.2} dBi", r.rx_antenna.peak_gain_dbi)?;
        writeln!(f, "Receiver Antenna Gain: {:.2} dBi", r.rx_antenna.net_gain_dbi)?;
        writeln!(f, "System Noise Temperature: {:.2} K", c.system_noise_temp_k)?;
        writeln!(f, "Data Rate: {} bps", Sci::new(c.data_rate_bps, 2))?;
        writeln!(f, "Eb/No: {:.2} dB", r.eb_no_db)?;
        writeln!(f, "C/No: {:.2} dB-Hz", r.c_no_db_hz)?;
        writeln!(
            f,
            "Required Eb/No: {:.2} dB (BER {})",
            r.required_eb_no_db,
            Sci::new(c.target_ber, 0)
        )?;
        write!(f, "Link Margin: {:.2} dB", r.link_margin_db)
    }
}

/// Fixed-gain budget report.
pub struct FixedGainReport<'a> {
    pub config: &'a FixedGainLinkConfig,
    pub result: &'a FixedGainLinkResult,
}

impl<'a> FixedGainReport<'a> {
    pub fn new(config: &'a FixedGainLinkConfig, result: &'a FixedGainLinkResult) -> Self {
        Self { config, result }
    }
}

impl fmt::Display for FixedGainReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.config;
        let r = self.result;
        writeln!(f, "Frequency: {} Hz", Sci::new(c.frequency_hz, 2))?;
        writeln!(f, "Wavelength: {:.3} m", r.wavelength_m)?;
        // 10*log10(W) is dBW; the dBm figure follows on its own line.
        writeln!(f, "TX Power: {:.2} dBW", r.tx_power_dbw)?;
        writeln!(f, "    -> {:.2} dBm", r.tx_power_dbm)?;
        writeln!(f, "TX Antenna Gain: {:.2} dBi", c.tx_antenna_gain_dbi)?;
        writeln!(f, "EIRP: {:.2} dBW", r.eirp_dbw)?;
        writeln!(f, "Path Length: {:.2} km", c.path_length_km)?;
        writeln!(f, "Space Loss: {:.2} dB", r.space_loss_db)?;
        writeln!(f, "System Losses: {:.2} dB", c.system_losses_db)?;
        writeln!(f, "RX Antenna Gain: {:.2} dBi", c.rx_antenna_gain_dbi)?;
        writeln!(f, "System Noise Temperature: {:.2} K", c.system_noise_temp_k)?;
        writeln!(f, "Data Rate: {} bps", Sci::new(c.data_rate_bps, 2))?;
        writeln!(f, "Eb/No: {:.2} dB", r.eb_no_db)?;
        writeln!(f, "C/No: {:.2} dB-Hz", r.c_no_db_hz)?;
        writeln!(f, "Required Eb/No: {:.2} dB", c.required_eb_no_db)?;
        write!(f, "Link Margin: {:.2} dB", r.link_margin_db)
    }
}
