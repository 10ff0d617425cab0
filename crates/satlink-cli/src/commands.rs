use std::io::Write;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use satlink_core::units::mhz_to_hz;
use satlink_core::{
    ElevationConvention, FixedGainReport, LinkBudgetConfig, LinkBudgetReport, SatlinkConfig,
    DESIGN_MARGIN_DB,
};
use satlink_sim::{plan_passes, BufferDrainSimulator, PlotSeries};

use crate::cli::{BufferArgs, FixedGainArgs, LinkArgs, PassArgs};

const BITS_PER_GIGABIT: f64 = 1e9;
const SECONDS_PER_MINUTE: f64 = 60.0;

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("serializing result")?;
    writeln!(out)?;
    Ok(())
}

/// Fold command-line overrides into the configured link.
pub(crate) fn apply_link_overrides(
    mut link: LinkBudgetConfig,
    args: &LinkArgs,
) -> LinkBudgetConfig {
    if let Some(mhz) = args.frequency_mhz {
        link.frequency_hz = mhz_to_hz(mhz);
    }
    if let Some(w) = args.tx_power_w {
        link.tx_power_w = w;
    }
    if let Some(km) = args.path_length_km {
        link.path_length_km = km;
    }
    if let Some(rate) = args.data_rate_bps {
        link.data_rate_bps = rate;
    }
    if let Some(d) = args.rx_diameter_m {
        link.rx_antenna.diameter_m = d;
    }
    if let Some(el) = args.elevation_deg {
        link.atmosphere.min_elevation_deg = el;
    }
    if args.literal_elevation {
        link.atmosphere.elevation_convention = ElevationConvention::LiteralRadians;
    }
    link
}

pub fn link<W: Write>(config: &SatlinkConfig, args: &LinkArgs, out: &mut W) -> anyhow::Result<()> {
    let link_config = apply_link_overrides(config.link.clone(), args);
    let result = link_config.compute().context("evaluating link budget")?;
    info!(
        eb_no_db = result.eb_no_db,
        margin_db = result.link_margin_db,
        "link budget evaluated"
    );

    if args.json {
        return write_json(out, &result);
    }
    writeln!(out, "{}", LinkBudgetReport::new(&link_config, &result))?;
    if !result.meets_design_margin(DESIGN_MARGIN_DB) {
        writeln!(out, "Warning: margin below {:.1} dB design target", DESIGN_MARGIN_DB)?;
    }
    Ok(())
}

pub fn fixed_gain<W: Write>(
    config: &SatlinkConfig,
    args: &FixedGainArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let result = config
        .fixed_gain
        .compute()
        .context("evaluating fixed-gain budget")?;
    info!(margin_db = result.link_margin_db, "fixed-gain budget evaluated");

    if args.json {
        return write_json(out, &result);
    }
    writeln!(out, "{}", FixedGainReport::new(&config.fixed_gain, &result))?;
    Ok(())
}

#[derive(Serialize)]
struct BufferSummary {
    refill_time_s: Option<f64>,
    time_to_empty_s: Option<f64>,
    time_to_full_s: Option<f64>,
    downlinked_bits: f64,
    series: PlotSeries,
}

pub fn buffer<W: Write>(
    config: &SatlinkConfig,
    args: &BufferArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut buffer = config.buffer.clone();
    if let Some(d) = args.duration_s {
        buffer.duration_s = d;
    }
    if let Some(r) = args.drain_rate_bps {
        buffer.drain_rate_bps = r;
    }
    if let Some(r) = args.fill_rate_bps {
        buffer.fill_rate_bps = r;
    }
    if args.start_empty {
        buffer.initial_bits = 0.0;
    }

    let sim = BufferDrainSimulator::new(buffer).context("configuring buffer simulation")?;
    let trace = sim.run();
    let series = PlotSeries::from_trace(&trace);
    // A zero refill rate only means there is no refill time to report.
    let refill_time_s = sim.refill_time_s().ok();

    if let Some(ref path) = args.csv {
        series
            .save_csv(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), rows = series.time_min.len(), "wrote buffer series");
    }

    let summary = BufferSummary {
        refill_time_s,
        time_to_empty_s: trace.time_to_empty_s(),
        time_to_full_s: trace.time_to_full_s(),
        downlinked_bits: trace.downlinked_bits(),
        series,
    };

    if args.json {
        return write_json(out, &summary);
    }

    writeln!(out, "Buffer Capacity: {:.2} Gb", trace.capacity_bits / BITS_PER_GIGABIT)?;
    writeln!(out, "Simulated Steps: {}", trace.len())?;
    writeln!(out, "Final Occupancy: {:.2} Gb", trace.final_bits() / BITS_PER_GIGABIT)?;
    match summary.time_to_empty_s {
        Some(t) => writeln!(out, "Empty After: {:.2} mins", t / SECONDS_PER_MINUTE)?,
        None => writeln!(out, "Empty After: never")?,
    }
    match summary.time_to_full_s {
        Some(t) => writeln!(out, "Full After: {:.2} mins", t / SECONDS_PER_MINUTE)?,
        None => writeln!(out, "Full After: never")?,
    }
    writeln!(out, "Downlinked: {:.2} Gb", summary.downlinked_bits / BITS_PER_GIGABIT)?;
    match summary.refill_time_s {
        Some(t) => writeln!(out, "Refill time: {:.2} mins", t / SECONDS_PER_MINUTE)?,
        None => writeln!(out, "Refill time: never (no refill)")?,
    }
    Ok(())
}

pub fn pass<W: Write>(config: &SatlinkConfig, args: &PassArgs, out: &mut W) -> anyhow::Result<()> {
    let mut pass = config.pass.clone();
    if let Some(gb) = args.data_gb {
        pass.data_to_downlink_bits = gb * BITS_PER_GIGABIT;
    }
    if let Some(s) = args.pass_duration_s {
        pass.pass_duration_s = s;
    }

    let (plan, _) = plan_passes(&config.buffer, &pass).context("planning passes")?;
    info!(passes = ?plan.passes_required, "pass plan computed");

    if args.json {
        return write_json(out, &plan);
    }

    writeln!(out, "Backlog: {:.2} Gb", plan.data_to_downlink_bits / BITS_PER_GIGABIT)?;
    writeln!(out, "Pass Duration: {:.2} mins", pass.pass_duration_s / SECONDS_PER_MINUTE)?;
    writeln!(out, "Downlinked Per Pass: {:.2} Gb", plan.bits_per_pass / BITS_PER_GIGABIT)?;
    match plan.passes_required {
        Some(n) => writeln!(out, "Passes Required: {}", n)?,
        None => writeln!(out, "Passes Required: unbounded (nothing drains)")?,
    }
    Ok(())
}

pub fn example_config<W: Write>(out: &mut W) -> anyhow::Result<()> {
    write!(out, "{}", SatlinkConfig::example_yaml())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> anyhow::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_link_report() {
        let config = SatlinkConfig::default();
        let text = run(|out| link(&config, &LinkArgs::default(), out));
        assert!(text.contains("Link Margin: 15.60 dB"));
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn test_link_overrides() {
        let args = LinkArgs {
            frequency_mhz: Some(2200.0),
            elevation_deg: Some(5.0),
            literal_elevation: true,
            ..Default::default()
        };
        let link = apply_link_overrides(LinkBudgetConfig::default(), &args);
        assert_eq!(link.frequency_hz, 2.2e9);
        assert_eq!(link.atmosphere.min_elevation_deg, 5.0);
        assert_eq!(link.atmosphere.elevation_convention, ElevationConvention::LiteralRadians);
        assert_eq!(link.tx_power_w, 20.0);
    }

    #[test]
    fn test_link_json() {
        let config = SatlinkConfig::default();
        let args = LinkArgs {
            json: true,
            ..Default::default()
        };
        let text = run(|out| link(&config, &args, out));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value["link_closes"].as_bool().unwrap());
        assert!((value["link_margin_db"].as_f64().unwrap() - 15.60).abs() < 0.01);
    }

    #[test]
    fn test_link_invalid_input_is_error() {
        let config = SatlinkConfig::default();
        let args = LinkArgs {
            tx_power_w: Some(0.0),
            ..Default::default()
        };
        let mut out = Vec::new();
        let err = link(&config, &args, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("tx_power_w"));
    }

    #[test]
    fn test_fixed_gain_report() {
        let config = SatlinkConfig::default();
        let text = run(|out| fixed_gain(&config, &FixedGainArgs::default(), out));
        assert!(text.contains("Link Margin: 3.02 dB"));
    }

    #[test]
    fn test_buffer_summary() {
        let config = SatlinkConfig::default();
        let text = run(|out| buffer(&config, &BufferArgs::default(), out));
        assert!(text.contains("Simulated Steps: 480"));
        assert!(text.contains("Empty After: never"));
        assert!(text.contains("Refill time: 1.19 mins"));
    }

    #[test]
    fn test_buffer_csv() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("buffer.csv");
        let config = SatlinkConfig::default();
        let args = BufferArgs {
            duration_s: Some(700.0),
            csv: Some(path.clone()),
            ..Default::default()
        };
        let text = run(|out| buffer(&config, &args, out));
        assert!(text.contains("Empty After: 10.67 mins"));
        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv.lines().count(), 701);
    }

    #[test]
    fn test_pass_plan() {
        let config = SatlinkConfig::default();
        let text = run(|out| pass(&config, &PassArgs::default(), out));
        assert!(text.contains("Passes Required: 3"));
        assert!(text.contains("Downlinked Per Pass: 479.00 Gb"));
    }

    #[test]
    fn test_example_config_parses() {
        let text = run(|out| example_config(out));
        assert_eq!(SatlinkConfig::parse(&text).unwrap(), SatlinkConfig::default());
    }
}
