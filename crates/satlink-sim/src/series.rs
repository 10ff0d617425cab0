//! Plot-ready series.
//!
//! Rendering is left to an external charting tool; this module only reshapes
//! a [`BufferTrace`] into minutes and gigabits and writes it as CSV.

use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use crate::buffer::BufferTrace;

const SECONDS_PER_MINUTE: f64 = 60.0;
const BITS_PER_GIGABIT: f64 = 1e9;

/// Buffer status chart data: occupancy over time plus the empty and full
/// reference lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    /// Chart title.
    pub title: String,
    /// X axis, minutes.
    pub time_min: Vec<f64>,
    /// Y axis, gigabits.
    pub occupancy_gb: Vec<f64>,
    /// Lower reference line, gigabits.
    pub floor_gb: f64,
    /// Upper reference line (capacity), gigabits.
    pub ceiling_gb: f64,
}

impl PlotSeries {
    /// Reshape a trace for charting.
    pub fn from_trace(trace: &BufferTrace) -> Self {
        Self {
            title: "Buffer status (during downlink)".to_string(),
            time_min: trace.times_s.iter().map(|t| t / SECONDS_PER_MINUTE).collect(),
            occupancy_gb: trace
                .occupancy_bits
                .iter()
                .map(|b| b / BITS_PER_GIGABIT)
                .collect(),
            floor_gb: 0.0,
            ceiling_gb: trace.capacity_bits / BITS_PER_GIGABIT,
        }
    }

    /// Write `time_min,occupancy_gb` rows with a header.
    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "time_min,occupancy_gb")?;
        for (t, b) in self.time_min.iter().zip(&self.occupancy_gb) {
            writeln!(out, "{:.6},{:.6}", t, b)?;
        }
        out.flush()
    }

    /// Write the CSV to a file.
    pub fn save_csv(&self, path: &Path) -> io::Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(io::BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferDrainSimulator;
    use satlink_core::BufferConfig;

    fn reference_series() -> PlotSeries {
        let trace = BufferDrainSimulator::new(BufferConfig::default())
            .unwrap()
            .run();
        PlotSeries::from_trace(&trace)
    }

    #[test]
    fn test_units() {
        let s = reference_series();
        assert_eq!(s.time_min.len(), 480);
        assert_eq!(s.time_min[60], 1.0);
        assert_eq!(s.occupancy_gb[0], 64.0);
        assert_eq!(s.ceiling_gb, 64.0);
        assert_eq!(s.floor_gb, 0.0);
    }

    #[test]
    fn test_csv_output() {
        let s = reference_series();
        let mut buf = Vec::new();
        s.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("time_min,occupancy_gb"));
        assert_eq!(lines.next(), Some("0.000000,64.000000"));
        assert_eq!(text.lines().count(), 481);
    }

    #[test]
    fn test_save_csv() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("buffer.csv");
        reference_series().save_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("time_min,occupancy_gb\n"));
    }
}
