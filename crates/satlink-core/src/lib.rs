//! # Satellite Link Budget Library
//!
//! Closed-form link budget analysis for small-satellite downlinks, following
//! the sizing procedure of *Space Mission Analysis and Design*:
//!
//! - **Antennas**: beamwidth, peak gain and pointing loss for the spacecraft
//!   dish and the ground station dish
//! - **Propagation**: space loss and slant-path atmospheric absorption
//! - **Link budget**: EIRP, Eb/No, C/No and link margin against the required
//!   Eb/No for a target bit error rate
//! - **Fixed-gain budget**: a coarser sizing budget with antenna gains given
//!   directly
//!
//! Every calculation is a pure function of an immutable configuration record.
//! Inputs are checked against their physical domain before any formula runs,
//! and a non-finite intermediate is reported as an error instead of leaking a
//! NaN into the result.
//!
//! ## Example
//!
//! ```rust
//! use satlink_core::{LinkBudgetConfig, LinkBudgetReport};
//!
//! let config = LinkBudgetConfig {
//!     data_rate_bps: 50e6,
//!     ..Default::default()
//! };
//! let result = config.compute().unwrap();
//! assert!(result.link_closes);
//!
//! println!("{}", LinkBudgetReport::new(&config, &result));
//! ```

pub mod antenna;
pub mod config;
pub mod error;
pub mod fixed_gain;
pub mod link_budget;
pub mod logging;
pub mod propagation;
pub mod report;
pub mod units;

pub use antenna::{AntennaBudget, PointingError, ReceiveAntenna, TransmitAntenna};
pub use config::{BufferConfig, ConfigError, PassConfig, SatlinkConfig};
pub use error::{LinkError, LinkResult};
pub use fixed_gain::{FixedGainLinkConfig, FixedGainLinkResult};
pub use link_budget::{LinkBudgetCalculator, LinkBudgetConfig, LinkBudgetResult, DESIGN_MARGIN_DB};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use propagation::{Atmosphere, ElevationConvention};
pub use report::{FixedGainReport, LinkBudgetReport};
