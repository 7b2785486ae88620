//! # rbm-core
//!
//! Core types for learning restricted Boltzmann machines by exact
//! enumeration:
//!
//! - [`SpinBasis`] / [`SpinVector`]: basis-tagged binary unit vectors
//! - [`enumerate`]: canonical enumeration of all `2^N` configurations
//! - [`Theta`]: weights and biases
//! - [`DataDistribution`]: target distribution that seeds CD chains
//! - [`Batch`]: paired model/data samples for one gradient step
//! - [`RunConfig`] / [`EpochSchedule`]: per-epoch schedule and the canonical
//!   global step index
//! - [`PathConfig`]: where run archives and plots are written
//!
//! All fallible operations return [`RbmError`].

pub mod batch;
pub mod config;
pub mod distribution;
pub mod enumerate;
pub mod error;
pub mod params;
pub mod schedule;
pub mod spin;

pub use batch::Batch;
pub use config::{PathArgs, PathConfig, PathConfigBuilder};
pub use distribution::DataDistribution;
pub use enumerate::{
    all_configurations, all_configurations_in, configuration_index, unit_count,
    MAX_ENUMERATED_UNITS, MAX_JOINT_UNITS,
};
pub use error::{RbmError, Result};
pub use params::Theta;
pub use schedule::{EpochSchedule, RunConfig};
pub use spin::{SpinBasis, SpinVector};
