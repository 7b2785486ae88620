//! # rbm-store
//!
//! Saves and loads complete training runs. A run lives in its own directory
//! under the configured data directory:
//!
//! ```text
//! <data_dir>/<run_dir_name>/
//!     run.toml       run configuration, basis and target temperature
//!     history.json   initial parameters and every history entry
//!     target.json    target distribution: configurations and probabilities
//!     loglik.npy     cached log-likelihood trace (1-D, one value per step)
//!     dist.npy       cached learned distributions (2-D, epoch × configuration)
//! ```
//!
//! Directory names are derived from the run parameters only.

mod archive;
mod arrays;

pub use archive::{run_dir_name, RunArchive, RunManifest, RunStore};
