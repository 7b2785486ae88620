//! Training run configuration and the canonical step index.
//!
//! A run is a sequence of epochs, each with its own step count, learning rate
//! and CD depth. History entries are addressed by a single global step index
//! that counts steps across epochs; every consumer derives positions through
//! [`RunConfig::global_step_index`] so training, the log-likelihood trace and
//! per-epoch selection agree on numbering.
//!
//! ```
//! use rbm_core::schedule::RunConfig;
//!
//! let config = RunConfig::from_lists(&[3, 0, 2], &[1.0, 0.5, 0.25], &[1, 1, 2], 4, 2, 10).unwrap();
//! assert_eq!(config.total_steps(), 5);
//! assert_eq!(config.global_step_index(2, 1).unwrap(), 4);
//! assert_eq!(config.epoch_end_index(0), Some(2));
//! assert_eq!(config.epoch_end_index(1), None);
//! assert_eq!(config.epoch_boundaries(), vec![0, 3, 3]);
//! ```

use crate::enumerate::check_joint_enumerable;
use crate::error::{RbmError, Result};
use serde::{Deserialize, Serialize};

/// Settings for one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochSchedule {
    pub steps: usize,
    pub learning_rate: f64,
    pub cd_depth: usize,
}

/// Complete description of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub n_visible: usize,
    pub n_hidden: usize,
    pub batch_size: usize,
    pub epochs: Vec<EpochSchedule>,
}

impl RunConfig {
    /// Build a run from parallel per-epoch lists.
    pub fn from_lists(
        steps: &[usize],
        learning_rates: &[f64],
        cd_depths: &[usize],
        n_visible: usize,
        n_hidden: usize,
        batch_size: usize,
    ) -> Result<Self> {
        if steps.len() != learning_rates.len() || steps.len() != cd_depths.len() {
            return Err(RbmError::ScheduleLengthMismatch {
                steps: steps.len(),
                learning_rates: learning_rates.len(),
                cd_depths: cd_depths.len(),
            });
        }
        let epochs = steps
            .iter()
            .zip(learning_rates)
            .zip(cd_depths)
            .map(|((&steps, &learning_rate), &cd_depth)| EpochSchedule {
                steps,
                learning_rate,
                cd_depth,
            })
            .collect();
        Ok(RunConfig {
            n_visible,
            n_hidden,
            batch_size,
            epochs,
        })
    }

    /// Check every precondition the training driver relies on.
    pub fn validate(&self) -> Result<()> {
        check_joint_enumerable(self.n_visible, self.n_hidden)?;
        if self.batch_size == 0 {
            return Err(RbmError::EmptyBatch);
        }
        for epoch in &self.epochs {
            if epoch.cd_depth == 0 {
                return Err(RbmError::ZeroCdDepth);
            }
            if !epoch.learning_rate.is_finite() {
                return Err(RbmError::InvalidLearningRate(epoch.learning_rate));
            }
        }
        if self.total_steps() == 0 {
            return Err(RbmError::ZeroTotalSteps);
        }
        Ok(())
    }

    pub fn n_epochs(&self) -> usize {
        self.epochs.len()
    }

    pub fn total_steps(&self) -> usize {
        self.epochs.iter().map(|e| e.steps).sum()
    }

    /// Global index of `step` within `epoch`.
    pub fn global_step_index(&self, epoch: usize, step: usize) -> Result<usize> {
        let schedule = self.epochs.get(epoch).ok_or(RbmError::IndexOutOfRange {
            index: epoch,
            len: self.epochs.len(),
        })?;
        if step >= schedule.steps {
            return Err(RbmError::IndexOutOfRange {
                index: step,
                len: schedule.steps,
            });
        }
        let offset: usize = self.epochs[..epoch].iter().map(|e| e.steps).sum();
        Ok(offset + step)
    }

    /// Global index of the last step in `epoch`, or `None` for an empty or
    /// unknown epoch.
    pub fn epoch_end_index(&self, epoch: usize) -> Option<usize> {
        let steps = self.epochs.get(epoch)?.steps;
        steps
            .checked_sub(1)
            .and_then(|last| self.global_step_index(epoch, last).ok())
    }

    /// Global index at which each epoch starts.
    pub fn epoch_boundaries(&self) -> Vec<usize> {
        self.epochs
            .iter()
            .scan(0usize, |offset, epoch| {
                let start = *offset;
                *offset += epoch.steps;
                Some(start)
            })
            .collect()
    }

    /// Inverse of [`global_step_index`](Self::global_step_index).
    pub fn locate(&self, global_step: usize) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (epoch, schedule) in self.epochs.iter().enumerate() {
            if global_step < offset + schedule.steps {
                return Some((epoch, global_step - offset));
            }
            offset += schedule.steps;
        }
        None
    }

    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml(s: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
