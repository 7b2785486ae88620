//! Cached diagnostics stored as `.npy` arrays.

use crate::archive::RunStore;
use anyhow::{Context, Result};
use ndarray::{Array1, Array2};
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

const LOGLIK_FILE: &str = "loglik.npy";
const DIST_FILE: &str = "dist.npy";

pub(crate) fn write_vector(path: &Path, values: &[f64]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    Array1::from(values.to_vec())
        .write_npy(BufWriter::new(file))
        .with_context(|| format!("Failed to write {:?}", path))
}

pub(crate) fn read_vector(path: &Path) -> Result<Vec<f64>> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let arr = Array1::<f64>::read_npy(BufReader::new(file))
        .with_context(|| format!("Failed to read {:?}", path))?;
    Ok(arr.to_vec())
}

impl RunStore {
    /// Cache a log-likelihood trace in `dir`.
    pub fn save_log_likelihood(&self, dir: &Path, trace: &[f64]) -> Result<()> {
        write_vector(&self.resolve(dir).join(LOGLIK_FILE), trace)
    }

    /// Cached trace, or `None` if it has not been computed.
    pub fn load_log_likelihood(&self, dir: &Path) -> Result<Option<Vec<f64>>> {
        let path = self.resolve(dir).join(LOGLIK_FILE);
        if !path.exists() {
            return Ok(None);
        }
        read_vector(&path).map(Some)
    }

    /// Cache per-epoch learned distributions, one row per epoch.
    pub fn save_distributions(&self, dir: &Path, rows: &[Vec<f64>]) -> Result<()> {
        let width = rows.first().map_or(0, Vec::len);
        anyhow::ensure!(
            rows.iter().all(|r| r.len() == width),
            "learned distributions have differing lengths"
        );
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let arr = Array2::from_shape_vec((rows.len(), width), flat)
            .context("Failed to shape learned distributions")?;

        let path = self.resolve(dir).join(DIST_FILE);
        let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
        arr.write_npy(BufWriter::new(file))
            .with_context(|| format!("Failed to write {:?}", path))
    }

    /// Cached distributions, or `None` if they have not been computed.
    pub fn load_distributions(&self, dir: &Path) -> Result<Option<Vec<Vec<f64>>>> {
        let path = self.resolve(dir).join(DIST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(&path).with_context(|| format!("Failed to open {:?}", path))?;
        let arr = Array2::<f64>::read_npy(BufReader::new(file))
            .with_context(|| format!("Failed to read {:?}", path))?;
        Ok(Some(arr.outer_iter().map(|row| row.to_vec()).collect()))
    }
}
