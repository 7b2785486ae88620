//! Path configuration for RBM runs.
//!
//! Two locations are configurable:
//! - **Data directory**: run archives (config, history, cached diagnostics)
//! - **Plots directory**: rendered SVG figures
//!
//! Paths resolve with priority:
//! 1. CLI arguments
//! 2. Environment variables (`RBM_DATA_DIR`, `RBM_PLOTS_DIR`, `RBM_BASE_DIR`)
//! 3. Config file (`<config dir>/rbm/config.toml`, or `RBM_CONFIG_FILE`)
//! 4. Default system directories
//!
//! A `PathConfig` is always passed explicitly to whatever writes files.
//!
//! ```
//! use rbm_core::config::PathConfig;
//!
//! let config = PathConfig::builder().base_dir("/tmp/rbm").build();
//! assert_eq!(config.data_dir(), std::path::Path::new("/tmp/rbm/data"));
//! assert_eq!(config.plots_dir(), std::path::Path::new("/tmp/rbm/plots"));
//! ```

use clap::Args;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APPLICATION: &str = "rbm";

/// CLI arguments for path configuration. Flatten into a command's parser.
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Directory for run archives
    #[arg(long, env = "RBM_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory for rendered plots
    #[arg(long, env = "RBM_PLOTS_DIR", global = true)]
    pub plots_dir: Option<PathBuf>,

    /// Base directory for all files (data/ and plots/ underneath)
    #[arg(long, env = "RBM_BASE_DIR", global = true)]
    pub base_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(long, env = "RBM_CONFIG_FILE", global = true)]
    pub config_file: Option<PathBuf>,
}

/// Path configuration as stored in the TOML config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfigFile {
    pub data_dir: Option<PathBuf>,
    pub plots_dir: Option<PathBuf>,
    /// Overrides the defaults for both directories if set
    pub base_dir: Option<PathBuf>,
}

/// Resolved directories for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct PathConfig {
    data_dir: PathBuf,
    plots_dir: PathBuf,
}

impl PathConfig {
    /// Resolve from parsed arguments (which already include env fallbacks).
    pub fn from_path_args(args: PathArgs) -> Self {
        let file_config = Self::load_config_file(args.config_file.as_deref());

        let base_dir = args.base_dir.or(file_config.base_dir);
        let defaults = Self::default_dirs();

        let data_dir = args
            .data_dir
            .or_else(|| base_dir.as_ref().map(|b| b.join("data")))
            .or(file_config.data_dir)
            .unwrap_or(defaults.0);

        let plots_dir = args
            .plots_dir
            .or_else(|| base_dir.as_ref().map(|b| b.join("plots")))
            .or(file_config.plots_dir)
            .unwrap_or(defaults.1);

        PathConfig {
            data_dir,
            plots_dir,
        }
    }

    pub fn builder() -> PathConfigBuilder {
        PathConfigBuilder::new()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn plots_dir(&self) -> &Path {
        &self.plots_dir
    }

    /// Create both directories if missing.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(&self.plots_dir)?;
        Ok(())
    }

    pub fn print_summary(&self) {
        println!("RBM path configuration:");
        println!("  Data:  {:?}", self.data_dir);
        println!("  Plots: {:?}", self.plots_dir);
    }

    fn default_dirs() -> (PathBuf, PathBuf) {
        if let Some(proj_dirs) = ProjectDirs::from("", "", APPLICATION) {
            (
                proj_dirs.data_dir().join("runs"),
                proj_dirs.data_dir().join("plots"),
            )
        } else {
            let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            (cwd.join(".rbm/runs"), cwd.join(".rbm/plots"))
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APPLICATION).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Read the config file, falling back to an empty one if it is missing or
    /// unreadable.
    fn load_config_file(path: Option<&Path>) -> PathConfigFile {
        let Some(path) = path.map(PathBuf::from).or_else(Self::default_config_path) else {
            return PathConfigFile::default();
        };
        if !path.exists() {
            return PathConfigFile::default();
        }
        match fs::read_to_string(&path).map(|s| toml::from_str::<PathConfigFile>(&s)) {
            Ok(Ok(config)) => config,
            Ok(Err(err)) => {
                tracing::warn!(path = %path.display(), %err, "ignoring malformed config file");
                PathConfigFile::default()
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "could not read config file");
                PathConfigFile::default()
            }
        }
    }

    /// Write the resolved paths as a config file.
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let config = PathConfigFile {
            data_dir: Some(self.data_dir.clone()),
            plots_dir: Some(self.plots_dir.clone()),
            base_dir: None,
        };

        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml_str)
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        let (data_dir, plots_dir) = Self::default_dirs();
        PathConfig {
            data_dir,
            plots_dir,
        }
    }
}

/// Builder for [`PathConfig`].
#[derive(Debug, Clone, Default)]
pub struct PathConfigBuilder {
    data_dir: Option<PathBuf>,
    plots_dir: Option<PathBuf>,
    base_dir: Option<PathBuf>,
}

impl PathConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    pub fn plots_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.plots_dir = Some(path.into());
        self
    }

    /// Base directory; `data/` and `plots/` are placed under it.
    pub fn base_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.base_dir = Some(path.into());
        self
    }

    pub fn build(self) -> PathConfig {
        let (data_default, plots_default) = match &self.base_dir {
            Some(base) => (base.join("data"), base.join("plots")),
            None => PathConfig::default_dirs(),
        };

        PathConfig {
            data_dir: self.data_dir.unwrap_or(data_default),
            plots_dir: self.plots_dir.unwrap_or(plots_default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PathConfig::default();
        assert!(!config.data_dir().as_os_str().is_empty());
        assert!(!config.plots_dir().as_os_str().is_empty());
    }

    #[test]
    fn test_builder() {
        let config = PathConfig::builder()
            .data_dir("/tmp/test/data")
            .plots_dir("/tmp/test/plots")
            .build();

        assert_eq!(config.data_dir(), Path::new("/tmp/test/data"));
        assert_eq!(config.plots_dir(), Path::new("/tmp/test/plots"));
    }

    #[test]
    fn test_explicit_dir_beats_base_dir() {
        let config = PathConfig::builder()
            .base_dir("/srv/rbm")
            .plots_dir("/tmp/figures")
            .build();

        assert_eq!(config.data_dir(), Path::new("/srv/rbm/data"));
        assert_eq!(config.plots_dir(), Path::new("/tmp/figures"));
    }

    #[test]
    fn test_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        let written = PathConfig::builder()
            .data_dir(dir.path().join("d"))
            .plots_dir(dir.path().join("p"))
            .build();
        written.save_to_file(&file).unwrap();

        let args = PathArgs {
            config_file: Some(file),
            ..PathArgs::default()
        };
        assert_eq!(PathConfig::from_path_args(args), written);
    }

    #[test]
    fn test_args_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        fs::write(&file, "data_dir = \"/from/file\"\nplots_dir = \"/from/file/plots\"\n").unwrap();

        let args = PathArgs {
            data_dir: Some(PathBuf::from("/from/cli")),
            config_file: Some(file),
            ..PathArgs::default()
        };
        let config = PathConfig::from_path_args(args);
        assert_eq!(config.data_dir(), Path::new("/from/cli"));
        assert_eq!(config.plots_dir(), Path::new("/from/file/plots"));
    }

    #[test]
    fn test_malformed_config_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        fs::write(&file, "data_dir = [").unwrap();

        let args = PathArgs {
            base_dir: Some(dir.path().to_path_buf()),
            config_file: Some(file),
            ..PathArgs::default()
        };
        let config = PathConfig::from_path_args(args);
        assert_eq!(config.data_dir(), dir.path().join("data"));
    }

    #[test]
    fn test_ensure_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = PathConfig::builder().base_dir(dir.path()).build();
        config.ensure_dirs().unwrap();
        assert!(config.data_dir().is_dir());
        assert!(config.plots_dir().is_dir());
    }
}
