use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::window::Window;
use crate::error::ConfigError;
use crate::render::figure::FigureStyle;

// ---------------------------------------------------------------------------
// Survey constants
// ---------------------------------------------------------------------------

/// Folder holding the survey exports.
pub const DEFAULT_DATA_DIR: &str = "D:/OneDrive - Imperial College London/2022-09-04 back up folder/Crossrail data/new statistic analysis/surface/surface correlation_heat_map/";

/// Dataset names in grid order: westbound on the top row, eastbound below.
pub const DATASET_NAMES: [&str; 6] = ["HP_WB", "SJP_WB", "SP_WB", "HP_EB", "SJP_EB", "SP_EB"];

/// The one dataset whose raw extent is larger than the comparison window.
pub const TRUNCATED_DATASET: &str = "SP_EB";

/// Rows kept from [`TRUNCATED_DATASET`].
pub const TRUNCATE_ROWS: usize = 20;

/// Columns kept from [`TRUNCATED_DATASET`] (offsets up to 20).
pub const TRUNCATE_COLUMNS: usize = 32;

pub const OUTPUT_FILE: &str = "correlation_heatmaps.tiff";

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// One input table and the window applied to it after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub name: String,
    /// File name, relative to [`Config::data_dir`] unless absolute.
    pub file: PathBuf,
    #[serde(default)]
    pub window: Option<Window>,
}

impl DatasetSpec {
    /// `<name>.csv`, windowed when `name` is [`TRUNCATED_DATASET`].
    pub fn survey(name: &str) -> Self {
        DatasetSpec {
            name: name.to_string(),
            file: PathBuf::from(format!("{name}.csv")),
            window: (name == TRUNCATED_DATASET).then(|| Window::new(TRUNCATE_ROWS, TRUNCATE_COLUMNS)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub datasets: Vec<DatasetSpec>,
    /// Written relative to the working directory unless absolute.
    pub output: PathBuf,
    /// Open the interactive viewer before writing the output.
    pub show_window: bool,
    pub style: FigureStyle,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            datasets: DATASET_NAMES.iter().map(|n| DatasetSpec::survey(n)).collect(),
            output: PathBuf::from(OUTPUT_FILE),
            show_window: true,
            style: FigureStyle::default(),
        }
    }
}

impl Config {
    /// Read a JSON config file. Absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default survey layout reading from `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Config {
            data_dir: data_dir.into(),
            ..Config::default()
        }
    }

    /// Default survey layout reading from an existing directory, stored as an
    /// absolute path so the config works from any working directory.
    pub fn for_directory(dir: &Path) -> Result<Self, ConfigError> {
        let data_dir = std::fs::canonicalize(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Config::with_data_dir(data_dir))
    }

    pub fn dataset_path(&self, spec: &DatasetSpec) -> PathBuf {
        self.data_dir.join(&spec.file)
    }
}
