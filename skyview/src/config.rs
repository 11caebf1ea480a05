use std::path::{Path, PathBuf};
use std::time::Duration;

use common::FileFormat;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SkyviewError};
use crate::gallery::MapKind;
use crate::navigation::SurveyPicker;
use crate::widget::InitialView;

pub const DEFAULT_CONFIG_PATH: &str = "skyview.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub resolver_latency_ms: u64,
    pub reports_completion: bool,
    /// Number of bootstrap attempts that fail before the widget loads.
    pub bootstrap_failures: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            resolver_latency_ms: 300,
            reports_completion: false,
            bootstrap_failures: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyviewConfig {
    pub search_delay_ms: u64,
    pub epsilon_deg: f64,
    pub object_tolerance_deg: f64,
    pub view_change_debounce_ms: u64,
    pub asset_root: PathBuf,
    pub initial_view: InitialView,
    pub default_survey: String,
    pub selected_maps: Vec<MapKind>,
    pub log_level: String,
    pub simulator: SimulatorConfig,
}

impl Default for SkyviewConfig {
    fn default() -> Self {
        Self {
            search_delay_ms: 1000,
            epsilon_deg: 0.01,
            object_tolerance_deg: 0.05,
            view_change_debounce_ms: 500,
            asset_root: PathBuf::from("assets"),
            initial_view: InitialView::default(),
            default_survey: "P/DSS2/color".to_string(),
            selected_maps: MapKind::all(),
            log_level: "info".to_string(),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl SkyviewConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let format = FileFormat::from_path(path)?;
        let serialized = std::fs::read(path).map_err(|source| SkyviewError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        common::serde::deserialize(&serialized, format).map_err(|source| {
            SkyviewError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Loads `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config");
                config
            }
            Err(SkyviewError::ConfigRead { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                info!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            Err(err) => {
                warn!("{:#}", anyhow::Error::from(err));
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let format = FileFormat::from_path(path)?;
        let serialized = common::serde::serialize(self, format)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn view_change_debounce(&self) -> Duration {
        Duration::from_millis(self.view_change_debounce_ms)
    }

    /// Layer the widget starts on; matches the survey picker's starting point.
    pub fn initial_image_layer(&self) -> String {
        SurveyPicker::starting_at(&self.default_survey).layer_id()
    }
}
