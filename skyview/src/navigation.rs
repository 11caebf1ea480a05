//! Keyboard and pointer driven view changes: zoom, reset, survey and image
//! format cycling, plus the status lines describing the view.

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};
use tracing::{info, warn};

use crate::coords::Equatorial;
use crate::widget::{InitialView, SkyObject, SkyWidget};

pub const ZOOM_IN_FACTOR: f64 = 0.8;
pub const ZOOM_OUT_FACTOR: f64 = 1.25;
pub const CLICK_ZOOM_FACTOR: f64 = 0.6;
pub const CLICK_MAX_FOV_DEG: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    ZoomIn,
    ZoomOut,
    Reset,
    CycleSurvey,
    CycleFormat,
}

impl ViewCommand {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '+' | '=' => Some(ViewCommand::ZoomIn),
            '-' => Some(ViewCommand::ZoomOut),
            'r' | 'R' => Some(ViewCommand::Reset),
            's' | 'S' => Some(ViewCommand::CycleSurvey),
            'f' | 'F' => Some(ViewCommand::CycleFormat),
            _ => None,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Fits,
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn next(self) -> Self {
        match self {
            ImageFormat::Fits => ImageFormat::Jpeg,
            ImageFormat::Jpeg => ImageFormat::Png,
            ImageFormat::Png => ImageFormat::Fits,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Layer id asking `survey_id` for this format. FITS is the survey's
    /// native format, and ids that already carry a query are left alone.
    pub fn layer_id(&self, survey_id: &str) -> String {
        match self {
            ImageFormat::Fits => survey_id.to_string(),
            _ if survey_id.contains('?') => survey_id.to_string(),
            _ => format!("{survey_id}?format={}", self.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Survey {
    pub id: &'static str,
    pub label: &'static str,
}

pub const SURVEYS: [Survey; 5] = [
    Survey {
        id: "P/DSS2/color",
        label: "DSS2 Color",
    },
    Survey {
        id: "P/2MASS/color",
        label: "2MASS",
    },
    Survey {
        id: "P/allWISE/color",
        label: "AllWISE",
    },
    Survey {
        id: "P/SDSS9/color",
        label: "SDSS9",
    },
    Survey {
        id: "P/GLIMPSE360",
        label: "GLIMPSE",
    },
];

#[derive(Debug, Clone)]
pub struct SurveyPicker {
    index: usize,
    format: ImageFormat,
}

impl Default for SurveyPicker {
    fn default() -> Self {
        Self {
            index: 0,
            format: ImageFormat::default(),
        }
    }
}

impl SurveyPicker {
    /// Starts on `survey_id`, or on the first survey if the id is unknown.
    pub fn starting_at(survey_id: &str) -> Self {
        let index = match SURVEYS.iter().position(|survey| survey.id == survey_id) {
            Some(index) => index,
            None => {
                warn!(
                    survey_id,
                    fallback = SURVEYS[0].id,
                    "Unknown survey, starting on the first one"
                );
                0
            }
        };
        Self {
            index,
            format: ImageFormat::default(),
        }
    }

    pub fn survey(&self) -> &'static Survey {
        &SURVEYS[self.index]
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn cycle_survey(&mut self) -> &'static Survey {
        self.index = (self.index + 1) % SURVEYS.len();
        self.survey()
    }

    pub fn cycle_format(&mut self) -> ImageFormat {
        self.format = self.format.next();
        self.format
    }

    pub fn layer_id(&self) -> String {
        self.format.layer_id(self.survey().id)
    }

    pub fn status_line(&self) -> String {
        format!(
            "Format: {} | Survey: {}",
            self.format.name().to_uppercase(),
            self.survey().id
        )
    }
}

pub async fn zoom(widget: &dyn SkyWidget, factor: f64) {
    let fov = widget.fov().await;
    widget.set_fov(fov * factor).await;
}

pub async fn reset_view(widget: &dyn SkyWidget, initial_view: &InitialView) {
    widget.center_on(initial_view.center()).await;
    widget.set_fov(initial_view.fov).await;
}

/// Centers on a clicked object and zooms in, never wider than one degree.
pub async fn focus_object(widget: &dyn SkyWidget, object: &SkyObject) {
    widget.center_on(object.position).await;
    let fov = widget.fov().await;
    widget
        .set_fov((fov * CLICK_ZOOM_FACTOR).min(CLICK_MAX_FOV_DEG))
        .await;
    info!(object = ?object.name, position = ?object.position, "Focused clicked object");
}

pub async fn view_status(widget: &dyn SkyWidget) -> String {
    let center = widget.center().await;
    let fov = widget.fov().await;
    center_status(&center, fov)
}

pub fn center_status(center: &Equatorial, fov: f64) -> String {
    format!(
        "Center: RA {:.4}°, Dec {:.4}° | FOV: {:.3}°",
        center.ra, center.dec, fov
    )
}

pub fn object_status(prefix: &str, object: &SkyObject, fallback_name: &str) -> String {
    format!(
        "{prefix}: {} - {}",
        object.name.as_deref().unwrap_or(fallback_name),
        object.position.format_decimal()
    )
}
