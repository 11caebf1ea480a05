//! Discovers which kinematic and stellar-population map images exist for the
//! object the viewer is showing.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};
use tracing::{debug, info};

use crate::coords::Equatorial;
use crate::session::ViewerSession;

/// Tried in this order; the first existing file wins.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "fits"];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum MapKind {
    StellarVelocity,
    StellarVelocityError,
    VelocityDispersion,
    VelocityDispersionError,
    H3,
    H4,
    AgeLumWeighted,
    AgeMassWeighted,
    Metallicity,
}

impl MapKind {
    pub fn key(&self) -> &'static str {
        self.into()
    }

    pub fn file_suffix(&self) -> &'static str {
        match self {
            MapKind::StellarVelocity => "stellar_velocity",
            MapKind::StellarVelocityError => "stellar_velocity_error",
            MapKind::VelocityDispersion => "velocity_dispersion",
            MapKind::VelocityDispersionError => "velocity_dispersion_error",
            MapKind::H3 => "h3",
            MapKind::H4 => "h4",
            MapKind::AgeLumWeighted => "age",
            MapKind::AgeMassWeighted => "age_mass_weighted",
            MapKind::Metallicity => "metallicity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MapKind::StellarVelocity => "Stellar Velocity",
            MapKind::StellarVelocityError => "Stellar Velocity Error",
            MapKind::VelocityDispersion => "Velocity Dispersion",
            MapKind::VelocityDispersionError => "Velocity Dispersion Error",
            MapKind::H3 => "H3",
            MapKind::H4 => "H4",
            MapKind::AgeLumWeighted => "Age (Lum. Weighted)",
            MapKind::AgeMassWeighted => "Age (Mass Weighted)",
            MapKind::Metallicity => "Metallicity",
        }
    }

    pub fn all() -> Vec<MapKind> {
        MapKind::iter().collect()
    }
}

/// Existence check for a static asset. Any failure counts as "missing".
#[async_trait]
pub trait AssetProbe: Send + Sync {
    async fn exists(&self, relative_path: &Path) -> bool;
}

#[derive(Debug, Clone)]
pub struct FsAssetProbe {
    root: PathBuf,
}

impl FsAssetProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl AssetProbe for FsAssetProbe {
    async fn exists(&self, relative_path: &Path) -> bool {
        match tokio::fs::metadata(self.root.join(relative_path)).await {
            Ok(metadata) => metadata.is_file(),
            Err(err) => {
                debug!(path = %relative_path.display(), "Asset probe miss: {err}");
                false
            }
        }
    }
}

/// `"Pinwheel Galaxy (M101)"` -> `"PINWHEELGALAXY(M101)"`: whitespace is
/// dropped, punctuation kept.
pub fn asset_stem(object_name: &str) -> String {
    object_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Returns the first `<base_name>.<ext>` that exists, trying [`IMAGE_EXTENSIONS`] in order.
pub async fn probe_image(probe: &dyn AssetProbe, base_name: &str) -> Option<PathBuf> {
    for ext in IMAGE_EXTENSIONS {
        let candidate = PathBuf::from(format!("{base_name}.{ext}"));
        if probe.exists(&candidate).await {
            return Some(candidate);
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub kind: MapKind,
    pub object_name: String,
    pub path: PathBuf,
}

impl GalleryItem {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryOutcome {
    NotAtObject,
    NoMapsSelected,
    NoImages,
    Loaded(Vec<GalleryItem>),
}

impl GalleryOutcome {
    pub fn status_line(&self, object_name: &str) -> String {
        match self {
            GalleryOutcome::NotAtObject => "Navigate closer to object to view images".to_string(),
            GalleryOutcome::NoMapsSelected => {
                format!("Viewing {object_name} - select map options to load images")
            }
            GalleryOutcome::NoImages => format!("No images found for {object_name}"),
            GalleryOutcome::Loaded(items) => format!(
                "Loaded {} maps for {object_name} - click on an image to select",
                items.len()
            ),
        }
    }
}

pub struct GalleryLoader {
    probe: Box<dyn AssetProbe>,
    tolerance_deg: f64,
}

impl std::fmt::Debug for GalleryLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryLoader")
            .field("tolerance_deg", &self.tolerance_deg)
            .finish_non_exhaustive()
    }
}

impl GalleryLoader {
    pub fn new(probe: Box<dyn AssetProbe>, tolerance_deg: f64) -> Self {
        Self {
            probe,
            tolerance_deg,
        }
    }

    /// Finds images for the selected map kinds, but only while the view is
    /// still on the object the session has loaded.
    pub async fn load(
        &self,
        session: &ViewerSession,
        center: &Equatorial,
        object_name: &str,
        selected: &[MapKind],
    ) -> GalleryOutcome {
        if !session.is_at_object(object_name, center, self.tolerance_deg) {
            debug!(object = object_name, ?center, "View is not on the loaded object");
            return GalleryOutcome::NotAtObject;
        }

        if selected.is_empty() {
            return GalleryOutcome::NoMapsSelected;
        }

        let stem = asset_stem(object_name);
        let mut items = Vec::new();

        for kind in MapKind::iter().filter(|kind| selected.contains(kind)) {
            let base_name = format!("{stem}_{}", kind.file_suffix());
            if let Some(path) = probe_image(self.probe.as_ref(), &base_name).await {
                items.push(GalleryItem {
                    kind,
                    object_name: object_name.to_string(),
                    path,
                });
            }
        }

        if items.is_empty() {
            info!(object = object_name, "No map images available");
            GalleryOutcome::NoImages
        } else {
            info!(object = object_name, count = items.len(), "Loaded map images");
            GalleryOutcome::Loaded(items)
        }
    }
}
