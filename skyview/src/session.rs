use tracing::debug;

use crate::coords::Equatorial;

pub const READY_STATUS: &str = "Ready - Move mouse to see coordinates";

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedObject {
    pub name: String,
    pub coordinates: Equatorial,
}

/// Per-viewer state shared by the locator flow and the gallery: which object
/// the user navigated to last, and the status line shown to them.
#[derive(Debug, Clone)]
pub struct ViewerSession {
    loaded: Option<LoadedObject>,
    status: String,
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self {
            loaded: None,
            status: READY_STATUS.to_string(),
        }
    }
}

impl ViewerSession {
    pub fn loaded_object(&self) -> Option<&LoadedObject> {
        self.loaded.as_ref()
    }

    pub fn set_loaded_object(&mut self, name: impl Into<String>, coordinates: Equatorial) {
        let name = name.into();
        debug!(object = %name, ?coordinates, "Loaded object changed");
        self.loaded = Some(LoadedObject { name, coordinates });
    }

    /// True when `name` is the loaded object and `center` is still on it.
    pub fn is_at_object(&self, name: &str, center: &Equatorial, tolerance_deg: f64) -> bool {
        match &self.loaded {
            Some(loaded) if loaded.name == name => {
                loaded.coordinates.offset_within(center, tolerance_deg)
            }
            _ => false,
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Forgets the loaded object and restores the initial status line.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
