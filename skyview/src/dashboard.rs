//! Wires the locator, search executor, gallery loader and view controls to a
//! single sky widget, and keeps the user-facing status line.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::suggestions;
use crate::config::SkyviewConfig;
use crate::gallery::{FsAssetProbe, GalleryItem, GalleryLoader, GalleryOutcome, MapKind};
use crate::locator::ObjectLocator;
use crate::navigation::{
    focus_object, object_status, reset_view, view_status, zoom, SurveyPicker, ViewCommand,
    ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};
use crate::search::{SearchExecutor, SearchOutcome};
use crate::session::{LoadedObject, ViewerSession};
use crate::widget::{InitialView, SkyObject, SkyWidget, WidgetEvent};

const NOT_FOUND_SUGGESTIONS: usize = 3;

pub fn not_found_status(input: &str) -> String {
    let suggested = suggestions(input, NOT_FOUND_SUGGESTIONS);
    if suggested.is_empty() {
        format!(
            "\"{input}\" not found. Try NGC objects like \"NGC 7025\" or galaxy names like \"Andromeda\""
        )
    } else {
        format!("\"{input}\" not found. Try: {}", suggested.join(", "))
    }
}

pub struct Dashboard {
    widget: Arc<dyn SkyWidget>,
    locator: ObjectLocator,
    executor: SearchExecutor,
    gallery: GalleryLoader,
    initial_view: InitialView,
    view_change_debounce: Duration,
    session: tokio::sync::Mutex<ViewerSession>,
    picker: Mutex<SurveyPicker>,
    selected_maps: Mutex<Vec<MapKind>>,
    gallery_items: Mutex<Vec<GalleryItem>>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("executor", &self.executor)
            .field("gallery", &self.gallery)
            .field("initial_view", &self.initial_view)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    pub fn new(widget: Arc<dyn SkyWidget>, config: &SkyviewConfig) -> Self {
        Self {
            widget,
            locator: ObjectLocator::default(),
            executor: SearchExecutor::new(config.search_delay(), config.epsilon_deg),
            gallery: GalleryLoader::new(
                Box::new(FsAssetProbe::new(&config.asset_root)),
                config.object_tolerance_deg,
            ),
            initial_view: config.initial_view,
            view_change_debounce: config.view_change_debounce(),
            session: tokio::sync::Mutex::new(ViewerSession::default()),
            picker: Mutex::new(SurveyPicker::starting_at(&config.default_survey)),
            selected_maps: Mutex::new(config.selected_maps.clone()),
            gallery_items: Mutex::new(Vec::new()),
        }
    }

    pub fn widget(&self) -> &Arc<dyn SkyWidget> {
        &self.widget
    }

    pub async fn status(&self) -> String {
        self.session.lock().await.status().to_string()
    }

    pub async fn loaded_object(&self) -> Option<LoadedObject> {
        self.session.lock().await.loaded_object().cloned()
    }

    pub fn gallery_items(&self) -> Vec<GalleryItem> {
        self.gallery_items.lock().clone()
    }

    pub fn selected_maps(&self) -> Vec<MapKind> {
        self.selected_maps.lock().clone()
    }

    /// Resolves `input` and navigates to it. Blank input is ignored.
    pub async fn search(&self, input: &str) -> Option<SearchOutcome> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let resolution = self.locator.resolve(input);
        let outcome = self
            .executor
            .execute(&resolution, self.widget.as_ref())
            .await;

        match outcome {
            SearchOutcome::Found { center } => {
                {
                    let mut session = self.session.lock().await;
                    session.set_loaded_object(&resolution.display_name, center);
                    session.set_status(format!("Viewing: {}", resolution.display_name));
                }
                self.refresh_gallery().await;
            }
            SearchOutcome::NotFound => {
                info!(input, "Search found nothing");
                self.gallery_items.lock().clear();
                self.session
                    .lock()
                    .await
                    .set_status(not_found_status(input));
            }
        }

        Some(outcome)
    }

    /// Reloads map images for the loaded object, if there is one.
    pub async fn refresh_gallery(&self) -> Option<GalleryOutcome> {
        let center = self.widget.center().await;
        let selected = self.selected_maps();

        let mut session = self.session.lock().await;
        let object_name = session.loaded_object()?.name.clone();
        let outcome = self
            .gallery
            .load(&session, &center, &object_name, &selected)
            .await;
        session.set_status(outcome.status_line(&object_name));

        *self.gallery_items.lock() = match &outcome {
            GalleryOutcome::Loaded(items) => items.clone(),
            _ => Vec::new(),
        };

        Some(outcome)
    }

    /// Flips `kind` in the selection and reloads the gallery. Returns whether
    /// the map is now selected.
    pub async fn toggle_map(&self, kind: MapKind) -> bool {
        let selected = {
            let mut maps = self.selected_maps.lock();
            match maps.iter().position(|k| *k == kind) {
                Some(index) => {
                    maps.remove(index);
                    false
                }
                None => {
                    maps.push(kind);
                    true
                }
            }
        };
        debug!(map = kind.key(), selected, "Map selection changed");

        self.refresh_gallery().await;
        selected
    }

    /// Shows the gallery image at `index`.
    pub async fn select_gallery_item(&self, index: usize) -> Option<String> {
        let status = {
            let items = self.gallery_items.lock();
            let item = items.get(index)?;
            format!(
                "Viewing {} map: {} ({}/{})",
                item.object_name,
                item.label(),
                index + 1,
                items.len()
            )
        };

        self.session.lock().await.set_status(status.clone());
        Some(status)
    }

    pub async fn apply(&self, command: ViewCommand) -> String {
        let widget = self.widget.as_ref();

        let status = match command {
            ViewCommand::ZoomIn => {
                zoom(widget, ZOOM_IN_FACTOR).await;
                view_status(widget).await
            }
            ViewCommand::ZoomOut => {
                zoom(widget, ZOOM_OUT_FACTOR).await;
                view_status(widget).await
            }
            ViewCommand::Reset => {
                reset_view(widget, &self.initial_view).await;
                self.session.lock().await.reset();
                self.gallery_items.lock().clear();
                info!("View reset");
                view_status(widget).await
            }
            ViewCommand::CycleSurvey => {
                let (layer_id, status) = {
                    let mut picker = self.picker.lock();
                    picker.cycle_survey();
                    (picker.layer_id(), picker.status_line())
                };
                widget.set_image_layer(&layer_id).await;
                status
            }
            ViewCommand::CycleFormat => {
                let (layer_id, status) = {
                    let mut picker = self.picker.lock();
                    picker.cycle_format();
                    (picker.layer_id(), picker.status_line())
                };
                widget.set_image_layer(&layer_id).await;
                status
            }
        };

        self.session.lock().await.set_status(status.clone());
        status
    }

    pub async fn object_clicked(&self, object: &SkyObject) -> String {
        focus_object(self.widget.as_ref(), object).await;
        let status = object_status("Clicked", object, "Object");
        self.session.lock().await.set_status(status.clone());
        status
    }

    pub async fn object_hovered(&self, object: &SkyObject) -> String {
        let status = object_status("Object", object, "Unknown");
        self.session.lock().await.set_status(status.clone());
        status
    }

    /// Follows widget events: clicks and hovers are handled as they arrive,
    /// view changes reload the gallery once the view has been still for the
    /// configured debounce. Stops when the dashboard or the widget goes away.
    pub fn spawn_view_monitor(self: &Arc<Self>) -> JoinHandle<()> {
        let dashboard = Arc::downgrade(self);
        let events = self.widget.subscribe();
        let debounce = self.view_change_debounce;

        tokio::spawn(view_monitor_loop(dashboard, events, debounce))
    }
}

async fn view_monitor_loop(
    dashboard: Weak<Dashboard>,
    mut events: tokio::sync::broadcast::Receiver<WidgetEvent>,
    debounce: Duration,
) {
    let mut pending_reload = false;

    loop {
        let event = if pending_reload {
            match tokio::time::timeout(debounce, events.recv()).await {
                Ok(event) => event,
                Err(_) => {
                    pending_reload = false;
                    let Some(dashboard) = dashboard.upgrade() else {
                        break;
                    };
                    dashboard.refresh_gallery().await;
                    continue;
                }
            }
        } else {
            events.recv().await
        };

        let event = match event {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "View monitor fell behind widget events");
                pending_reload = true;
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        let Some(dashboard) = dashboard.upgrade() else {
            break;
        };
        match event {
            WidgetEvent::ViewChanged { .. } => pending_reload = true,
            WidgetEvent::ObjectClicked(object) => {
                dashboard.object_clicked(&object).await;
            }
            WidgetEvent::ObjectHovered(object) => {
                dashboard.object_hovered(&object).await;
            }
        }
    }

    debug!("View monitor stopped");
}
