//! The seam to the embedded sky-map widget.
//!
//! The real widget renders the sky and owns the view; this crate only drives
//! it through [`SkyWidget`]. [`SimulatedWidget`] keeps the view in memory and
//! resolves names from a small table, which is enough for the binary and tests.

use std::time::Duration;

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::catalog::normalize_key;
use crate::coords::Equatorial;
use crate::error::{Result, SkyviewError};

const EVENT_CAPACITY: usize = 64;
const MIN_FOV_DEG: f64 = 1e-4;
const MAX_FOV_DEG: f64 = 180.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyObject {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub position: Equatorial,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    ViewChanged { center: Equatorial, fov: f64 },
    ObjectClicked(SkyObject),
    ObjectHovered(SkyObject),
}

/// What the widget could tell about a name lookup it was asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveAck {
    /// The widget signalled completion and whether it found the name.
    Completed { found: bool },
    /// The lookup was started but its result is not observable.
    Unobserved,
}

#[async_trait]
pub trait SkyWidget: Send + Sync {
    async fn center_on(&self, target: Equatorial);
    async fn center(&self) -> Equatorial;
    async fn fov(&self) -> f64;
    async fn set_fov(&self, fov: f64);
    async fn set_image_layer(&self, layer_id: &str);
    async fn resolve_and_navigate(&self, name: &str) -> anyhow::Result<ResolveAck>;
    fn subscribe(&self) -> broadcast::Receiver<WidgetEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialView {
    pub ra: f64,
    pub dec: f64,
    pub fov: f64,
}

impl InitialView {
    pub fn center(&self) -> Equatorial {
        Equatorial::new(self.ra, self.dec)
    }
}

impl Default for InitialView {
    fn default() -> Self {
        // M101
        Self {
            ra: 210.8,
            dec: 54.3,
            fov: 1.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub center: Equatorial,
    pub fov: f64,
    pub image_layer: String,
}

#[derive(Debug)]
struct ViewHub {
    view: Mutex<ViewState>,
    events: broadcast::Sender<WidgetEvent>,
}

impl ViewHub {
    fn move_to(&self, target: Equatorial) {
        let fov = {
            let mut view = self.view.lock();
            view.center = target;
            view.fov
        };
        let _ = self.events.send(WidgetEvent::ViewChanged {
            center: target,
            fov,
        });
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedWidgetBuilder {
    initial_view: InitialView,
    image_layer: String,
    names: HashMap<String, Equatorial>,
    resolver_latency: Duration,
    reports_completion: bool,
    failing_resolver: bool,
    bootstrap_failure: Option<String>,
}

impl Default for SimulatedWidgetBuilder {
    fn default() -> Self {
        let names = [
            ("M31", Equatorial::new(10.6847, 41.2690)),
            ("M33", Equatorial::new(23.4621, 30.6599)),
            ("M51", Equatorial::new(202.4696, 47.1952)),
            ("M101", Equatorial::new(210.8024, 54.3489)),
            ("M104", Equatorial::new(189.9976, -11.6231)),
            ("NGC 7025", Equatorial::new(316.9850, 16.3372)),
        ]
        .into_iter()
        .map(|(name, coords)| (normalize_key(name), coords))
        .collect();

        Self {
            initial_view: InitialView::default(),
            image_layer: "P/DSS2/color".to_string(),
            names,
            resolver_latency: Duration::ZERO,
            reports_completion: false,
            failing_resolver: false,
            bootstrap_failure: None,
        }
    }
}

impl SimulatedWidgetBuilder {
    pub fn initial_view(mut self, initial_view: InitialView) -> Self {
        self.initial_view = initial_view;
        self
    }

    pub fn image_layer(mut self, layer_id: impl Into<String>) -> Self {
        self.image_layer = layer_id.into();
        self
    }

    pub fn known_name(mut self, name: &str, coords: Equatorial) -> Self {
        self.names.insert(normalize_key(name), coords);
        self
    }

    pub fn resolver_latency(mut self, latency: Duration) -> Self {
        self.resolver_latency = latency;
        self
    }

    pub fn reports_completion(mut self, reports_completion: bool) -> Self {
        self.reports_completion = reports_completion;
        self
    }

    pub fn failing_resolver(mut self) -> Self {
        self.failing_resolver = true;
        self
    }

    pub fn bootstrap_failure(mut self, reason: impl Into<String>) -> Self {
        self.bootstrap_failure = Some(reason.into());
        self
    }

    pub fn build(self) -> Result<SimulatedWidget> {
        if let Some(reason) = self.bootstrap_failure {
            return Err(SkyviewError::WidgetBootstrap(reason));
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let view = ViewState {
            center: self.initial_view.center(),
            fov: self.initial_view.fov,
            image_layer: self.image_layer,
        };

        Ok(SimulatedWidget {
            shared: ViewHub {
                view: Mutex::new(view),
                events,
            },
            names: self.names,
            resolver_latency: self.resolver_latency,
            reports_completion: self.reports_completion,
            failing_resolver: self.failing_resolver,
        })
    }
}

#[derive(Debug)]
pub struct SimulatedWidget {
    shared: ViewHub,
    names: HashMap<String, Equatorial>,
    resolver_latency: Duration,
    reports_completion: bool,
    failing_resolver: bool,
}

impl SimulatedWidget {
    pub fn builder() -> SimulatedWidgetBuilder {
        SimulatedWidgetBuilder::default()
    }

    pub fn view(&self) -> ViewState {
        self.shared.view.lock().clone()
    }

    /// Objects the widget shows as a clickable overlay around M101.
    pub fn sample_objects() -> Vec<SkyObject> {
        [
            ("Test Object 1", "Star", 202.4, 54.4),
            ("Test Object 2", "Galaxy", 202.6, 54.2),
            ("Test Object 3", "Nebula", 202.2, 54.6),
        ]
        .into_iter()
        .map(|(name, kind, ra, dec)| SkyObject {
            name: Some(name.to_string()),
            kind: Some(kind.to_string()),
            position: Equatorial::new(ra, dec),
        })
        .collect()
    }

    pub fn click(&self, object: SkyObject) {
        let _ = self.shared.events.send(WidgetEvent::ObjectClicked(object));
    }

    pub fn hover(&self, object: SkyObject) {
        let _ = self.shared.events.send(WidgetEvent::ObjectHovered(object));
    }
}

#[async_trait]
impl SkyWidget for SimulatedWidget {
    async fn center_on(&self, target: Equatorial) {
        self.shared.move_to(target);
    }

    async fn center(&self) -> Equatorial {
        self.shared.view.lock().center
    }

    async fn fov(&self) -> f64 {
        self.shared.view.lock().fov
    }

    async fn set_fov(&self, fov: f64) {
        let (center, fov) = {
            let mut view = self.shared.view.lock();
            view.fov = fov.clamp(MIN_FOV_DEG, MAX_FOV_DEG);
            (view.center, view.fov)
        };
        let _ = self
            .shared
            .events
            .send(WidgetEvent::ViewChanged { center, fov });
    }

    async fn set_image_layer(&self, layer_id: &str) {
        self.shared.view.lock().image_layer = layer_id.to_string();
    }

    async fn resolve_and_navigate(&self, name: &str) -> anyhow::Result<ResolveAck> {
        if self.failing_resolver {
            anyhow::bail!("name resolver unavailable");
        }

        let target = self.names.get(&normalize_key(name)).copied();
        debug!(search_term = name, ?target, "Simulated resolver lookup");

        // The view has moved by the time this returns.
        if !self.resolver_latency.is_zero() {
            tokio::time::sleep(self.resolver_latency).await;
        }
        if let Some(target) = target {
            self.shared.move_to(target);
        }

        if self.reports_completion {
            Ok(ResolveAck::Completed {
                found: target.is_some(),
            })
        } else {
            Ok(ResolveAck::Unobserved)
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.shared.events.subscribe()
    }
}
