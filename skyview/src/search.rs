//! Executes a [`SearchResolution`] against the widget and decides whether
//! the object was found.
//!
//! When the widget cannot report the outcome of a name lookup, success is
//! inferred by sampling the view center before the lookup and again after a
//! fixed delay: a center that moved less than `epsilon_deg` on both axes means
//! the resolver did nothing. That misreports a lookup whose target lies within
//! epsilon of the starting view, and a resolver error is indistinguishable
//! from a no-op; both come back as [`SearchOutcome::NotFound`].

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::coords::Equatorial;
use crate::locator::SearchResolution;
use crate::widget::{ResolveAck, SkyWidget};

pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_EPSILON_DEG: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    Found { center: Equatorial },
    NotFound,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }
}

#[derive(Debug)]
pub struct SearchExecutor {
    delay: Duration,
    epsilon_deg: f64,
    // Held for the whole search so concurrent searches never interleave
    // their before/after samples.
    in_flight: Mutex<()>,
}

impl Default for SearchExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DELAY, DEFAULT_EPSILON_DEG)
    }
}

impl SearchExecutor {
    pub fn new(delay: Duration, epsilon_deg: f64) -> Self {
        Self {
            delay,
            epsilon_deg,
            in_flight: Mutex::new(()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn epsilon_deg(&self) -> f64 {
        self.epsilon_deg
    }

    pub async fn execute(
        &self,
        resolution: &SearchResolution,
        widget: &dyn SkyWidget,
    ) -> SearchOutcome {
        let _token = self.in_flight.lock().await;

        if let Some(coords) = resolution.coordinates {
            widget.center_on(coords).await;
            info!(
                target_name = %resolution.display_name,
                ra = coords.ra,
                dec = coords.dec,
                "Centered on known coordinates"
            );
            return SearchOutcome::Found { center: coords };
        }

        let before = widget.center().await;
        debug!(?before, term = %resolution.search_term, "Starting name resolution");

        let ack = match widget.resolve_and_navigate(&resolution.search_term).await {
            Ok(ack) => ack,
            Err(err) => {
                warn!(term = %resolution.search_term, "Name resolution failed: {err:#}");
                return SearchOutcome::NotFound;
            }
        };

        match ack {
            ResolveAck::Completed { found: true } => {
                let center = widget.center().await;
                info!(term = %resolution.search_term, ?center, "Resolver reported success");
                SearchOutcome::Found { center }
            }
            ResolveAck::Completed { found: false } => {
                info!(term = %resolution.search_term, "Resolver reported no match");
                SearchOutcome::NotFound
            }
            ResolveAck::Unobserved => self.poll_for_movement(resolution, widget, before).await,
        }
    }

    async fn poll_for_movement(
        &self,
        resolution: &SearchResolution,
        widget: &dyn SkyWidget,
        before: Equatorial,
    ) -> SearchOutcome {
        tokio::time::sleep(self.delay).await;
        let after = widget.center().await;

        if before.offset_within(&after, self.epsilon_deg) {
            info!(term = %resolution.search_term, "View did not move, treating as not found");
            SearchOutcome::NotFound
        } else {
            info!(term = %resolution.search_term, ?after, "View moved, treating as found");
            SearchOutcome::Found { center: after }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::locator::ObjectLocator;
    use crate::widget::SimulatedWidget;

    fn fast_executor() -> SearchExecutor {
        SearchExecutor::new(Duration::from_millis(30), DEFAULT_EPSILON_DEG)
    }

    #[tokio::test]
    async fn known_coordinates_are_trusted() {
        let widget = SimulatedWidget::builder().build().unwrap();
        let resolution = ObjectLocator::default().resolve("LMC");

        let started = Instant::now();
        let outcome = fast_executor().execute(&resolution, &widget).await;

        assert_eq!(
            outcome,
            SearchOutcome::Found {
                center: Equatorial::new(80.9, -69.8)
            }
        );
        assert_eq!(widget.center().await, Equatorial::new(80.9, -69.8));
        assert!(started.elapsed() < Duration::from_millis(30));
    }

    #[tokio::test]
    async fn unchanged_center_is_not_found() {
        let widget = SimulatedWidget::builder().build().unwrap();
        let resolution = ObjectLocator::default().resolve("xyz123");

        let outcome = fast_executor().execute(&resolution, &widget).await;
        assert_eq!(outcome, SearchOutcome::NotFound);
    }

    #[tokio::test]
    async fn moved_center_is_found() {
        let widget = SimulatedWidget::builder()
            .resolver_latency(Duration::from_millis(5))
            .build()
            .unwrap();
        let resolution = ObjectLocator::default().resolve("andromeda");

        let outcome = fast_executor().execute(&resolution, &widget).await;
        assert_eq!(
            outcome,
            SearchOutcome::Found {
                center: Equatorial::new(10.6847, 41.2690)
            }
        );
    }

    #[tokio::test]
    async fn movement_inside_epsilon_is_not_found() {
        let widget = SimulatedWidget::builder()
            .known_name("NEARBY", Equatorial::new(210.805, 54.305))
            .build()
            .unwrap();
        let resolution = ObjectLocator::default().resolve("nearby");

        let outcome = fast_executor().execute(&resolution, &widget).await;
        assert_eq!(outcome, SearchOutcome::NotFound);
        assert_eq!(widget.center().await, Equatorial::new(210.805, 54.305));
    }

    #[tokio::test]
    async fn resolver_errors_collapse_to_not_found() {
        let widget = SimulatedWidget::builder().failing_resolver().build().unwrap();
        let resolution = ObjectLocator::default().resolve("M51");

        let outcome = fast_executor().execute(&resolution, &widget).await;
        assert_eq!(outcome, SearchOutcome::NotFound);
    }

    #[tokio::test]
    async fn completion_signal_skips_the_delay() {
        let widget = SimulatedWidget::builder()
            .reports_completion(true)
            .build()
            .unwrap();
        let executor = SearchExecutor::new(Duration::from_secs(10), DEFAULT_EPSILON_DEG);

        let started = Instant::now();
        let found = executor
            .execute(&ObjectLocator::default().resolve("M33"), &widget)
            .await;
        let missing = executor
            .execute(&ObjectLocator::default().resolve("xyz123"), &widget)
            .await;

        assert_eq!(
            found,
            SearchOutcome::Found {
                center: Equatorial::new(23.4621, 30.6599)
            }
        );
        assert_eq!(missing, SearchOutcome::NotFound);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn slow_resolver_does_not_leak_into_the_next_search() {
        let widget = SimulatedWidget::builder()
            .resolver_latency(Duration::from_millis(100))
            .build()
            .unwrap();
        let executor = SearchExecutor::new(Duration::from_millis(60), DEFAULT_EPSILON_DEG);
        let locator = ObjectLocator::default();

        let first = executor.execute(&locator.resolve("M31"), &widget).await;
        let second = executor.execute(&locator.resolve("xyz123"), &widget).await;

        assert_eq!(
            first,
            SearchOutcome::Found {
                center: Equatorial::new(10.6847, 41.2690)
            }
        );
        assert_eq!(second, SearchOutcome::NotFound);
    }

    #[tokio::test]
    async fn concurrent_searches_are_serialized() {
        let widget = SimulatedWidget::builder()
            .resolver_latency(Duration::from_millis(10))
            .build()
            .unwrap();
        let executor = fast_executor();
        let locator = ObjectLocator::default();
        let first = locator.resolve("M31");
        let second = locator.resolve("M33");

        let started = Instant::now();
        let (first, second) = tokio::join!(
            executor.execute(&first, &widget),
            executor.execute(&second, &widget)
        );

        assert!(first.is_found());
        assert!(second.is_found());
        assert!(started.elapsed() >= Duration::from_millis(60));
        assert_eq!(widget.center().await, Equatorial::new(23.4621, 30.6599));
    }
}
