use std::sync::Arc;
use std::time::Duration;

use crate::config::SkyviewConfig;
use crate::coords::Equatorial;
use crate::dashboard::Dashboard;
use crate::session::READY_STATUS;
use crate::widget::{SimulatedWidget, SkyWidget};

const SETTLE: Duration = Duration::from_millis(150);

fn monitored(asset_root: &std::path::Path) -> (Arc<SimulatedWidget>, Arc<Dashboard>) {
    let config = SkyviewConfig {
        search_delay_ms: 30,
        view_change_debounce_ms: 20,
        asset_root: asset_root.to_path_buf(),
        ..SkyviewConfig::default()
    };
    let widget = Arc::new(SimulatedWidget::builder().build().unwrap());
    let dashboard = Arc::new(Dashboard::new(widget.clone(), &config));
    (widget, dashboard)
}

#[tokio::test]
async fn moving_away_and_back_reloads_the_gallery() {
    let assets = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("SMALLMAGELLANICCLOUD_h4.png"), b"png").unwrap();
    let (widget, dashboard) = monitored(assets.path());
    let monitor = dashboard.spawn_view_monitor();

    dashboard.search("small magellanic cloud").await.unwrap();
    tokio::time::sleep(SETTLE).await;
    assert_eq!(
        dashboard.status().await,
        "Loaded 1 maps for Small Magellanic Cloud - click on an image to select"
    );

    widget.center_on(Equatorial::new(13.3, -72.8)).await;
    tokio::time::sleep(SETTLE).await;
    assert_eq!(
        dashboard.status().await,
        "Navigate closer to object to view images"
    );
    assert!(dashboard.gallery_items().is_empty());

    widget.center_on(Equatorial::new(13.22, -72.79)).await;
    tokio::time::sleep(SETTLE).await;
    assert_eq!(dashboard.gallery_items().len(), 1);

    monitor.abort();
}

#[tokio::test]
async fn bursts_of_view_changes_reload_once_settled() {
    let assets = tempfile::tempdir().unwrap();
    let (widget, dashboard) = monitored(assets.path());
    let monitor = dashboard.spawn_view_monitor();

    dashboard.search("LMC").await.unwrap();
    tokio::time::sleep(SETTLE).await;
    assert_eq!(dashboard.status().await, "No images found for Large Magellanic Cloud");

    for step in 1..=5 {
        widget
            .center_on(Equatorial::new(80.9 + step as f64 * 0.1, -69.8))
            .await;
    }
    tokio::time::sleep(SETTLE).await;
    assert_eq!(
        dashboard.status().await,
        "Navigate closer to object to view images"
    );

    monitor.abort();
}

#[tokio::test]
async fn widget_clicks_and_hovers_reach_the_dashboard() {
    let assets = tempfile::tempdir().unwrap();
    let (widget, dashboard) = monitored(assets.path());
    let monitor = dashboard.spawn_view_monitor();
    let objects = SimulatedWidget::sample_objects();

    widget.hover(objects[1].clone());
    tokio::time::sleep(SETTLE).await;
    assert_eq!(
        dashboard.status().await,
        "Object: Test Object 2 - RA 202.6000°, Dec 54.2000°"
    );

    widget.click(objects[0].clone());
    tokio::time::sleep(SETTLE).await;
    assert_eq!(
        dashboard.status().await,
        "Clicked: Test Object 1 - RA 202.4000°, Dec 54.4000°"
    );
    assert_eq!(widget.center().await, Equatorial::new(202.4, 54.4));

    monitor.abort();
}

#[tokio::test]
async fn monitor_stops_with_the_dashboard() {
    let assets = tempfile::tempdir().unwrap();
    let (widget, dashboard) = monitored(assets.path());
    let monitor = dashboard.spawn_view_monitor();

    assert_eq!(dashboard.status().await, READY_STATUS);
    drop(dashboard);
    widget.center_on(Equatorial::new(1.0, 1.0)).await;

    tokio::time::timeout(Duration::from_secs(1), monitor)
        .await
        .expect("monitor should stop once the dashboard is gone")
        .unwrap();
}
