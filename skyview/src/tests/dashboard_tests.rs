use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::float_ext::FloatExt;
use common::log_setup::setup_logging;

use crate::config::SkyviewConfig;
use crate::coords::Equatorial;
use crate::dashboard::{not_found_status, Dashboard};
use crate::gallery::{GalleryOutcome, MapKind};
use crate::navigation::ViewCommand;
use crate::search::SearchOutcome;
use crate::session::READY_STATUS;
use crate::widget::{SimulatedWidget, SkyWidget};

fn fast_config(asset_root: &Path) -> SkyviewConfig {
    SkyviewConfig {
        search_delay_ms: 30,
        view_change_debounce_ms: 20,
        asset_root: asset_root.to_path_buf(),
        ..SkyviewConfig::default()
    }
}

fn dashboard_with(config: &SkyviewConfig) -> (Arc<SimulatedWidget>, Dashboard) {
    let widget = Arc::new(SimulatedWidget::builder().build().unwrap());
    let dashboard = Dashboard::new(widget.clone(), config);
    (widget, dashboard)
}

#[tokio::test]
async fn known_object_loads_its_gallery() {
    setup_logging("debug");

    let assets = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("PINWHEELGALAXY(M101)_h3.png"), b"png").unwrap();
    std::fs::write(assets.path().join("PINWHEELGALAXY(M101)_age.jpg"), b"jpg").unwrap();
    let (widget, dashboard) = dashboard_with(&fast_config(assets.path()));

    let outcome = dashboard.search("  pinwheel ").await;

    assert_eq!(
        outcome,
        Some(SearchOutcome::Found {
            center: Equatorial::new(210.802, 54.349)
        })
    );
    assert_eq!(widget.center().await, Equatorial::new(210.802, 54.349));
    assert_eq!(
        dashboard.loaded_object().await.unwrap().name,
        "Pinwheel Galaxy (M101)"
    );
    assert_eq!(
        dashboard.status().await,
        "Loaded 2 maps for Pinwheel Galaxy (M101) - click on an image to select"
    );

    let items = dashboard.gallery_items();
    let kinds: Vec<_> = items.iter().map(|item| item.kind).collect();
    assert_eq!(kinds, vec![MapKind::H3, MapKind::AgeLumWeighted]);
    assert_eq!(items[1].path, PathBuf::from("PINWHEELGALAXY(M101)_age.jpg"));

    assert_eq!(
        dashboard.select_gallery_item(1).await.as_deref(),
        Some("Viewing Pinwheel Galaxy (M101) map: Age (Lum. Weighted) (2/2)")
    );
    assert_eq!(dashboard.select_gallery_item(2).await, None);
}

#[tokio::test]
async fn resolver_found_object_without_images() {
    let assets = tempfile::tempdir().unwrap();
    let (_widget, dashboard) = dashboard_with(&fast_config(assets.path()));

    let outcome = dashboard.search("andromeda").await.unwrap();

    assert_eq!(
        outcome,
        SearchOutcome::Found {
            center: Equatorial::new(10.6847, 41.2690)
        }
    );
    assert_eq!(
        dashboard.status().await,
        "No images found for Andromeda Galaxy (M31)"
    );
    assert!(dashboard.gallery_items().is_empty());
}

#[tokio::test]
async fn not_found_suggests_alternatives() {
    let assets = tempfile::tempdir().unwrap();
    let (widget, dashboard) = dashboard_with(&fast_config(assets.path()));

    assert_eq!(dashboard.search("ngc 99").await, Some(SearchOutcome::NotFound));
    assert_eq!(dashboard.status().await, "\"ngc 99\" not found. Try: NGC 99");

    assert_eq!(dashboard.search("xyz123").await, Some(SearchOutcome::NotFound));
    assert_eq!(
        dashboard.status().await,
        "\"xyz123\" not found. Try NGC objects like \"NGC 7025\" or galaxy names like \"Andromeda\""
    );

    assert!(dashboard.loaded_object().await.is_none());
    assert_eq!(widget.center().await, Equatorial::new(210.8, 54.3));
}

#[test]
fn not_found_status_caps_suggestions_at_three() {
    assert_eq!(
        not_found_status("galaxy"),
        "\"galaxy\" not found. Try: Whirlpool Galaxy, Pinwheel Galaxy, Sombrero Galaxy"
    );
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let assets = tempfile::tempdir().unwrap();
    let (_widget, dashboard) = dashboard_with(&fast_config(assets.path()));

    assert_eq!(dashboard.search("   ").await, None);
    assert_eq!(dashboard.status().await, READY_STATUS);
}

#[tokio::test]
async fn toggling_maps_reloads_the_gallery() {
    let assets = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("LARGEMAGELLANICCLOUD_h3.fits"), b"fits").unwrap();
    let config = SkyviewConfig {
        selected_maps: vec![MapKind::H3],
        ..fast_config(assets.path())
    };
    let (_widget, dashboard) = dashboard_with(&config);

    dashboard.search("LMC").await.unwrap();
    assert_eq!(dashboard.gallery_items().len(), 1);

    assert!(!dashboard.toggle_map(MapKind::H3).await);
    assert!(dashboard.selected_maps().is_empty());
    assert!(dashboard.gallery_items().is_empty());
    assert_eq!(
        dashboard.status().await,
        "Viewing Large Magellanic Cloud - select map options to load images"
    );

    assert!(dashboard.toggle_map(MapKind::H3).await);
    assert_eq!(
        dashboard.refresh_gallery().await.map(|outcome| match outcome {
            GalleryOutcome::Loaded(items) => items.len(),
            _ => 0,
        }),
        Some(1)
    );
}

#[tokio::test]
async fn refresh_without_loaded_object_does_nothing() {
    let assets = tempfile::tempdir().unwrap();
    let (_widget, dashboard) = dashboard_with(&fast_config(assets.path()));

    assert_eq!(dashboard.refresh_gallery().await, None);
    assert_eq!(dashboard.status().await, READY_STATUS);
}

#[tokio::test]
async fn view_commands_update_widget_and_status() {
    let assets = tempfile::tempdir().unwrap();
    let (widget, dashboard) = dashboard_with(&fast_config(assets.path()));

    assert_eq!(
        dashboard.apply(ViewCommand::ZoomIn).await,
        "Center: RA 210.8000°, Dec 54.3000° | FOV: 1.200°"
    );

    assert_eq!(
        dashboard.apply(ViewCommand::CycleSurvey).await,
        "Format: FITS | Survey: P/2MASS/color"
    );
    assert_eq!(widget.view().image_layer, "P/2MASS/color");

    assert_eq!(
        dashboard.apply(ViewCommand::CycleFormat).await,
        "Format: JPEG | Survey: P/2MASS/color"
    );
    assert_eq!(widget.view().image_layer, "P/2MASS/color?format=jpeg");
    assert_eq!(
        dashboard.status().await,
        "Format: JPEG | Survey: P/2MASS/color"
    );
}

#[tokio::test]
async fn reset_returns_to_initial_view_and_forgets_the_object() {
    let assets = tempfile::tempdir().unwrap();
    let (widget, dashboard) = dashboard_with(&fast_config(assets.path()));

    dashboard.search("SMC").await.unwrap();
    dashboard.apply(ViewCommand::ZoomOut).await;
    assert!(dashboard.loaded_object().await.is_some());

    let status = dashboard.apply(ViewCommand::Reset).await;

    assert_eq!(status, "Center: RA 210.8000°, Dec 54.3000° | FOV: 1.500°");
    assert_eq!(widget.center().await, Equatorial::new(210.8, 54.3));
    assert_eq!(widget.fov().await, 1.5);
    assert!(dashboard.loaded_object().await.is_none());
}

#[tokio::test]
async fn clicks_and_hovers_report_the_object() {
    let assets = tempfile::tempdir().unwrap();
    let (widget, dashboard) = dashboard_with(&fast_config(assets.path()));
    let objects = SimulatedWidget::sample_objects();

    assert_eq!(
        dashboard.object_hovered(&objects[2]).await,
        "Object: Test Object 3 - RA 202.2000°, Dec 54.6000°"
    );

    let mut unnamed = objects[0].clone();
    unnamed.name = None;
    assert_eq!(
        dashboard.object_clicked(&unnamed).await,
        "Clicked: Object - RA 202.4000°, Dec 54.4000°"
    );
    assert_eq!(widget.center().await, Equatorial::new(202.4, 54.4));
    assert!(widget.fov().await.approximately_eq(0.9));
}

#[tokio::test]
async fn unknown_default_survey_keeps_widget_and_picker_in_step() {
    let assets = tempfile::tempdir().unwrap();
    let config = SkyviewConfig {
        default_survey: "P/NOT/A/SURVEY".to_string(),
        ..fast_config(assets.path())
    };
    let widget = Arc::new(
        SimulatedWidget::builder()
            .image_layer(config.initial_image_layer())
            .build()
            .unwrap(),
    );
    let dashboard = Dashboard::new(widget.clone(), &config);

    assert_eq!(widget.view().image_layer, "P/DSS2/color");
    assert_eq!(
        dashboard.apply(ViewCommand::CycleSurvey).await,
        "Format: FITS | Survey: P/2MASS/color"
    );
    assert_eq!(widget.view().image_layer, "P/2MASS/color");
}
