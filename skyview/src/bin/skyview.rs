use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common::log_setup::setup_logging;
use skyview::config::{SkyviewConfig, DEFAULT_CONFIG_PATH};
use skyview::dashboard::Dashboard;
use skyview::gallery::MapKind;
use skyview::navigation::ViewCommand;
use skyview::widget::SimulatedWidget;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};

const HELP: &str = "\
Type an object name or coordinates to search.
  + / -        zoom in / out
  r            reset view
  s / f        cycle survey / image format
  click <n>    click sample object n (1-3)
  hover <n>    hover sample object n (1-3)
  map <kind>   toggle a map kind (e.g. map h3)
  view <n>     show gallery image n
  help, quit";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = SkyviewConfig::load_or_default(&config_path);
    setup_logging(&config.log_level);

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let Some(widget) = bootstrap_widget(&config, &mut input).await? else {
        return Ok(());
    };
    let dashboard = Arc::new(Dashboard::new(widget.clone(), &config));
    let monitor = dashboard.spawn_view_monitor();

    println!("{HELP}");
    println!("{}", dashboard.status().await);

    while let Some(line) = input.next_line().await? {
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        let mut chars = line.chars();
        let key_command = match (chars.next(), chars.next()) {
            (Some(key), None) => ViewCommand::from_key(key),
            _ => None,
        };

        if let Some(view_command) = key_command {
            dashboard.apply(view_command).await;
        } else {
            match command {
                "" => continue,
                "quit" | "exit" => break,
                "help" => {
                    println!("{HELP}");
                    continue;
                }
                "click" | "hover" => match sample_object(argument) {
                    Some(object) if command == "click" => {
                        dashboard.object_clicked(&object).await;
                    }
                    Some(object) => {
                        dashboard.object_hovered(&object).await;
                    }
                    None => {
                        println!("Expected a sample object number between 1 and 3");
                        continue;
                    }
                },
                "map" => match argument.parse::<MapKind>() {
                    Ok(kind) => {
                        let selected = dashboard.toggle_map(kind).await;
                        println!(
                            "{} {}",
                            kind.label(),
                            if selected { "selected" } else { "deselected" }
                        );
                    }
                    Err(_) => {
                        let keys: Vec<_> = MapKind::all().iter().map(MapKind::key).collect();
                        println!("Unknown map kind. Available: {}", keys.join(", "));
                        continue;
                    }
                },
                "view" => {
                    let selected = argument
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1));
                    let shown = match selected {
                        Some(index) => dashboard.select_gallery_item(index).await,
                        None => None,
                    };
                    if shown.is_none() {
                        println!("No such gallery image");
                        continue;
                    }
                }
                _ => {
                    dashboard.search(line).await;
                }
            }
        }

        println!("{}", dashboard.status().await);
        for (index, item) in dashboard.gallery_items().iter().enumerate() {
            println!("  [{}] {} ({})", index + 1, item.label(), item.path.display());
        }
    }

    monitor.abort();
    info!("Exiting");
    Ok(())
}

/// Loads the widget, asking the user whether to retry after each failure.
/// Returns `None` if the user gives up.
async fn bootstrap_widget(
    config: &SkyviewConfig,
    input: &mut Lines<BufReader<Stdin>>,
) -> Result<Option<Arc<SimulatedWidget>>> {
    let mut attempt: u32 = 0;

    loop {
        let mut builder = SimulatedWidget::builder()
            .initial_view(config.initial_view)
            .image_layer(config.initial_image_layer())
            .resolver_latency(Duration::from_millis(config.simulator.resolver_latency_ms))
            .reports_completion(config.simulator.reports_completion);
        if attempt < config.simulator.bootstrap_failures {
            builder = builder.bootstrap_failure(format!("attempt {} timed out", attempt + 1));
        }
        attempt += 1;

        match builder.build() {
            Ok(widget) => {
                info!(attempt, "Sky map widget loaded");
                return Ok(Some(Arc::new(widget)));
            }
            Err(err) => {
                error!("{err}");
                println!("{err}. Press Enter to retry, or type quit.");
                match input.next_line().await? {
                    Some(answer) if answer.trim() != "quit" => continue,
                    _ => return Ok(None),
                }
            }
        }
    }
}

fn sample_object(argument: &str) -> Option<skyview::widget::SkyObject> {
    let index = argument.parse::<usize>().ok()?.checked_sub(1)?;
    SimulatedWidget::sample_objects().into_iter().nth(index)
}
