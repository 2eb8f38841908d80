//! Line-driven session: plain lines are searches, `:` lines are commands.

use std::sync::Arc;
use std::time::Duration;

use storemap_app::{DebounceMode, Debouncer, MapClickOutcome, RefreshOutcome};
use storemap_core::LatLng;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output::{alert_lines, print_alerts, print_rows, row_lines};
use crate::{login, App, Credentials};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Line {
    Empty,
    Quit,
    Rows,
    Heat,
    Districts,
    Edit,
    Add,
    Click(LatLng),
    /// District filter; empty clears it.
    InDistrict(String),
    Search(String),
}

pub(crate) fn parse_line(line: &str) -> Result<Line, String> {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return Ok(if line.is_empty() {
            Line::Empty
        } else {
            Line::Search(line.to_string())
        });
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    match name {
        "quit" | "q" => Ok(Line::Quit),
        "rows" => Ok(Line::Rows),
        "heat" => Ok(Line::Heat),
        "districts" => Ok(Line::Districts),
        "edit" => Ok(Line::Edit),
        "add" => Ok(Line::Add),
        "in" => Ok(Line::InDistrict(parts.collect::<Vec<_>>().join(" "))),
        "click" => {
            let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err("usage: :click LAT LNG".to_string());
            };
            let lat = lat.parse().map_err(|_| format!("bad latitude {lat:?}"))?;
            let lng = lng.parse().map_err(|_| format!("bad longitude {lng:?}"))?;
            Ok(Line::Click(LatLng::new(lat, lng)))
        }
        other => Err(format!("unknown command :{other}")),
    }
}

/// Runs one search refresh and returns what to show for it: any alerts, then
/// the table when the response was applied.
pub(crate) async fn search_report(app: &App) -> Vec<String> {
    let outcome = app.refresh_stores().await;
    let mut lines = alert_lines(app).await;
    match outcome {
        Ok(RefreshOutcome::Applied(_)) => lines.extend(row_lines(app).await),
        Ok(RefreshOutcome::Suppressed | RefreshOutcome::Stale) => {}
        Err(err) => tracing::debug!(error = %err, "debounced search failed"),
    }
    lines
}

/// Debounced search that prints its results once the quiet period ends.
fn search_printer(app: &Arc<App>, quiet: Duration) -> Debouncer {
    let app = Arc::clone(app);
    Debouncer::new(quiet, DebounceMode::Trailing, move || {
        let app = Arc::clone(&app);
        async move {
            for line in search_report(&app).await {
                println!("{line}");
            }
        }
    })
}

/// Runs until `:quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading stdin fails.
pub(crate) async fn run(
    app: &Arc<App>,
    credentials: Option<&Credentials>,
    quiet: Duration,
) -> anyhow::Result<()> {
    if credentials.is_some() {
        if let Err(err) = login(app, credentials).await {
            tracing::warn!(error = %err, "continuing without admin session");
        }
    }
    if let Err(err) = app.init().await {
        tracing::warn!(error = %err, "initial store load failed");
    }
    print_alerts(app).await;
    print_rows(app).await;

    let search = search_printer(app, quiet);
    let mut text = String::new();
    let mut district = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(raw) = lines.next_line().await? {
        let line = match parse_line(&raw) {
            Ok(line) => line,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        match line {
            Line::Empty => {}
            Line::Quit => break,
            Line::Rows => print_rows(app).await,
            Line::Heat => println!("heatmap {}", on_off(app.toggle_heatmap().await)),
            Line::Districts => println!("districts {}", on_off(app.toggle_districts().await)),
            Line::Edit => {
                if let Ok(on) = app.toggle_edit_mode().await {
                    println!("edit mode {}", on_off(on));
                }
            }
            Line::Add => {
                if let Ok(on) = app.toggle_map_add_mode().await {
                    println!("map add mode {}", on_off(on));
                }
            }
            Line::Click(at) => match app.map_click(at).await {
                MapClickOutcome::Ignored => println!("map add mode is off"),
                MapClickOutcome::FormOpened { district } => println!(
                    "new store at {at} in {}",
                    district.as_deref().unwrap_or("unknown district")
                ),
            },
            Line::InDistrict(name) => {
                district = name;
                app.set_search_input(text.clone(), district.clone()).await;
                search.trigger();
            }
            Line::Search(query) => {
                text = query;
                app.set_search_input(text.clone(), district.clone()).await;
                search.trigger();
            }
        }
        print_alerts(app).await;
    }

    search.cancel();
    Ok(())
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use storemap_app::{HeadlessView, LocatorApp};
    use storemap_client::{RetryPolicy, StoreMapClient};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn app_for(server: &MockServer) -> App {
        let client = StoreMapClient::with_base_url(
            &server.uri(),
            5,
            RetryPolicy {
                max_attempts: 1,
                delay: Duration::ZERO,
            },
        )
        .expect("client construction should not fail");
        LocatorApp::new(client, HeadlessView::new())
    }

    #[tokio::test]
    async fn search_report_lists_matching_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stores"))
            .and(query_param("q", "mart"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "name": "Minimart",
                "address": "1 Hang Bai",
                "phone": null,
                "open_hours": null,
                "district": "Hoan Kiem",
                "latitude": 21.02,
                "longitude": 105.85,
                "image": null
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&server);
        app.set_search_input("mart".to_string(), String::new()).await;
        let lines = search_report(&app).await;

        assert_eq!(lines.len(), 2, "header plus one row: {lines:?}");
        assert!(lines[0].starts_with('#'));
        assert!(lines[1].contains("Minimart"));
        assert!(lines[1].contains("Hoan Kiem"));
    }

    #[tokio::test]
    async fn search_report_shows_the_failure_alert() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stores"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let app = app_for(&server);
        let lines = search_report(&app).await;

        assert_eq!(
            lines,
            vec!["[warn] Could not load stores. Please try again.".to_string()]
        );
    }

    #[test]
    fn plain_text_is_a_search() {
        assert_eq!(parse_line("  mart "), Ok(Line::Search("mart".to_string())));
        assert_eq!(parse_line("   "), Ok(Line::Empty));
    }

    #[test]
    fn click_parses_coordinates() {
        assert_eq!(
            parse_line(":click 21.03 105.82"),
            Ok(Line::Click(LatLng::new(21.03, 105.82)))
        );
        assert!(parse_line(":click 21.03").is_err());
        assert!(parse_line(":click north 105.82").is_err());
    }

    #[test]
    fn district_filter_keeps_spaces() {
        assert_eq!(
            parse_line(":in Hoan Kiem"),
            Ok(Line::InDistrict("Hoan Kiem".to_string()))
        );
        assert_eq!(parse_line(":in"), Ok(Line::InDistrict(String::new())));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert_eq!(parse_line(":fly"), Err("unknown command :fly".to_string()));
        assert_eq!(parse_line(":q"), Ok(Line::Quit));
    }
}
