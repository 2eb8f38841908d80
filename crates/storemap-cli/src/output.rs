//! Plain-text rendering of what the headless view recorded.

use storemap_app::view::StoreRow;
use storemap_app::{Alert, AlertLevel};

use crate::App;

fn level_tag(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Success => "ok",
        AlertLevel::Info => "info",
        AlertLevel::Warning => "warn",
        AlertLevel::Danger => "error",
    }
}

pub(crate) fn format_alert(alert: &Alert) -> String {
    format!("[{}] {}", level_tag(alert.level), alert.message)
}

/// Cuts `text` to `max` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

pub(crate) fn format_rows(rows: &[StoreRow]) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!("{:<5}{:<32}{:<18}ADDRESS", "#", "NAME", "DISTRICT"));
    for row in rows {
        lines.push(format!(
            "{:<5}{:<32}{:<18}{}",
            row.ordinal,
            truncate(&row.name, 30),
            truncate(&row.district, 16),
            truncate(&row.address, 50)
        ));
    }
    lines
}

/// Drains the alerts raised since the last call.
pub(crate) async fn alert_lines(app: &App) -> Vec<String> {
    app.with_view_mut(storemap_app::HeadlessView::take_alerts)
        .await
        .iter()
        .map(format_alert)
        .collect()
}

pub(crate) async fn row_lines(app: &App) -> Vec<String> {
    let rows = app.with_view(|view| view.rows.clone()).await;
    if rows.is_empty() {
        return vec!["no stores found".to_string()];
    }
    format_rows(&rows)
}

pub(crate) async fn print_alerts(app: &App) {
    for line in alert_lines(app).await {
        println!("{line}");
    }
}

pub(crate) async fn print_rows(app: &App) {
    for line in row_lines(app).await {
        println!("{line}");
    }
}
