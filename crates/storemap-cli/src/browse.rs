//! Read-only commands: stores, districts, point lookup and statistics.

use storemap_core::LatLng;

use crate::output::{print_alerts, print_rows};
use crate::App;

/// Lists stores matching the filters.
///
/// # Errors
///
/// Returns an error if the store list cannot be fetched.
pub(crate) async fn run_stores(
    app: &App,
    query: &str,
    district: &str,
    heatmap: bool,
) -> anyhow::Result<()> {
    app.set_search_input(query, district).await;
    if heatmap {
        app.toggle_heatmap().await;
    }
    let result = app.refresh_stores().await;
    print_alerts(app).await;
    result.map_err(|e| anyhow::anyhow!(e.user_message()))?;

    print_rows(app).await;
    if heatmap {
        let heat = app.with_view(|view| view.heat.clone()).await;
        println!("heat points: {}", heat.len());
        for point in heat {
            println!("  {} (weight {})", point.at, point.weight);
        }
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the district list cannot be loaded.
pub(crate) async fn run_districts(app: &App) -> anyhow::Result<()> {
    let districts = app.load_districts().await;
    print_alerts(app).await;
    if districts.is_empty() {
        anyhow::bail!("no districts available");
    }
    println!("{:<24}{:<10}HOLES", "DISTRICT", "POLYGONS");
    for district in districts {
        let outlines = district.outlines();
        let holes: usize = outlines.iter().map(|o| o.holes.len()).sum();
        println!("{:<24}{:<10}{holes}", district.name, outlines.len());
    }
    Ok(())
}

/// Prints the district containing the point, or a not-found line.
///
/// # Errors
///
/// Returns an error if the district list cannot be loaded.
pub(crate) async fn run_locate(app: &App, lat: f64, lng: f64) -> anyhow::Result<()> {
    if app.load_districts().await.is_empty() {
        print_alerts(app).await;
        anyhow::bail!("no districts available");
    }
    let at = LatLng::new(lat, lng);
    match app.districts().locate(at) {
        Some(name) => println!("{at}: {name}"),
        None => println!("{at}: no district found"),
    }
    Ok(())
}

/// Bar-chart style store counts per district.
///
/// # Errors
///
/// Returns an error if the statistics cannot be fetched.
pub(crate) async fn run_stats(app: &App) -> anyhow::Result<()> {
    let result = app.district_stats().await;
    print_alerts(app).await;
    let stats = result.map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if stats.is_empty() {
        println!("no statistics available");
        return Ok(());
    }
    for (district, count) in stats.bars() {
        let width = usize::try_from(count.min(60)).unwrap_or(60);
        println!("{district:<24}{count:>5} {}", "#".repeat(width));
    }
    println!("{:<24}{:>5}", "TOTAL", stats.total());
    Ok(())
}
