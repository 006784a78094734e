use std::fmt::Write;
use crate::client::api::ApiClient;
use crate::client::controller::error::ClientError;
use crate::client::model::stats::SalesStats;
use crate::client::model::RestaurantId;

const BAR_WIDTH: f64 = 30.0;

pub(crate) async fn fetch_stats(api: &ApiClient, restaurant_id: RestaurantId) -> Result<SalesStats, ClientError> {
    api.get_stats(restaurant_id).await
}

/// Renders both charts as text. Whatever the server sent is shown as-is.
pub(crate) fn render(stats: &SalesStats) -> String {
    let dishes: Vec<(&str, f64)> = stats
        .dishes_names
        .iter()
        .zip(&stats.dishes_values)
        .map(|(name, value)| (name.as_str(), *value))
        .collect();
    let levels: Vec<(&str, f64)> = stats
        .levels_data
        .iter()
        .map(|share| (share.name.as_str(), share.value))
        .collect();

    let mut out = String::new();
    chart(&mut out, "Top dishes", &dishes);
    chart(&mut out, "Customer tiers", &levels);
    out
}

fn chart(out: &mut String, title: &str, rows: &[(&str, f64)]) {
    let _ = writeln!(out, "{}", title);
    if rows.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return;
    }
    let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, value)| *value).fold(0.0_f64, f64::max);
    for (label, value) in rows {
        let len = if max > 0.0 { (value.max(0.0) / max * BAR_WIDTH).round() as usize } else { 0 };
        let pad = label_width - label.chars().count();
        let _ = writeln!(out, "  {}{} | {} {}", label, " ".repeat(pad), "#".repeat(len), value);
    }
}
