//! Session View Module
//! Text rendering of breadcrumbs, aggregation tables, and the JSON export
//! payload handed to richer rendering layers.

use crate::agg::{Aggregation, DatasetSummary, GroupTotals, Measure};
use crate::nav::Scene;
use serde::Serialize;

/// Current scene plus its aggregation, value-descending, for export.
#[derive(Serialize)]
pub struct ViewExport<'a> {
    pub scene: &'a Scene,
    pub measure: Measure,
    pub groups: Vec<&'a GroupTotals>,
}

pub fn export_json(scene: &Scene, agg: &Aggregation) -> serde_json::Result<String> {
    let payload = ViewExport {
        scene,
        measure: agg.measure(),
        groups: agg.sorted_desc(),
    };
    serde_json::to_string_pretty(&payload)
}

/// Breadcrumb trail for the active scene.
pub fn breadcrumb(scene: &Scene) -> String {
    let mut trail = vec!["City Overview".to_string()];
    if let Some(city) = scene.city() {
        trail.push(format!("{city} Products"));
    }
    if let Some(product) = scene.product() {
        trail.push(format!("{product} Details"));
    }
    trail.join(" → ")
}

/// One-line dataset overview printed when the session starts.
pub fn summary_lines(summary: &DatasetSummary) -> String {
    let mut out = format!(
        "Loaded {} orders ({} skipped) · {} cities · {} products\n",
        summary.orders, summary.skipped, summary.cities, summary.products
    );
    out.push_str(&format!(
        "Total revenue ${:.2} · {} units",
        summary.total_revenue, summary.total_units
    ));
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        out.push_str(&format!(
            " · {} → {}",
            first.format("%d-%m-%Y"),
            last.format("%d-%m-%Y")
        ));
    }
    out
}

/// Render the active view: breadcrumb, value-descending table capped at
/// `top_limit` rows, and the top-performer line.
pub fn render(scene: &Scene, agg: &Aggregation, top_limit: usize) -> String {
    let mut out = String::new();
    out.push_str(&breadcrumb(scene));
    out.push('\n');

    if agg.is_empty() {
        // A zero-match filter is a valid view, not an error.
        out.push_str("No orders match this view.\n");
        return out;
    }

    let key_header = match scene {
        Scene::Overview => "City",
        Scene::City { .. } => "Product",
        Scene::Product { .. } => "Purchase Type",
    };
    out.push_str(&format!(
        "  {key_header:<24} {:>12} {:>8} {:>8}\n",
        "Revenue", "Units", "Orders"
    ));

    let sorted = agg.sorted_desc();
    for entry in sorted.iter().take(top_limit) {
        out.push_str(&format!(
            "  {:<24} {:>12} {:>8} {:>8}\n",
            entry.key,
            format!("${:.2}", entry.revenue),
            entry.quantity,
            entry.orders
        ));
    }
    if agg.len() > top_limit {
        out.push_str(&format!("  … {} more\n", agg.len() - top_limit));
    }

    if let Some(top) = agg.top() {
        let value = match agg.measure() {
            Measure::Revenue => format!("${:.2}", top.revenue),
            Measure::Quantity => format!("{} units", top.quantity),
        };
        out.push_str(&format!("Top performer: {} ({value})\n", top.key));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn records() -> Vec<Record> {
        vec![
            Record::new(
                "Paris".to_string(),
                "Burger".to_string(),
                Some("Delivery".to_string()),
                5.0,
                2,
                None,
            ),
            Record::new(
                "Lyon".to_string(),
                "Pizza".to_string(),
                Some("Online".to_string()),
                10.0,
                2,
                None,
            ),
        ]
    }

    #[test]
    fn breadcrumb_grows_with_depth() {
        assert_eq!(breadcrumb(&Scene::Overview), "City Overview");
        assert_eq!(
            breadcrumb(&Scene::City {
                city: "Paris".to_string()
            }),
            "City Overview → Paris Products"
        );
        assert_eq!(
            breadcrumb(&Scene::Product {
                city: "Paris".to_string(),
                product: "Burger".to_string()
            }),
            "City Overview → Paris Products → Burger Details"
        );
    }

    #[test]
    fn render_shows_top_performer_and_rows() {
        let recs = records();
        let agg = Aggregation::group_by(&recs, |r| Some(r.city.as_str()), Measure::Revenue);
        let text = render(&Scene::Overview, &agg, 10);
        assert!(text.contains("City Overview"));
        assert!(text.contains("Paris"));
        assert!(text.contains("Top performer: Lyon ($20.00)"));
    }

    #[test]
    fn render_reports_empty_views_explicitly() {
        let recs: Vec<Record> = Vec::new();
        let agg = Aggregation::group_by(&recs, |r| Some(r.city.as_str()), Measure::Revenue);
        let text = render(
            &Scene::City {
                city: "Tokyo".to_string(),
            },
            &agg,
            10,
        );
        assert!(text.contains("No orders match this view."));
    }

    #[test]
    fn render_caps_rows_at_the_limit() {
        let recs: Vec<Record> = ["A", "B", "C"]
            .iter()
            .map(|city| {
                Record::new(
                    city.to_string(),
                    "Burger".to_string(),
                    None,
                    5.0,
                    1,
                    None,
                )
            })
            .collect();
        let agg = Aggregation::group_by(&recs, |r| Some(r.city.as_str()), Measure::Revenue);
        let text = render(&Scene::Overview, &agg, 2);
        assert!(text.contains("… 1 more"));
    }

    #[test]
    fn export_carries_scene_measure_and_sorted_groups() {
        let recs = records();
        let agg = Aggregation::group_by(&recs, |r| Some(r.city.as_str()), Measure::Revenue);
        let json = export_json(&Scene::Overview, &agg).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["scene"]["level"], "overview");
        assert_eq!(value["measure"], "revenue");
        assert_eq!(value["groups"][0]["key"], "Lyon");
        assert_eq!(value["groups"][0]["revenue"], 20.0);
    }
}
