//! One marker per area with its summary popup.

use std::collections::BTreeMap;

use krs_aggregate::Centroid;
use krs_model::{AreaStats, AreaStatus, WHO_THRESHOLD_PERCENT};
use serde::Serialize;

/// Marker color by area status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Red,
}

impl MarkerColor {
    pub fn for_status(status: AreaStatus) -> Self {
        if status.is_aman() {
            Self::Green
        } else {
            Self::Red
        }
    }

    /// Fill color of the default marker.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Green => "#51cf66",
            Self::Red => "#ff6b6b",
        }
    }

    /// File name of the custom icon for this color.
    pub fn icon_file(self) -> &'static str {
        match self {
            Self::Green => "marker_green.png",
            Self::Red => "marker_red.png",
        }
    }
}

/// A placed area marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaMarker {
    pub area: String,
    pub lat: f64,
    pub lon: f64,
    pub color: MarkerColor,
    pub stats: AreaStats,
}

/// Places a marker at each area's centroid. Areas without a centroid get
/// no marker.
pub fn build_markers(
    stats: &BTreeMap<String, AreaStats>,
    centroids: &BTreeMap<String, Centroid>,
) -> Vec<AreaMarker> {
    stats
        .iter()
        .filter_map(|(area, area_stats)| {
            let Some(centroid) = centroids.get(area) else {
                tracing::debug!(area = %area, "area has no coordinates, skipping marker");
                return None;
            };
            Some(AreaMarker {
                area: area.clone(),
                lat: centroid.lat,
                lon: centroid.lon,
                color: MarkerColor::for_status(area_stats.status),
                stats: area_stats.clone(),
            })
        })
        .collect()
}

struct PopupLine {
    label: String,
    value: String,
}

fn popup_lines(area: &str, stats: &AreaStats) -> Vec<PopupLine> {
    let line = |label: &str, value: String| PopupLine {
        label: label.to_string(),
        value,
    };
    let share = |count: usize| {
        if stats.total == 0 {
            0.0
        } else {
            100.0 * count as f64 / stats.total as f64
        }
    };
    vec![
        line("Kecamatan", area.to_string()),
        line("Status", stats.status.label().to_string()),
        line("Persentase Berisiko", format!("{:.1}%", stats.percentage)),
        line(
            "Tidak Berisiko",
            format!(
                "{} ({:.1}%)",
                stats.count_tidak_berisiko,
                share(stats.count_tidak_berisiko)
            ),
        ),
        line(
            "Berisiko",
            format!("{} ({:.1}%)", stats.count_berisiko, share(stats.count_berisiko)),
        ),
        line("Total Data", stats.total.to_string()),
    ]
}

fn who_note() -> [String; 2] {
    [
        format!("* Standar WHO: >{WHO_THRESHOLD_PERCENT:.0}% Berisiko = Rentan Stunting"),
        format!("* ≤{WHO_THRESHOLD_PERCENT:.0}% Berisiko = Aman"),
    ]
}

/// Plain-text popup summary of an area.
pub fn popup_text(area: &str, stats: &AreaStats) -> String {
    let mut lines: Vec<String> = popup_lines(area, stats)
        .into_iter()
        .map(|line| format!("{}: {}", line.label, line.value))
        .collect();
    lines.extend(who_note());
    lines.join("\n")
}

/// HTML popup summary of an area, with every value escaped.
pub fn popup_html(area: &str, stats: &AreaStats) -> String {
    let mut html = String::from("<div class=\"krs-popup\">");
    for line in popup_lines(area, stats) {
        html.push_str(&format!(
            "<b>{}:</b> {}<br>",
            escape_html(&line.label),
            escape_html(&line.value)
        ));
    }
    html.push_str("<i class=\"krs-note\">");
    html.push_str(&who_note().map(|note| escape_html(&note)).join("<br>"));
    html.push_str("</i></div>");
    html
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_colors_follow_status() {
        assert_eq!(MarkerColor::for_status(AreaStatus::Aman), MarkerColor::Green);
        assert_eq!(
            MarkerColor::for_status(AreaStatus::RentanStunting),
            MarkerColor::Red
        );
        assert_eq!(MarkerColor::Red.icon_file(), "marker_red.png");
    }

    #[test]
    fn test_areas_without_centroid_get_no_marker() {
        let mut stats = BTreeMap::new();
        stats.insert("A".to_string(), AreaStats::from_counts(1, 1, 2));
        stats.insert("B".to_string(), AreaStats::from_counts(0, 2, 2));
        let mut centroids = BTreeMap::new();
        centroids.insert("B".to_string(), Centroid { lat: -6.6, lon: 106.8 });

        let markers = build_markers(&stats, &centroids);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].area, "B");
        assert_eq!(markers[0].color, MarkerColor::Green);
    }

    #[test]
    fn test_popup_html_escapes_area_names() {
        let html = popup_html("<script>", &AreaStats::from_counts(1, 0, 1));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&gt;20% Berisiko"));
    }
}
