//! Risk map as a standalone Leaflet page or a GeoJSON collection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use krs_aggregate::{Centroid, area_centroids, map_center};
use krs_model::{AreaRecord, AreaStats};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{ReportError, Result};
use crate::markers::{AreaMarker, MarkerColor, build_markers, escape_html, popup_html};

/// Zoom level used when none is configured.
pub const DEFAULT_ZOOM: u8 = 12;

const LEAFLET_VERSION: &str = "1.9.4";
const ICON_SIZE: u32 = 40;

/// Map rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapOptions {
    pub zoom: u8,
    /// Directory holding `marker_green.png` and `marker_red.png`.
    pub icon_dir: Option<PathBuf>,
    pub title: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            icon_dir: None,
            title: "Peta Keluarga Rentan Stunting".to_string(),
        }
    }
}

impl MapOptions {
    /// Custom icon directory, if both icon files exist in it.
    fn usable_icon_dir(&self) -> Option<&Path> {
        let dir = self.icon_dir.as_deref()?;
        let complete = [MarkerColor::Green, MarkerColor::Red]
            .iter()
            .all(|color| dir.join(color.icon_file()).is_file());
        if complete {
            Some(dir)
        } else {
            tracing::warn!(
                icon_dir = %dir.display(),
                "marker icons not found, using default markers"
            );
            None
        }
    }
}

/// Everything needed to draw the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMap {
    pub center: Centroid,
    pub zoom: u8,
    pub markers: Vec<AreaMarker>,
}

impl RiskMap {
    /// Places one marker per located area and centers the map on the mean of
    /// all valid coordinates.
    ///
    /// Fails with [`ReportError::NoCoordinates`] when no record is located.
    pub fn build<R: AreaRecord>(
        records: &[R],
        stats: &BTreeMap<String, AreaStats>,
        zoom: u8,
    ) -> Result<Self> {
        let center = map_center(records).ok_or(ReportError::NoCoordinates)?;
        let markers = build_markers(stats, &area_centroids(records));
        tracing::info!(
            markers = markers.len(),
            areas = stats.len(),
            lat = center.lat,
            lon = center.lon,
            "map built"
        );
        Ok(Self {
            center,
            zoom,
            markers,
        })
    }

    /// GeoJSON `FeatureCollection` with one point per marker.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .markers
            .iter()
            .map(|marker| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [marker.lon, marker.lat],
                    },
                    "properties": {
                        "namakecamatan": marker.area,
                        "status": marker.stats.status,
                        "persentase": marker.stats.percentage,
                        "berisiko": marker.stats.count_berisiko,
                        "tidak_berisiko": marker.stats.count_tidak_berisiko,
                        "total": marker.stats.total,
                        "marker_color": marker.color,
                    },
                })
            })
            .collect();
        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }

    /// Standalone HTML page drawing the map with Leaflet.
    pub fn to_html(&self, options: &MapOptions) -> Result<String> {
        #[derive(Serialize)]
        struct MarkerData<'a> {
            lat: f64,
            lon: f64,
            color: &'static str,
            icon: Option<String>,
            popup: String,
            area: &'a str,
        }

        let icon_dir = options.usable_icon_dir();
        let markers: Vec<MarkerData<'_>> = self
            .markers
            .iter()
            .map(|marker| MarkerData {
                lat: marker.lat,
                lon: marker.lon,
                color: marker.color.hex(),
                icon: icon_dir.map(|dir| dir.join(marker.color.icon_file()).display().to_string()),
                popup: popup_html(&marker.area, &marker.stats),
                area: &marker.area,
            })
            .collect();
        let data = script_safe(&serde_json::to_string(&markers)?);
        let center = script_safe(&serde_json::to_string(&[self.center.lat, self.center.lon])?);

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.js"></script>
<style>
html, body, #map {{ height: 100%; margin: 0; }}
.krs-popup {{ font-size: 14px; min-width: 250px; }}
.krs-note {{ color: #999; font-size: 11px; }}
</style>
</head>
<body>
<div id="map"></div>
<script>
const markers = {data};
const map = L.map("map", {{ preferCanvas: true }}).setView({center}, {zoom});
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
for (const m of markers) {{
  const layer = m.icon
    ? L.marker([m.lat, m.lon], {{ icon: L.icon({{
        iconUrl: m.icon,
        iconSize: [{size}, {size}],
        iconAnchor: [{half}, {size}],
        popupAnchor: [0, -{size}]
      }}) }})
    : L.circleMarker([m.lat, m.lon], {{
        radius: 10, color: m.color, fillColor: m.color, fillOpacity: 0.85
      }});
  layer.bindPopup(m.popup, {{ maxWidth: 400 }}).bindTooltip(m.area).addTo(map);
}}
</script>
</body>
</html>
"#,
            title = escape_html(&options.title),
            leaflet = LEAFLET_VERSION,
            data = data,
            center = center,
            zoom = self.zoom,
            size = ICON_SIZE,
            half = ICON_SIZE / 2,
        ))
    }

    /// Writes the map to `path`: GeoJSON for `.geojson`/`.json`, HTML otherwise.
    pub fn write(&self, path: &Path, options: &MapOptions) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let content = match extension.as_deref() {
            Some("geojson" | "json") => serde_json::to_string_pretty(&self.to_geojson())?,
            _ => self.to_html(options)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
        }
        std::fs::write(path, content).map_err(|e| ReportError::io(path, e))?;
        tracing::info!(path = %path.display(), "map written");
        Ok(())
    }
}

/// Keeps embedded JSON from closing the surrounding `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
