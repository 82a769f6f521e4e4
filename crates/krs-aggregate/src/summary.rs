//! Dashboard totals and marker positions.

use std::collections::BTreeMap;

use krs_model::{AreaRecord, AreaStats, AreaStatus};
use serde::Serialize;

/// Headline numbers for a filtered dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_records: usize,
    pub area_count: usize,
    pub aman_count: usize,
    pub rentan_count: usize,
}

impl DashboardSummary {
    /// Summarizes `stats` computed over `total_records` records.
    pub fn new(total_records: usize, stats: &BTreeMap<String, AreaStats>) -> Self {
        let rentan_count = stats
            .values()
            .filter(|area| area.status == AreaStatus::RentanStunting)
            .count();
        Self {
            total_records,
            area_count: stats.len(),
            aman_count: stats.len() - rentan_count,
            rentan_count,
        }
    }
}

/// Mean position of a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Default)]
struct Accumulator {
    lat: f64,
    lon: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, (lat, lon): (f64, f64)) {
        self.lat += lat;
        self.lon += lon;
        self.count += 1;
    }

    fn centroid(&self) -> Option<Centroid> {
        (self.count > 0).then(|| Centroid {
            lat: self.lat / self.count as f64,
            lon: self.lon / self.count as f64,
        })
    }
}

/// Mean coordinates per area over the records that have both coordinates.
///
/// Areas without any located record are absent from the result.
pub fn area_centroids<R: AreaRecord>(records: &[R]) -> BTreeMap<String, Centroid> {
    let mut sums: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for record in records {
        if let Some(position) = record.coordinates() {
            sums.entry(record.area()).or_default().add(position);
        }
    }
    sums.into_iter()
        .filter_map(|(area, sum)| sum.centroid().map(|c| (area.to_string(), c)))
        .collect()
}

/// Mean of all valid coordinates, or `None` when no record is located.
pub fn map_center<R: AreaRecord>(records: &[R]) -> Option<Centroid> {
    let mut sum = Accumulator::default();
    for position in records.iter().filter_map(AreaRecord::coordinates) {
        sum.add(position);
    }
    sum.centroid()
}
