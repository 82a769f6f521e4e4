//! Per-area risk statistics.

use std::collections::BTreeMap;

use krs_model::{AreaRecord, AreaStats, RiskLabel};

#[derive(Default)]
struct Tally {
    berisiko: usize,
    tidak_berisiko: usize,
    total: usize,
}

/// Computes [`AreaStats`] for every distinct area in `records`.
///
/// Each record counts toward its area's total. Only `Berisiko` and
/// `Tidak Berisiko` labels count toward a class, so other labels lower the
/// risk percentage without raising the safe count. Areas are keyed by name in
/// sorted order. The result depends only on the records given; callers
/// recompute it after every filter change.
pub fn compute_area_stats<R: AreaRecord>(records: &[R]) -> BTreeMap<String, AreaStats> {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for record in records {
        let tally = tallies.entry(record.area()).or_default();
        tally.total += 1;
        match record.risk() {
            RiskLabel::Berisiko => tally.berisiko += 1,
            RiskLabel::TidakBerisiko => tally.tidak_berisiko += 1,
            RiskLabel::Other(_) => {}
        }
    }

    let stats: BTreeMap<String, AreaStats> = tallies
        .into_iter()
        .map(|(area, tally)| {
            (
                area.to_string(),
                AreaStats::from_counts(tally.berisiko, tally.tidak_berisiko, tally.total),
            )
        })
        .collect();
    tracing::debug!(
        records = records.len(),
        areas = stats.len(),
        "area statistics computed"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use krs_model::{AreaStatus, SurveyRecord};

    fn record(area: &str, label: RiskLabel) -> SurveyRecord {
        SurveyRecord::new(area, label)
    }

    #[test]
    fn test_empty_input_has_no_areas() {
        let stats = compute_area_stats::<SurveyRecord>(&[]);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_other_labels_count_toward_total_only() {
        let records = vec![
            record("A", RiskLabel::Berisiko),
            record("A", RiskLabel::TidakBerisiko),
            record("A", RiskLabel::Other("Sedang".to_string())),
            record("A", RiskLabel::TidakBerisiko),
        ];
        let stats = &compute_area_stats(&records)["A"];
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count_berisiko, 1);
        assert_eq!(stats.count_tidak_berisiko, 2);
        assert_eq!(stats.percentage, 25.0);
        assert_eq!(stats.status, AreaStatus::RentanStunting);
    }

    #[test]
    fn test_areas_are_independent_and_sorted() {
        let records = vec![
            record("Tanah Sareal", RiskLabel::TidakBerisiko),
            record("Bogor Barat", RiskLabel::Berisiko),
            record("Tanah Sareal", RiskLabel::TidakBerisiko),
        ];
        let stats = compute_area_stats(&records);
        let areas: Vec<&str> = stats.keys().map(String::as_str).collect();
        assert_eq!(areas, vec!["Bogor Barat", "Tanah Sareal"]);
        assert_eq!(stats["Bogor Barat"].percentage, 100.0);
        assert!(stats["Tanah Sareal"].status.is_aman());
    }
}
