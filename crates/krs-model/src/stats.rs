//! Per-area aggregation results.

use serde::{Deserialize, Serialize};

use crate::risk::AreaStatus;

/// Risk summary of one administrative area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaStats {
    pub status: AreaStatus,
    /// Share of `Berisiko` records, in percent (0-100).
    pub percentage: f64,
    pub count_berisiko: usize,
    pub count_tidak_berisiko: usize,
    pub total: usize,
}

impl AreaStats {
    /// Stats for an area without records.
    pub fn empty() -> Self {
        Self {
            status: AreaStatus::Aman,
            percentage: 0.0,
            count_berisiko: 0,
            count_tidak_berisiko: 0,
            total: 0,
        }
    }

    /// Builds stats from class counts, applying the WHO threshold.
    pub fn from_counts(count_berisiko: usize, count_tidak_berisiko: usize, total: usize) -> Self {
        if total == 0 {
            return Self::empty();
        }
        let percentage = 100.0 * count_berisiko as f64 / total as f64;
        Self {
            status: AreaStatus::from_percentage(percentage),
            percentage,
            count_berisiko,
            count_tidak_berisiko,
            total,
        }
    }

    /// Share of `Tidak Berisiko` records in percent, 0 for an empty area.
    pub fn tidak_berisiko_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.count_tidak_berisiko as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_total_is_aman() {
        let stats = AreaStats::from_counts(0, 0, 0);
        assert_eq!(stats, AreaStats::empty());
        assert!(stats.status.is_aman());
        assert_eq!(stats.tidak_berisiko_percentage(), 0.0);
    }

    #[test]
    fn test_exactly_twenty_percent_is_aman() {
        let stats = AreaStats::from_counts(1, 4, 5);
        assert_eq!(stats.percentage, 20.0);
        assert_eq!(stats.status, AreaStatus::Aman);
    }

    #[test]
    fn test_forty_percent_is_rentan() {
        let stats = AreaStats::from_counts(2, 3, 5);
        assert_eq!(stats.percentage, 40.0);
        assert_eq!(stats.status, AreaStatus::RentanStunting);
        assert_eq!(stats.tidak_berisiko_percentage(), 60.0);
    }
}
