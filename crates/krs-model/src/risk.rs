//! Risk labels, area status and the fixed decision thresholds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classifier scores at or above this value are labeled [`RiskLabel::Berisiko`].
pub const RISK_SCORE_THRESHOLD: f64 = 0.5;

/// WHO rule: an area is at risk when strictly more than this share of its
/// households is labeled [`RiskLabel::Berisiko`].
pub const WHO_THRESHOLD_PERCENT: f64 = 20.0;

/// Per-household stunting risk label.
///
/// Labels outside the two canonical values are kept verbatim in [`RiskLabel::Other`];
/// they still count toward an area's total but toward neither class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLabel {
    Berisiko,
    TidakBerisiko,
    Other(String),
}

impl RiskLabel {
    /// Canonical text for "at risk".
    pub const BERISIKO: &'static str = "Berisiko";
    /// Canonical text for "not at risk".
    pub const TIDAK_BERISIKO: &'static str = "Tidak Berisiko";

    /// Maps canonical text to a label; anything else becomes [`RiskLabel::Other`].
    pub fn from_text(text: &str) -> Self {
        match text {
            Self::BERISIKO => Self::Berisiko,
            Self::TIDAK_BERISIKO => Self::TidakBerisiko,
            other => Self::Other(other.to_string()),
        }
    }

    /// Applies the fixed decision rule to a classifier score.
    pub fn from_score(score: f64) -> Self {
        if score >= RISK_SCORE_THRESHOLD {
            Self::Berisiko
        } else {
            Self::TidakBerisiko
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Berisiko => Self::BERISIKO,
            Self::TidakBerisiko => Self::TIDAK_BERISIKO,
            Self::Other(text) => text,
        }
    }

    pub fn is_berisiko(&self) -> bool {
        matches!(self, Self::Berisiko)
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RiskLabel {
    fn from(value: String) -> Self {
        Self::from_text(&value)
    }
}

impl From<RiskLabel> for String {
    fn from(value: RiskLabel) -> Self {
        match value {
            RiskLabel::Other(text) => text,
            other => other.as_str().to_string(),
        }
    }
}

/// Area classification under the WHO threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaStatus {
    #[serde(rename = "Aman")]
    Aman,
    #[serde(rename = "Rentan Stunting")]
    RentanStunting,
}

impl AreaStatus {
    /// Strict `>` comparison: exactly 20% is still [`AreaStatus::Aman`].
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > WHO_THRESHOLD_PERCENT {
            Self::RentanStunting
        } else {
            Self::Aman
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Aman => "Aman",
            Self::RentanStunting => "Rentan Stunting",
        }
    }

    pub fn is_aman(self) -> bool {
        self == Self::Aman
    }
}

impl fmt::Display for AreaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
