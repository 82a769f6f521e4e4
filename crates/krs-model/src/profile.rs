//! Household questionnaire answers.
//!
//! A [`FamilyProfile`] is built fresh for every submission and consumed once by
//! the classifier adapter. Categorical answers parse from the exact labels shown
//! on the questionnaire; the numeric codes they map to are fixed because the
//! scaler and the model were fitted on them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A questionnaire label that matches none of the known options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {category} option '{value}'")]
pub struct ParseCategoryError {
    pub category: &'static str,
    pub value: String,
}

/// Binary questionnaire answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Answer {
    Ya,
    #[default]
    Tidak,
}

impl Answer {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ya => "Ya",
            Self::Tidak => "Tidak",
        }
    }

    /// `Ya` maps to 1, `Tidak` to 0.
    pub fn code(self) -> u8 {
        match self {
            Self::Ya => 1,
            Self::Tidak => 0,
        }
    }
}

impl FromStr for Answer {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("ya") {
            Ok(Self::Ya)
        } else if trimmed.eq_ignore_ascii_case("tidak") {
            Ok(Self::Tidak)
        } else {
            Err(ParseCategoryError {
                category: "answer",
                value: s.to_string(),
            })
        }
    }
}

impl TryFrom<String> for Answer {
    type Error = ParseCategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Answer> for String {
    fn from(value: Answer) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Main household water source, ordinal codes 1-10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WaterSource {
    #[default]
    AirKemasan,
    LedengPam,
    SumurBor,
    SumurTerlindung,
    SumurTakTerlindung,
    MataAirTerlindung,
    MataAirTakTerlindung,
    AirPermukaan,
    AirHujan,
    Lainnya,
}

impl WaterSource {
    /// All options in questionnaire order.
    pub const ALL: [WaterSource; 10] = [
        Self::AirKemasan,
        Self::LedengPam,
        Self::SumurBor,
        Self::SumurTerlindung,
        Self::SumurTakTerlindung,
        Self::MataAirTerlindung,
        Self::MataAirTakTerlindung,
        Self::AirPermukaan,
        Self::AirHujan,
        Self::Lainnya,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::AirKemasan => "Air kemasan/isi ulang",
            Self::LedengPam => "Ledeng/PAM",
            Self::SumurBor => "Sumur bor/pompa",
            Self::SumurTerlindung => "Sumur terlindung",
            Self::SumurTakTerlindung => "Sumur tak terlindung",
            Self::MataAirTerlindung => "Mata air terlindung",
            Self::MataAirTakTerlindung => "Mata air tak terlindung",
            Self::AirPermukaan => "Air permukaan (sungai/danau/waduk/kolam/irigasi)",
            Self::AirHujan => "Air hujan",
            Self::Lainnya => "Lainnya",
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::AirKemasan => 1,
            Self::LedengPam => 2,
            Self::SumurBor => 3,
            Self::SumurTerlindung => 4,
            Self::SumurTakTerlindung => 5,
            Self::MataAirTerlindung => 6,
            Self::MataAirTakTerlindung => 7,
            Self::AirPermukaan => 8,
            Self::AirHujan => 9,
            Self::Lainnya => 10,
        }
    }
}

impl FromStr for WaterSource {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|source| source.label() == trimmed)
            .ok_or_else(|| ParseCategoryError {
                category: "water source",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for WaterSource {
    type Error = ParseCategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WaterSource> for String {
    fn from(value: WaterSource) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for WaterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Family welfare rank.
///
/// Ranks 1-4 keep their number, "above 4" is 0, and an unidentified family uses
/// the sentinel [`WelfareRank::UNIDENTIFIED_CODE`]. The sentinel is fed to the
/// scaler like any other rank even though the scaler was fitted on 0-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WelfareRank {
    #[default]
    AboveFour,
    Rank1,
    Rank2,
    Rank3,
    Rank4,
    Unidentified,
}

impl WelfareRank {
    pub const UNIDENTIFIED_CODE: u8 = 99;

    /// All options in questionnaire order.
    pub const ALL: [WelfareRank; 6] = [
        Self::AboveFour,
        Self::Rank1,
        Self::Rank2,
        Self::Rank3,
        Self::Rank4,
        Self::Unidentified,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::AboveFour => "Peringkat Kesejahteraan >4",
            Self::Rank1 => "Peringkat Kesejahteraan 1",
            Self::Rank2 => "Peringkat Kesejahteraan 2",
            Self::Rank3 => "Peringkat Kesejahteraan 3",
            Self::Rank4 => "Peringkat Kesejahteraan 4",
            Self::Unidentified => "Keluarga belum teridentifikasi tingkat kesejahteraannya",
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::AboveFour => 0,
            Self::Rank1 => 1,
            Self::Rank2 => 2,
            Self::Rank3 => 3,
            Self::Rank4 => 4,
            Self::Unidentified => Self::UNIDENTIFIED_CODE,
        }
    }
}

impl FromStr for WelfareRank {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|rank| rank.label() == trimmed)
            .ok_or_else(|| ParseCategoryError {
                category: "welfare rank",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for WelfareRank {
    type Error = ParseCategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WelfareRank> for String {
    fn from(value: WelfareRank) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for WelfareRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The twelve household risk indicators of one questionnaire submission.
///
/// Field names match the model's feature names; unspecified fields default to
/// `Tidak`, the first water source and the first welfare rank, which are the
/// questionnaire's preselected options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyProfile {
    /// Has a child aged 0-24 months.
    pub baduta: Answer,
    /// Has a child aged 0-59 months.
    pub balita: Answer,
    /// Couple of fertile age.
    pub pus: Answer,
    /// Someone in the household is pregnant.
    pub pus_hamil: Answer,
    pub sumber_air_layak_tidak: WaterSource,
    /// Toilet does not meet the sanitation standard.
    pub jamban_layak_tidak: Answer,
    /// Mother younger than 20.
    pub terlalu_muda: Answer,
    /// Mother older than 35.
    pub terlalu_tua: Answer,
    /// Birth spacing under 2 years.
    pub terlalu_dekat: Answer,
    /// More than 4 children.
    pub terlalu_banyak: Answer,
    /// Not using modern contraception.
    pub bukan_peserta_kb_modern: Answer,
    pub kesejahteraan_prioritas: WelfareRank,
}
