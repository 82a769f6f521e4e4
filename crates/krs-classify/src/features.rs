//! Mapping from a family profile to the model's feature vector.

use krs_model::{Answer, FamilyProfile};

use crate::error::{ClassifyError, Result};

/// Number of model input features.
pub const FEATURE_COUNT: usize = 12;

/// Feature vector in [`FEATURE_NAMES`] order.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Feature names in the order the scaler and model were fitted on.
///
/// The order is part of the artifact contract and must not change.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "baduta",
    "balita",
    "pus",
    "pus_hamil",
    "sumber_air_layak_tidak",
    "jamban_layak_tidak",
    "terlalu_muda",
    "terlalu_tua",
    "terlalu_dekat",
    "terlalu_banyak",
    "bukan_peserta_kb_modern",
    "kesejahteraan_prioritas",
];

/// Builds the numeric feature vector for a profile.
///
/// Binary answers map `Ya` to 1 and `Tidak` to 0; the water source and welfare
/// rank use their fixed ordinal codes, including the welfare sentinel 99.
pub fn build_feature_vector(profile: &FamilyProfile) -> FeatureVector {
    let binary = |answer: Answer| f64::from(answer.code());
    [
        binary(profile.baduta),
        binary(profile.balita),
        binary(profile.pus),
        binary(profile.pus_hamil),
        f64::from(profile.sumber_air_layak_tidak.code()),
        binary(profile.jamban_layak_tidak),
        binary(profile.terlalu_muda),
        binary(profile.terlalu_tua),
        binary(profile.terlalu_dekat),
        binary(profile.terlalu_banyak),
        binary(profile.bukan_peserta_kb_modern),
        f64::from(profile.kesejahteraan_prioritas.code()),
    ]
}

/// Sets one questionnaire field from its option label.
///
/// `field` is a feature name from [`FEATURE_NAMES`]. Labels are parsed with the
/// option types' `FromStr`, so unknown options fail with
/// [`ClassifyError::UnknownCategory`].
pub fn apply_field(profile: &mut FamilyProfile, field: &str, value: &str) -> Result<()> {
    let slot = match field {
        "baduta" => &mut profile.baduta,
        "balita" => &mut profile.balita,
        "pus" => &mut profile.pus,
        "pus_hamil" => &mut profile.pus_hamil,
        "jamban_layak_tidak" => &mut profile.jamban_layak_tidak,
        "terlalu_muda" => &mut profile.terlalu_muda,
        "terlalu_tua" => &mut profile.terlalu_tua,
        "terlalu_dekat" => &mut profile.terlalu_dekat,
        "terlalu_banyak" => &mut profile.terlalu_banyak,
        "bukan_peserta_kb_modern" => &mut profile.bukan_peserta_kb_modern,
        "sumber_air_layak_tidak" => {
            profile.sumber_air_layak_tidak = value.parse()?;
            return Ok(());
        }
        "kesejahteraan_prioritas" => {
            profile.kesejahteraan_prioritas = value.parse()?;
            return Ok(());
        }
        other => return Err(ClassifyError::UnknownField(other.to_string())),
    };
    *slot = value.parse()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use krs_model::{WaterSource, WelfareRank};

    #[test]
    fn test_default_profile_vector() {
        let vector = build_feature_vector(&FamilyProfile::default());
        assert_eq!(
            vector,
            [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_positions_follow_feature_names() {
        let profile = FamilyProfile {
            pus_hamil: Answer::Ya,
            sumber_air_layak_tidak: WaterSource::AirHujan,
            bukan_peserta_kb_modern: Answer::Ya,
            kesejahteraan_prioritas: WelfareRank::Rank3,
            ..FamilyProfile::default()
        };
        let vector = build_feature_vector(&profile);
        let position = |name: &str| FEATURE_NAMES.iter().position(|n| *n == name).unwrap();
        assert_eq!(vector[position("pus_hamil")], 1.0);
        assert_eq!(vector[position("sumber_air_layak_tidak")], 9.0);
        assert_eq!(vector[position("bukan_peserta_kb_modern")], 1.0);
        assert_eq!(vector[position("kesejahteraan_prioritas")], 3.0);
    }

    #[test]
    fn test_apply_field_parses_labels() {
        let mut profile = FamilyProfile::default();
        apply_field(&mut profile, "baduta", "Ya").unwrap();
        apply_field(&mut profile, "sumber_air_layak_tidak", "Ledeng/PAM").unwrap();
        apply_field(
            &mut profile,
            "kesejahteraan_prioritas",
            "Keluarga belum teridentifikasi tingkat kesejahteraannya",
        )
        .unwrap();
        assert_eq!(profile.baduta, Answer::Ya);
        assert_eq!(profile.sumber_air_layak_tidak, WaterSource::LedengPam);
        assert_eq!(profile.kesejahteraan_prioritas, WelfareRank::Unidentified);
    }

    #[test]
    fn test_apply_field_rejects_unknown_input() {
        let mut profile = FamilyProfile::default();
        assert!(matches!(
            apply_field(&mut profile, "baduta", "mungkin"),
            Err(ClassifyError::UnknownCategory(_))
        ));
        assert!(matches!(
            apply_field(&mut profile, "umur", "Ya"),
            Err(ClassifyError::UnknownField(_))
        ));
    }
}
