//! End-to-end classification against artifacts written to a temp directory.

use std::path::Path;

use proptest::prelude::*;
use serde_json::{Value, json};

use krs_classify::{
    ArtifactPaths, ClassifyError, FEATURE_NAMES, RiskClassifier, build_feature_vector,
    shared_artifact_paths, shared_classifier,
};
use krs_model::{Answer, FamilyProfile, RiskLabel, WaterSource, WelfareRank};

fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// One-unit LSTM whose cell candidate reads the water source feature,
/// followed by a dense output layer.
fn model_json(activation: &str, dense_bias: f64) -> Value {
    let mut kernel = vec![vec![0.0; 4]; 12];
    kernel[4][2] = 1.0;
    json!({
        "format": "krs-sequence-classifier",
        "input_features": 12,
        "layers": [
            {
                "type": "lstm",
                "units": 1,
                "return_sequences": false,
                "kernel": kernel,
                "recurrent_kernel": [[0.0, 0.0, 0.0, 0.0]],
                "bias": [0.0, 0.0, 0.0, 0.0]
            },
            { "type": "dropout", "rate": 0.2 },
            {
                "type": "dense",
                "activation": activation,
                "kernel": [[1.0]],
                "bias": [dense_bias]
            }
        ]
    })
}

fn identity_scaler_json() -> Value {
    let mean = [0.0; 12];
    let scale = [1.0; 12];
    json!({
        "kind": "standard",
        "mean": mean,
        "scale": scale,
        "feature_names": FEATURE_NAMES,
    })
}

fn write_artifacts(dir: &Path, model: &Value, scaler: &Value) -> ArtifactPaths {
    let paths = ArtifactPaths {
        model: dir.join("model.json"),
        scaler: dir.join("scaler.json"),
    };
    write_json(&paths.model, model);
    write_json(&paths.scaler, scaler);
    paths
}

#[test]
fn all_tidak_profile_maps_to_expected_vector() {
    let profile = FamilyProfile {
        sumber_air_layak_tidak: WaterSource::AirKemasan,
        kesejahteraan_prioritas: WelfareRank::AboveFour,
        ..FamilyProfile::default()
    };
    assert_eq!(
        build_feature_vector(&profile),
        [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
    );
}

#[test]
fn loaded_artifacts_classify_a_profile() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), &model_json("linear", 0.0), &identity_scaler_json());
    let classifier = RiskClassifier::load(&paths).unwrap();

    let assessment = classifier.assess(&FamilyProfile::default()).unwrap();
    let expected = 0.5 * (0.5 * 1.0_f64.tanh()).tanh();
    assert!((assessment.score - expected).abs() < 1e-12);
    assert_eq!(assessment.label, RiskLabel::TidakBerisiko);
}

#[test]
fn sigmoid_head_crosses_the_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), &model_json("sigmoid", 0.0), &identity_scaler_json());
    let classifier = RiskClassifier::load(&paths).unwrap();

    let profile = FamilyProfile {
        baduta: Answer::Ya,
        ..FamilyProfile::default()
    };
    let assessment = classifier.assess(&profile).unwrap();
    assert!(assessment.score > 0.5);
    assert_eq!(assessment.label, RiskLabel::Berisiko);
}

#[test]
fn out_of_range_score_is_an_inference_error() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), &model_json("linear", 3.0), &identity_scaler_json());
    let classifier = RiskClassifier::load(&paths).unwrap();

    let err = classifier.assess(&FamilyProfile::default()).unwrap_err();
    assert!(matches!(err, ClassifyError::Inference { .. }));
}

#[test]
fn min_max_scaler_is_applied_before_the_model() {
    let dir = tempfile::tempdir().unwrap();
    // Water source code 1 is scaled to 0, so the LSTM sees an all-zero input.
    let scale = [1.0; 12];
    let scaler = json!({
        "kind": "min_max",
        "min": [0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        "scale": scale,
    });
    let paths = write_artifacts(dir.path(), &model_json("sigmoid", 0.0), &scaler);
    let classifier = RiskClassifier::load(&paths).unwrap();

    let score = classifier
        .predict_risk(&build_feature_vector(&FamilyProfile::default()))
        .unwrap();
    assert_eq!(score, 0.5);
}

#[test]
fn reordered_scaler_feature_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut names: Vec<&str> = FEATURE_NAMES.to_vec();
    names.swap(4, 5);
    let mean = [0.0; 12];
    let scale = [1.0; 12];
    let scaler = json!({
        "kind": "standard",
        "mean": mean,
        "scale": scale,
        "feature_names": names,
    });
    let paths = write_artifacts(dir.path(), &model_json("sigmoid", 0.0), &scaler);

    let err = RiskClassifier::load(&paths).unwrap_err();
    assert!(matches!(err, ClassifyError::Artifact { kind: "scaler", .. }));
}

#[test]
fn model_with_wrong_kernel_shape_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = model_json("sigmoid", 0.0);
    let short_kernel = vec![vec![0.0; 4]; 11];
    model["layers"][0]["kernel"] = json!(short_kernel);
    let paths = write_artifacts(dir.path(), &model, &identity_scaler_json());

    let err = RiskClassifier::load(&paths).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("kernel has 11 rows, expected 12"), "{message}");
}

#[test]
fn unknown_model_format_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = model_json("sigmoid", 0.0);
    model["format"] = json!("keras-h5");
    let paths = write_artifacts(dir.path(), &model, &identity_scaler_json());

    assert!(matches!(
        RiskClassifier::load(&paths),
        Err(ClassifyError::Artifact { kind: "model", .. })
    ));
}

#[test]
fn shared_classifier_keeps_the_first_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), &model_json("sigmoid", 0.0), &identity_scaler_json());

    let first = shared_classifier(&paths).unwrap();
    let second = shared_classifier(&ArtifactPaths::default()).unwrap();
    assert!(std::ptr::eq(first, second));
    // Later requests do not change which artifacts are in use.
    assert_eq!(shared_artifact_paths(), Some(&paths));
}

fn answer() -> impl Strategy<Value = Answer> {
    prop_oneof![Just(Answer::Ya), Just(Answer::Tidak)]
}

prop_compose! {
    fn profile()(
        binaries in proptest::collection::vec(answer(), 10),
        water in proptest::sample::select(WaterSource::ALL.to_vec()),
        welfare in proptest::sample::select(WelfareRank::ALL.to_vec()),
    ) -> FamilyProfile {
        FamilyProfile {
            baduta: binaries[0],
            balita: binaries[1],
            pus: binaries[2],
            pus_hamil: binaries[3],
            sumber_air_layak_tidak: water,
            jamban_layak_tidak: binaries[4],
            terlalu_muda: binaries[5],
            terlalu_tua: binaries[6],
            terlalu_dekat: binaries[7],
            terlalu_banyak: binaries[8],
            bukan_peserta_kb_modern: binaries[9],
            kesejahteraan_prioritas: welfare,
        }
    }
}

proptest! {
    #[test]
    fn feature_vector_values_stay_in_their_domains(profile in profile()) {
        let vector = build_feature_vector(&profile);
        for (idx, value) in vector.iter().enumerate() {
            match FEATURE_NAMES[idx] {
                "sumber_air_layak_tidak" => prop_assert!((1.0..=10.0).contains(value)),
                "kesejahteraan_prioritas" => {
                    prop_assert!([0.0, 1.0, 2.0, 3.0, 4.0, 99.0].contains(value));
                }
                _ => prop_assert!(*value == 0.0 || *value == 1.0),
            }
        }
    }
}
