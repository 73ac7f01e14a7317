#![cfg(feature = "serde")]

use genforge::{
    evolution::{EngineOptions, LogLevel},
    fitness::Optimize,
    probability::Probability,
    selection::{
        BoltzmannSelector, ExponentialRankSelector, LinearRankSelector, TournamentSelector,
    },
};

#[test]
fn test_options_round_trip_through_json() {
    let options = EngineOptions::builder()
        .population_size(64)
        .survivor_fraction(0.25)
        .optimize(Optimize::Minimum)
        .log_level(LogLevel::Minimal)
        .build()
        .unwrap();

    let json = serde_json::to_string(&options).unwrap();
    let restored: EngineOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, options);
    assert_eq!(restored.survivors(), 16);
}

#[test]
fn test_selector_configuration_is_serializable() {
    let json = serde_json::to_value(TournamentSelector::new(5).unwrap()).unwrap();
    assert_eq!(json["tournament_size"], 5);

    let rank: LinearRankSelector = serde_json::from_str(r#"{"n_minus":0.25}"#).unwrap();
    assert_eq!(rank.n_minus(), 0.25);
}

#[test]
fn test_deserialization_rejects_invalid_parameters() {
    assert!(serde_json::from_str::<Probability>("3.5").is_err());
    assert!(serde_json::from_str::<Probability>("-0.1").is_err());
    assert!(serde_json::from_str::<TournamentSelector>(r#"{"tournament_size":0}"#).is_err());
    assert!(serde_json::from_str::<LinearRankSelector>(r#"{"n_minus":7.0}"#).is_err());
    assert!(serde_json::from_str::<ExponentialRankSelector>(r#"{"c":1.0}"#).is_err());
    assert!(serde_json::from_str::<ExponentialRankSelector>(r#"{"c":0.0}"#).is_err());

    let error = serde_json::from_str::<TournamentSelector>(r#"{"tournament_size":0}"#)
        .unwrap_err()
        .to_string();
    assert!(error.contains("Configuration error"), "{}", error);
}

#[test]
fn test_deserialization_accepts_valid_parameters() {
    let probability: Probability = serde_json::from_str("0.75").unwrap();
    assert_eq!(probability.value(), 0.75);
    assert_eq!(serde_json::to_string(&probability).unwrap(), "0.75");

    let tournament: TournamentSelector =
        serde_json::from_str(r#"{"tournament_size":4}"#).unwrap();
    assert_eq!(tournament, TournamentSelector::new(4).unwrap());

    let exponential: ExponentialRankSelector = serde_json::from_str(r#"{"c":0.5}"#).unwrap();
    assert_eq!(exponential.c(), 0.5);

    let boltzmann: BoltzmannSelector = serde_json::from_str(r#"{"b":-2.5}"#).unwrap();
    assert_eq!(boltzmann.b(), -2.5);
}

#[test]
fn test_options_deserialization_is_validated() {
    let valid = serde_json::to_value(EngineOptions::default()).unwrap();

    let mut fraction = valid.clone();
    fraction["survivor_fraction"] = serde_json::json!(2.0);
    assert!(serde_json::from_value::<EngineOptions>(fraction).is_err());

    let mut offspring = valid.clone();
    offspring["offspring_fraction"] = serde_json::json!(-0.5);
    assert!(serde_json::from_value::<EngineOptions>(offspring).is_err());

    let mut size = valid.clone();
    size["population_size"] = serde_json::json!(0);
    assert!(serde_json::from_value::<EngineOptions>(size).is_err());

    let restored: EngineOptions = serde_json::from_value(valid).unwrap();
    assert_eq!(restored, EngineOptions::default());
}
