//! Configuration persistence and environment override tests.

mod common;

use std::fs;
use tempfile::TempDir;
use xgboost_rust::*;

#[test]
fn test_json_round_trip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("booster.json");

    let config = ConfigBuilder::new()
        .n_estimators(75)
        .learning_rate(0.2)
        .apply_learning_rate(true)
        .max_depth(4)
        .min_samples_leaf(3)
        .build()?;

    config.save_to_file(&path)?;
    let loaded = BoosterConfig::load_from_file(&path)?;

    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_toml_round_trip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("booster.toml");

    let config = ConfigBuilder::new()
        .n_estimators(12)
        .min_impurity(0.5)
        .num_threads(2)
        .verbosity(VerbosityLevel::Debug)
        .build()?;

    config.save_to_file(&path)?;
    let loaded = BoosterConfig::load_from_file(&path)?;

    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_partial_json_fills_defaults() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("partial.json");
    fs::write(&path, r#"{ "n_estimators": 7 }"#)?;

    let loaded = BoosterConfig::load_from_file(&path)?;
    assert_eq!(loaded.n_estimators, 7);
    assert_eq!(loaded.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(loaded.learning_rate, DEFAULT_LEARNING_RATE);
    Ok(())
}

#[test]
fn test_invalid_file_contents_are_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let invalid_value = dir.path().join("invalid.toml");
    fs::write(&invalid_value, "max_depth = 0\n")?;
    assert!(matches!(
        BoosterConfig::load_from_file(&invalid_value),
        Err(XGBoostError::InvalidParameter { .. })
    ));

    let malformed = dir.path().join("malformed.json");
    fs::write(&malformed, "{ not json")?;
    assert!(matches!(
        BoosterConfig::load_from_file(&malformed),
        Err(XGBoostError::Json { .. })
    ));

    let unsupported = dir.path().join("booster.yaml");
    fs::write(&unsupported, "n_estimators: 3")?;
    assert!(matches!(
        BoosterConfig::load_from_file(&unsupported),
        Err(XGBoostError::Config { .. })
    ));
    Ok(())
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = BoosterConfig::load_from_file(dir.path().join("absent.json"));
    assert!(result.is_err());
}

#[test]
fn test_loaded_config_trains() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("train.toml");
    fs::write(&path, "n_estimators = 10\nmax_depth = 3\n")?;

    let config = BoosterConfig::load_from_file(&path)?;
    let (features, labels) = common::linear_dataset(30);

    let mut model = XGBoost::new(config);
    model.fit(&features, &labels)?;
    assert_eq!(model.num_trees(), 10);
    assert!(model.trees().iter().all(|t| t.tree().map_or(false, |tree| tree.depth() <= 3)));
    Ok(())
}

// Environment variables are process-wide, so every override check lives in
// this single test.
#[test]
fn test_environment_overrides() -> anyhow::Result<()> {
    std::env::set_var("XGBOOST_N_ESTIMATORS", "33");
    std::env::set_var("XGBOOST_MAX_DEPTH", "5");
    std::env::set_var("XGBOOST_APPLY_LEARNING_RATE", "true");

    let from_env = BoosterConfig::load_from_environment()?;
    assert_eq!(from_env.n_estimators, 33);
    assert_eq!(from_env.max_depth, 5);
    assert!(from_env.apply_learning_rate);
    assert_eq!(from_env.min_samples_split, DEFAULT_MIN_SAMPLES_SPLIT);

    let mut config = ConfigBuilder::new().min_samples_split(4).build()?;
    config.apply_environment_overrides()?;
    assert_eq!(config.n_estimators, 33);
    assert_eq!(config.min_samples_split, 4);

    // A variable set to the default value still replaces the configured one.
    std::env::set_var("XGBOOST_APPLY_LEARNING_RATE", "false");
    std::env::set_var("XGBOOST_MIN_SAMPLES_LEAF", "3");
    std::env::set_var("XGBOOST_VERBOSITY", "debug");
    let mut config = ConfigBuilder::new()
        .apply_learning_rate(true)
        .n_estimators(10)
        .verbosity(VerbosityLevel::Silent)
        .build()?;
    config.apply_environment_overrides()?;
    assert!(!config.apply_learning_rate);
    assert_eq!(config.n_estimators, 33);
    assert_eq!(config.min_samples_leaf, 3);
    assert_eq!(config.verbosity, VerbosityLevel::Debug);

    std::env::set_var("XGBOOST_VERBOSITY", "chatty");
    assert!(matches!(
        BoosterConfig::load_from_environment(),
        Err(XGBoostError::Config { .. })
    ));
    std::env::remove_var("XGBOOST_VERBOSITY");
    std::env::remove_var("XGBOOST_MIN_SAMPLES_LEAF");

    std::env::set_var("XGBOOST_MAX_DEPTH", "deep");
    assert!(matches!(
        BoosterConfig::load_from_environment(),
        Err(XGBoostError::Config { .. })
    ));

    std::env::set_var("XGBOOST_MAX_DEPTH", "0");
    assert!(matches!(
        BoosterConfig::load_from_environment(),
        Err(XGBoostError::InvalidParameter { .. })
    ));

    std::env::remove_var("XGBOOST_N_ESTIMATORS");
    std::env::remove_var("XGBOOST_MAX_DEPTH");
    std::env::remove_var("XGBOOST_APPLY_LEARNING_RATE");
    Ok(())
}
