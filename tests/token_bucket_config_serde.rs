use token_bucket_core::cores::{TokenBucketCore, TokenBucketCoreConfig};

#[test]
fn config_deserializes_from_json() {
    let config: TokenBucketCoreConfig = serde_json::from_str(r#"{"capacity": 50.0, "refill_rate": 2.5}"#).unwrap();
    assert_eq!(config, TokenBucketCoreConfig::new(50.0, 2.5));

    let bucket = TokenBucketCore::try_from(config).unwrap();
    assert_eq!(bucket.capacity(), 50.0);
    assert_eq!(bucket.refill_rate(), 2.5);
}

#[test]
fn config_round_trips_through_json() {
    let config = TokenBucketCoreConfig::new(10.0, 0.25);
    let json = serde_json::to_string(&config).unwrap();
    let parsed: TokenBucketCoreConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn unknown_fields_are_rejected() {
    let result = serde_json::from_str::<TokenBucketCoreConfig>(r#"{"capacity": 1.0, "refill_rate": 1.0, "burst": 3}"#);
    assert!(result.is_err());
}

#[test]
fn invalid_values_deserialize_but_fail_validation() {
    let config: TokenBucketCoreConfig = serde_json::from_str(r#"{"capacity": -1.0, "refill_rate": 1.0}"#).unwrap();
    assert!(config.validate().is_err());
}
