use super::*;

#[test]
fn defaults_match_documented_values() {
    let config = AuthConfig::default();
    assert_eq!(config.guard_timeout(), Duration::from_millis(2_500));
    assert_eq!(config.bypass_offer_delay(), Duration::from_secs(5));
    assert_eq!(config.success_redirect_delay(), Duration::from_millis(1_500));
    assert_eq!(config.bypass_storage_key, "auth_guard_bypass");
    assert_eq!(config.provider, "google");
}

#[test]
fn bypass_offer_comes_after_guard_timeout_by_default() {
    let config = AuthConfig::default();
    assert!(config.bypass_offer_delay() > config.guard_timeout());
}

#[test]
fn from_json_fills_missing_fields() {
    let config = AuthConfig::from_json(r#"{"guard_timeout_ms": 1000}"#).unwrap();
    assert_eq!(config.guard_timeout_ms, 1_000);
    assert_eq!(config.success_redirect_delay_ms, 1_500);
    assert_eq!(config.api_base, "");
}

#[test]
fn from_json_rejects_wrong_types() {
    assert!(AuthConfig::from_json(r#"{"guard_timeout_ms": "soon"}"#).is_err());
}

#[test]
fn endpoint_joins_base_without_double_slash() {
    let config = AuthConfig {
        api_base: "https://app.example.com/".to_owned(),
        ..AuthConfig::default()
    };
    assert_eq!(config.endpoint("/api/auth/me"), "https://app.example.com/api/auth/me");
    assert_eq!(AuthConfig::default().endpoint("/api/auth/me"), "/api/auth/me");
}
