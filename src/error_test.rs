use super::*;

// =============================================================
// FailureKind classification
// =============================================================

#[test]
fn rejected_and_missing_codes_are_invalid_code() {
    assert_eq!(AuthError::MissingCode.kind(), FailureKind::InvalidCode);
    assert_eq!(
        AuthError::ExchangeRejected("expired".to_owned()).kind(),
        FailureKind::InvalidCode
    );
}

#[test]
fn unavailable_is_network_failure() {
    assert_eq!(
        AuthError::ServiceUnavailable("timeout".to_owned()).kind(),
        FailureKind::NetworkFailure
    );
}

#[test]
fn configuration_keeps_its_own_kind() {
    let err = AuthError::Configuration("missing client id".to_owned());
    assert_eq!(err.kind(), FailureKind::Configuration);
    assert_eq!(err.kind().as_str(), "configuration");
}

// =============================================================
// Display / reason
// =============================================================

#[test]
fn missing_code_reason_is_no_code() {
    assert_eq!(AuthError::MissingCode.reason(), "no code");
}

#[test]
fn reason_strips_variant_prefix() {
    let err = AuthError::ExchangeRejected("code expired".to_owned());
    assert_eq!(err.reason(), "code expired");
    assert_eq!(err.to_string(), "authorization code rejected: code expired");
}
