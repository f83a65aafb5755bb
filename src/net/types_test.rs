use super::*;

// =============================================================
// Identity
// =============================================================

#[test]
fn identity_keeps_unknown_fields() {
    let raw = r#"{"id":"user_01","email":"a@b.com","firstName":"Ada","plan":{"tier":"pro"}}"#;
    let identity: Identity = serde_json::from_str(raw).unwrap();
    assert_eq!(identity.id, "user_01");
    assert_eq!(identity.attributes["email"], "a@b.com");
    assert_eq!(identity.attributes["firstName"], "Ada");
    assert_eq!(identity.attributes["plan"]["tier"], "pro");
}

#[test]
fn identity_requires_id() {
    assert!(serde_json::from_str::<Identity>(r#"{"email":"a@b.com"}"#).is_err());
}

#[test]
fn new_identity_has_no_attributes() {
    assert!(Identity::new("u1").attributes.is_empty());
}

// =============================================================
// AuthMode
// =============================================================

#[test]
fn mode_defaults_to_signin() {
    assert_eq!(AuthMode::parse(None), AuthMode::SignIn);
    assert_eq!(AuthMode::parse(Some("")), AuthMode::SignIn);
    assert_eq!(AuthMode::parse(Some("register")), AuthMode::SignIn);
}

#[test]
fn mode_signup_routes_to_onboarding() {
    let mode = AuthMode::parse(Some("signup"));
    assert_eq!(mode, AuthMode::SignUp);
    assert_eq!(mode.landing_path(), "/onboarding");
    assert_eq!(AuthMode::SignIn.landing_path(), "/dashboard");
}

// =============================================================
// ApiResponse
// =============================================================

#[test]
fn api_response_reads_camel_case_redirect() {
    let body: ApiResponse =
        serde_json::from_str(r#"{"success":true,"redirectUrl":"https://idp.example/authorize"}"#).unwrap();
    assert!(body.success);
    assert_eq!(body.redirect_url.as_deref(), Some("https://idp.example/authorize"));
}

#[test]
fn api_response_tolerates_missing_fields() {
    let body: ApiResponse = serde_json::from_str(r#"{"error":"bad code"}"#).unwrap();
    assert!(!body.success);
    assert_eq!(body.error.as_deref(), Some("bad code"));
}
