use futures::executor::block_on;

use super::*;
use crate::test_support::{FakeApi, RecordingNavigator};

#[test]
fn begin_sign_in_navigates_to_provider_url() {
    let api = FakeApi::default();
    let navigator = RecordingNavigator::default();

    block_on(begin_sign_in(&api, &navigator, "google", AuthMode::SignUp)).unwrap();
    assert_eq!(*api.start_calls.borrow(), vec![("google".to_owned(), AuthMode::SignUp)]);
    assert_eq!(
        *navigator.visits.borrow(),
        vec!["https://idp.example/authorize?provider=google".to_owned()]
    );
}

#[test]
fn begin_sign_in_failure_stays_put() {
    let api = FakeApi::default();
    api.reply_start(Err(AuthError::Configuration("OAuth client not configured".to_owned())));
    let navigator = RecordingNavigator::default();

    let err = block_on(begin_sign_in(&api, &navigator, "google", AuthMode::SignIn)).unwrap_err();
    assert_eq!(err, AuthError::Configuration("OAuth client not configured".to_owned()));
    assert!(navigator.visits.borrow().is_empty());
}
