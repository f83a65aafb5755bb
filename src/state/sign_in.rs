//! Start of the OAuth round trip: ask the server for the provider URL and
//! leave the app for it.

#[cfg(test)]
#[path = "sign_in_test.rs"]
mod sign_in_test;

use crate::error::AuthError;
use crate::net::api::SessionApi;
use crate::net::types::AuthMode;
use crate::util::navigation::Navigator;

/// Redirect the browser to `provider`'s authorization page.
///
/// # Errors
///
/// Returns the server's failure unchanged; nothing is navigated in that case.
pub async fn begin_sign_in(
    api: &dyn SessionApi,
    navigator: &dyn Navigator,
    provider: &str,
    mode: AuthMode,
) -> Result<(), AuthError> {
    let redirect = api.start_oauth(provider, mode).await?;
    log::info!("leaving for {provider} authorization ({})", mode.as_str());
    navigator.navigate(&redirect);
    Ok(())
}
