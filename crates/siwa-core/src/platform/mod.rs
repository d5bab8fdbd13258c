//! Platform credential provider adapter.
//!
//! The platform reports credential state through a completion callback that
//! carries a raw state value and an optional error. [`PlatformCredentialProvider`]
//! wraps that callback API into the [`CredentialStateProvider`] future the
//! bridge consumes.
//!
//! Mapping:
//!
//! | platform signal         | result                      |
//! |-------------------------|-----------------------------|
//! | authorized              | `Authenticated`             |
//! | not found, transferred  | `Undefined`                 |
//! | revoked                 | `LoggedOut`                 |
//! | error present           | `UnknownCredentialState`    |
//! | unrecognized value      | `UnknownCredentialState`    |

pub mod scripted;

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::SiwaError;
use crate::provider::{CredentialStateProvider, CredentialStateResult};
use crate::state::AuthenticationState;

pub use scripted::{ScriptedCredentialApi, ScriptedSignal};

/// Raw credential state as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawCredentialState {
    Revoked,
    Authorized,
    NotFound,
    Transferred,
    /// A value this build does not know about.
    Unrecognized(i64),
}

impl RawCredentialState {
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            0 => RawCredentialState::Revoked,
            1 => RawCredentialState::Authorized,
            2 => RawCredentialState::NotFound,
            3 => RawCredentialState::Transferred,
            other => RawCredentialState::Unrecognized(other),
        }
    }

    pub fn raw(self) -> i64 {
        match self {
            RawCredentialState::Revoked => 0,
            RawCredentialState::Authorized => 1,
            RawCredentialState::NotFound => 2,
            RawCredentialState::Transferred => 3,
            RawCredentialState::Unrecognized(raw) => raw,
        }
    }
}

/// Error object handed to the completion callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError {
    pub code: i64,
    pub message: String,
}

impl PlatformError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// Completion callback for [`CredentialStateApi::get_credential_state`].
pub type CredentialStateCompletion =
    Box<dyn FnOnce(RawCredentialState, Option<PlatformError>) + Send + 'static>;

/// Callback-based credential state API exposed by the platform.
///
/// Implementations call `completion` at most once, from any thread.
pub trait CredentialStateApi: Send + Sync {
    fn get_credential_state(&self, user_id: &str, completion: CredentialStateCompletion);
}

/// Maps a platform completion to the domain result.
pub fn map_platform_state(
    state: RawCredentialState,
    error: Option<&PlatformError>,
) -> CredentialStateResult {
    if error.is_some() {
        return Err(SiwaError::UnknownCredentialState);
    }
    match state {
        RawCredentialState::Authorized => Ok(AuthenticationState::Authenticated),
        RawCredentialState::NotFound | RawCredentialState::Transferred => {
            Ok(AuthenticationState::Undefined)
        }
        RawCredentialState::Revoked => Ok(AuthenticationState::LoggedOut),
        RawCredentialState::Unrecognized(_) => Err(SiwaError::UnknownCredentialState),
    }
}

/// Adapts a [`CredentialStateApi`] to [`CredentialStateProvider`].
pub struct PlatformCredentialProvider<A> {
    api: Arc<A>,
    timeout: Option<Duration>,
}

impl<A> PlatformCredentialProvider<A>
where
    A: CredentialStateApi + 'static,
{
    pub fn new(api: Arc<A>) -> Self {
        Self { api, timeout: None }
    }

    /// Fails queries the platform has not answered within `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl<A> CredentialStateProvider for PlatformCredentialProvider<A>
where
    A: CredentialStateApi + 'static,
{
    fn credential_state(&self, user_id: &str) -> BoxFuture<'static, CredentialStateResult> {
        let api = Arc::clone(&self.api);
        let timeout = self.timeout;
        let user_id = user_id.to_string();

        async move {
            let (tx, rx) = oneshot::channel();
            debug!(user_id = %user_id, "credential state requested from platform");
            api.get_credential_state(
                &user_id,
                Box::new(move |state: RawCredentialState, error: Option<PlatformError>| {
                    if let Some(ref error) = error {
                        warn!(%error, raw_state = state.raw(), "platform reported credential error");
                    } else {
                        debug!(raw_state = state.raw(), "platform credential state");
                    }
                    let _ = tx.send(map_platform_state(state, error.as_ref()));
                }),
            );

            // A dropped completion is as unknown as an explicit error.
            let answer = async move { rx.await.unwrap_or(Err(SiwaError::UnknownCredentialState)) };
            match timeout {
                Some(limit) => tokio::time::timeout(limit, answer)
                    .await
                    .unwrap_or_else(|_elapsed| {
                        warn!(user_id = %user_id, ?limit, "credential state query timed out");
                        Err(SiwaError::UnknownCredentialState)
                    }),
                None => answer.await,
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Answers synchronously with a fixed completion.
    struct FixedApi {
        state: RawCredentialState,
        error: Option<PlatformError>,
    }

    impl CredentialStateApi for FixedApi {
        fn get_credential_state(&self, _user_id: &str, completion: CredentialStateCompletion) {
            completion(self.state, self.error.clone());
        }
    }

    /// Holds on to the completion and never calls it.
    #[derive(Default)]
    struct SilentApi {
        held: Mutex<Vec<CredentialStateCompletion>>,
    }

    impl CredentialStateApi for SilentApi {
        fn get_credential_state(&self, _user_id: &str, completion: CredentialStateCompletion) {
            self.held.lock().unwrap().push(completion);
        }
    }

    /// Drops the completion without calling it.
    struct DroppingApi;

    impl CredentialStateApi for DroppingApi {
        fn get_credential_state(&self, _user_id: &str, _completion: CredentialStateCompletion) {}
    }

    async fn query(state: RawCredentialState, error: Option<PlatformError>) -> CredentialStateResult {
        let provider = PlatformCredentialProvider::new(Arc::new(FixedApi { state, error }));
        provider.credential_state("u1").await
    }

    #[test]
    fn test_mapping_table() {
        assert_eq!(
            map_platform_state(RawCredentialState::Authorized, None),
            Ok(AuthenticationState::Authenticated)
        );
        assert_eq!(
            map_platform_state(RawCredentialState::NotFound, None),
            Ok(AuthenticationState::Undefined)
        );
        assert_eq!(
            map_platform_state(RawCredentialState::Transferred, None),
            Ok(AuthenticationState::Undefined)
        );
        assert_eq!(
            map_platform_state(RawCredentialState::Revoked, None),
            Ok(AuthenticationState::LoggedOut)
        );
        assert_eq!(
            map_platform_state(RawCredentialState::Unrecognized(7), None),
            Err(SiwaError::UnknownCredentialState)
        );
    }

    #[test]
    fn test_error_wins_over_state() {
        let error = PlatformError::new(1000, "request failed");
        for state in [
            RawCredentialState::Authorized,
            RawCredentialState::Revoked,
            RawCredentialState::NotFound,
            RawCredentialState::Transferred,
        ] {
            assert_eq!(
                map_platform_state(state, Some(&error)),
                Err(SiwaError::UnknownCredentialState)
            );
        }
    }

    #[test]
    fn test_raw_values() {
        assert_eq!(RawCredentialState::from_raw(0), RawCredentialState::Revoked);
        assert_eq!(RawCredentialState::from_raw(1), RawCredentialState::Authorized);
        assert_eq!(RawCredentialState::from_raw(2), RawCredentialState::NotFound);
        assert_eq!(RawCredentialState::from_raw(3), RawCredentialState::Transferred);
        assert_eq!(
            RawCredentialState::from_raw(9),
            RawCredentialState::Unrecognized(9)
        );
        assert_eq!(RawCredentialState::Unrecognized(9).raw(), 9);
    }

    #[tokio::test]
    async fn test_revoked_without_error_is_logged_out() {
        assert_eq!(
            query(RawCredentialState::Revoked, None).await,
            Ok(AuthenticationState::LoggedOut)
        );
    }

    #[tokio::test]
    async fn test_error_fails_query() {
        let error = PlatformError::new(1001, "canceled");
        assert_eq!(
            query(RawCredentialState::Revoked, Some(error)).await,
            Err(SiwaError::UnknownCredentialState)
        );
    }

    #[tokio::test]
    async fn test_dropped_completion_fails_query() {
        let provider = PlatformCredentialProvider::new(Arc::new(DroppingApi));
        assert_eq!(
            provider.credential_state("u1").await,
            Err(SiwaError::UnknownCredentialState)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_query() {
        let api = Arc::new(SilentApi::default());
        let provider = PlatformCredentialProvider::new(Arc::clone(&api))
            .with_timeout(Some(Duration::from_secs(5)));

        let result = provider.credential_state("u1").await;

        assert_eq!(result, Err(SiwaError::UnknownCredentialState));
        assert_eq!(api.held.lock().unwrap().len(), 1);
    }
}
