//! Credential-state capability consumed by the bridge.

use futures_util::future::BoxFuture;

use crate::error::SiwaError;
use crate::state::AuthenticationState;

/// Result of a single credential-status query.
pub type CredentialStateResult = Result<AuthenticationState, SiwaError>;

/// Asynchronous credential-status lookup.
///
/// The bridge only ever sees this trait, so the real platform adapter and
/// test doubles are interchangeable. The returned future must be `'static`
/// because the bridge runs it on a spawned task.
pub trait CredentialStateProvider: Send + Sync {
    fn credential_state(&self, user_id: &str) -> BoxFuture<'static, CredentialStateResult>;
}

impl<F> CredentialStateProvider for F
where
    F: Fn(&str) -> BoxFuture<'static, CredentialStateResult> + Send + Sync,
{
    fn credential_state(&self, user_id: &str) -> BoxFuture<'static, CredentialStateResult> {
        self(user_id)
    }
}
