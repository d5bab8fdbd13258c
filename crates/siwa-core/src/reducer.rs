//! Credential reducer.
//!
//! `reduce(action, state)` is the single source of truth for how actions
//! change state. It is pure: no I/O, no task spawning, never blocks.

use crate::action::{AppleIdCredential, SiwaAction};
use crate::state::{AuthenticationState, RealUserStatus, SiwaState};

/// Folds one action into a new state snapshot.
pub fn reduce(action: &SiwaAction, state: &SiwaState) -> SiwaState {
    match action {
        // Command, not a fact: the bridge handles it.
        SiwaAction::RequestStatus { .. } => state.clone(),
        SiwaAction::Status { status } => state.with_authentication_state(*status),
        SiwaAction::Authenticated {
            credential,
            state: flow_state,
            user,
        } => authenticated(credential, flow_state, user),
        // Full invalidation rather than a partial update.
        SiwaAction::Error { .. } => SiwaState::empty(),
    }
}

fn authenticated(credential: &AppleIdCredential, flow_state: &str, user: &str) -> SiwaState {
    SiwaState {
        authentication_state: AuthenticationState::Authenticated,
        identity_token: credential.identity_token.clone(),
        authorization_code: credential.authorization_code.clone(),
        state: Some(flow_state.to_string()),
        user: Some(user.to_string()),
        full_name: credential.full_name.clone(),
        email: credential.email.clone(),
        real_user_status: RealUserStatus::from_ordinal(credential.real_user_status),
    }
}

/// Folds a sequence of actions starting from `initial`.
pub fn reduce_all<'a, I>(initial: &SiwaState, actions: I) -> SiwaState
where
    I: IntoIterator<Item = &'a SiwaAction>,
{
    actions
        .into_iter()
        .fold(initial.clone(), |state, action| reduce(action, &state))
}
