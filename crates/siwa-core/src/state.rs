//! Credential state snapshot.
//!
//! `SiwaState` is a value: the reducer takes one by reference and returns a
//! new one. Nothing in this crate mutates a published snapshot.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Coarse verdict on whether a previously granted authorization is still valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationState {
    Authenticated,
    LoggedOut,
    #[default]
    Undefined,
}

impl std::fmt::Display for AuthenticationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AuthenticationState::Authenticated => "authenticated",
            AuthenticationState::LoggedOut => "logged_out",
            AuthenticationState::Undefined => "undefined",
        };
        f.write_str(label)
    }
}

/// Platform confidence that the signing-in user is a real person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealUserStatus {
    Unsupported,
    Unknown,
    Real,
}

impl RealUserStatus {
    /// Maps the platform's raw ordinal. Unrecognized ordinals yield `None`.
    pub fn from_ordinal(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(RealUserStatus::Unsupported),
            1 => Some(RealUserStatus::Unknown),
            2 => Some(RealUserStatus::Real),
            _ => None,
        }
    }
}

/// Name components shared on the first authorization grant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// Immutable credential state folded by [`crate::reduce`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiwaState {
    pub authentication_state: AuthenticationState,
    #[serde(with = "crate::b64::option", skip_serializing_if = "Option::is_none")]
    pub identity_token: Option<Bytes>,
    #[serde(with = "crate::b64::option", skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<PersonName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_user_status: Option<RealUserStatus>,
}

impl SiwaState {
    /// State with every field unset.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authentication_state == AuthenticationState::Authenticated
    }

    /// Returns a copy with only the authentication state replaced.
    #[must_use]
    pub fn with_authentication_state(&self, authentication_state: AuthenticationState) -> Self {
        Self {
            authentication_state,
            ..self.clone()
        }
    }
}
