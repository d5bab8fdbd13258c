//! Actions flowing through the credential store.
//!
//! The set is closed: UI and platform callback code create actions, the
//! bridge and the reducer consume them, and nothing retains an action once
//! it has been folded.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::SiwaError;
use crate::state::{AuthenticationState, PersonName};

/// Sender half of an action stream.
pub type ActionSender = mpsc::UnboundedSender<SiwaAction>;
/// Receiver half of an action stream.
pub type ActionReceiver = mpsc::UnboundedReceiver<SiwaAction>;

/// Creates an unbounded action channel.
pub fn channel() -> (ActionSender, ActionReceiver) {
    mpsc::unbounded_channel()
}

/// Payload of a fresh Apple ID authorization grant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppleIdCredential {
    /// Stable user identifier issued by the platform.
    pub user: String,
    #[serde(with = "crate::b64::option", skip_serializing_if = "Option::is_none")]
    pub identity_token: Option<Bytes>,
    #[serde(with = "crate::b64::option", skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<PersonName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Raw platform ordinal; see [`crate::RealUserStatus::from_ordinal`].
    pub real_user_status: i64,
}

/// Every action the store understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SiwaAction {
    /// Query the credential status of `user_id`.
    RequestStatus { user_id: String },

    /// The platform granted a fresh authorization.
    ///
    /// `state` and `user` are the values the reducer records; `credential.user`
    /// is the platform's copy and is not consulted.
    Authenticated {
        credential: AppleIdCredential,
        state: String,
        user: String,
    },

    /// Result of a status query.
    Status { status: AuthenticationState },

    /// A status query failed.
    Error { error: SiwaError },
}

impl SiwaAction {
    pub fn request_status(user_id: impl Into<String>) -> Self {
        SiwaAction::RequestStatus {
            user_id: user_id.into(),
        }
    }

    pub fn status(status: AuthenticationState) -> Self {
        SiwaAction::Status { status }
    }

    pub fn error(error: SiwaError) -> Self {
        SiwaAction::Error { error }
    }

    // Per-case accessors.

    pub fn as_request_status(&self) -> Option<&str> {
        match self {
            SiwaAction::RequestStatus { user_id } => Some(user_id),
            _ => None,
        }
    }

    pub fn as_status(&self) -> Option<AuthenticationState> {
        match self {
            SiwaAction::Status { status } => Some(*status),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<SiwaError> {
        match self {
            SiwaAction::Error { error } => Some(*error),
            _ => None,
        }
    }

    pub fn as_authenticated(&self) -> Option<(&AppleIdCredential, &str, &str)> {
        match self {
            SiwaAction::Authenticated {
                credential,
                state,
                user,
            } => Some((credential, state, user)),
            _ => None,
        }
    }

    pub fn is_request_status(&self) -> bool {
        self.as_request_status().is_some()
    }

    pub fn is_status(&self) -> bool {
        self.as_status().is_some()
    }

    pub fn is_error(&self) -> bool {
        self.as_error().is_some()
    }

    /// True for the actions that end a status query.
    pub fn is_terminal(&self) -> bool {
        self.is_status() || self.is_error()
    }
}
