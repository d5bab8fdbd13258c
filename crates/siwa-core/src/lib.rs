//! Sign in with Apple credential-status bridge.
//!
//! Connects a platform credential provider to a unidirectional data flow:
//! actions go in, the bridge turns `RequestStatus` commands into async
//! queries, and the reducer folds every action into an immutable
//! [`SiwaState`] snapshot.

pub mod action;
pub mod bridge;
pub mod config;
pub mod error;
pub mod platform;
pub mod provider;
pub mod reducer;
pub mod state;
pub mod store;
pub mod task;

mod b64;

pub use action::{ActionReceiver, ActionSender, AppleIdCredential, SiwaAction};
pub use bridge::CredentialStatusBridge;
pub use error::SiwaError;
pub use provider::CredentialStateProvider;
pub use reducer::reduce;
pub use state::{AuthenticationState, PersonName, RealUserStatus, SiwaState};
pub use store::Store;
