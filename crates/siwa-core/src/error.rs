//! Domain error for credential-status queries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a credential-status query.
///
/// Platform errors, unrecognized platform values, timeouts and dropped
/// callbacks all collapse into the same kind at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiwaError {
    #[error("unknown credential state")]
    UnknownCredentialState,
}
