//! In-memory platform credential API driven by a user → signal table.
//!
//! Stands in for the native platform in the CLI and in tests. Answers are
//! delivered through the same completion callback the real platform uses,
//! optionally after a delay on a spawned task.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use super::{CredentialStateApi, CredentialStateCompletion, PlatformError, RawCredentialState};

/// Error code reported for scripted platform failures.
pub const SCRIPTED_ERROR_CODE: i64 = 1000;

/// What the scripted platform answers for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScriptedSignal {
    Authorized,
    Revoked,
    NotFound,
    Transferred,
    /// Completion carries an error.
    Error,
    /// Raw state value outside the known set.
    Unknown(i64),
}

impl ScriptedSignal {
    /// Completion arguments the platform would deliver for this signal.
    pub fn completion(self) -> (RawCredentialState, Option<PlatformError>) {
        match self {
            ScriptedSignal::Authorized => (RawCredentialState::Authorized, None),
            ScriptedSignal::Revoked => (RawCredentialState::Revoked, None),
            ScriptedSignal::NotFound => (RawCredentialState::NotFound, None),
            ScriptedSignal::Transferred => (RawCredentialState::Transferred, None),
            ScriptedSignal::Error => (
                RawCredentialState::Revoked,
                Some(PlatformError::new(
                    SCRIPTED_ERROR_CODE,
                    "scripted credential state failure",
                )),
            ),
            ScriptedSignal::Unknown(raw) => (RawCredentialState::from_raw(raw), None),
        }
    }
}

impl FromStr for ScriptedSignal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let trimmed = s.trim();
        let signal = match trimmed.to_ascii_lowercase().as_str() {
            "authorized" => ScriptedSignal::Authorized,
            "revoked" => ScriptedSignal::Revoked,
            "not_found" | "notfound" => ScriptedSignal::NotFound,
            "transferred" => ScriptedSignal::Transferred,
            "error" => ScriptedSignal::Error,
            other => {
                let Some(raw) = other.strip_prefix("unknown:") else {
                    bail!(
                        "Invalid platform signal '{trimmed}'. Expected one of: authorized, revoked, \
                         not_found, transferred, error, unknown:<n>"
                    );
                };
                let raw = raw
                    .parse::<i64>()
                    .with_context(|| format!("Invalid raw value in platform signal '{trimmed}'"))?;
                ScriptedSignal::Unknown(raw)
            }
        };
        Ok(signal)
    }
}

impl TryFrom<String> for ScriptedSignal {
    type Error = anyhow::Error;

    fn try_from(value: String) -> anyhow::Result<Self> {
        value.parse()
    }
}

impl From<ScriptedSignal> for String {
    fn from(signal: ScriptedSignal) -> Self {
        signal.to_string()
    }
}

impl std::fmt::Display for ScriptedSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptedSignal::Authorized => f.write_str("authorized"),
            ScriptedSignal::Revoked => f.write_str("revoked"),
            ScriptedSignal::NotFound => f.write_str("not_found"),
            ScriptedSignal::Transferred => f.write_str("transferred"),
            ScriptedSignal::Error => f.write_str("error"),
            ScriptedSignal::Unknown(raw) => write!(f, "unknown:{raw}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedCredentialApi {
    signals: BTreeMap<String, ScriptedSignal>,
    default_signal: ScriptedSignal,
    delay: Option<Duration>,
}

impl ScriptedCredentialApi {
    pub fn new(default_signal: ScriptedSignal) -> Self {
        Self {
            signals: BTreeMap::new(),
            default_signal,
            delay: None,
        }
    }

    #[must_use]
    pub fn with_signal(mut self, user_id: impl Into<String>, signal: ScriptedSignal) -> Self {
        self.signals.insert(user_id.into(), signal);
        self
    }

    #[must_use]
    pub fn with_signals(mut self, signals: BTreeMap<String, ScriptedSignal>) -> Self {
        self.signals.extend(signals);
        self
    }

    /// Delivers completions after `delay` instead of synchronously.
    #[must_use]
    pub fn with_delay(mut self, delay: Option<Duration>) -> Self {
        self.delay = delay;
        self
    }

    pub fn signal_for(&self, user_id: &str) -> ScriptedSignal {
        self.signals
            .get(user_id)
            .copied()
            .unwrap_or(self.default_signal)
    }
}

impl CredentialStateApi for ScriptedCredentialApi {
    fn get_credential_state(&self, user_id: &str, completion: CredentialStateCompletion) {
        let (state, error) = self.signal_for(user_id).completion();

        match (self.delay, Handle::try_current()) {
            (Some(delay), Ok(runtime)) if !delay.is_zero() => {
                runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    completion(state, error);
                });
            }
            _ => completion(state, error),
        }
    }
}
