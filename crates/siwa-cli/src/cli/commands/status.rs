//! `siwa status`: run one credential-status query through the store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use siwa_core::config::Config;
use siwa_core::platform::{PlatformCredentialProvider, ScriptedCredentialApi, ScriptedSignal};
use siwa_core::{SiwaAction, Store};

pub async fn run(
    config: &Config,
    user_id: &str,
    signal: Option<ScriptedSignal>,
    wait_secs: u64,
) -> Result<()> {
    let mut api = ScriptedCredentialApi::new(config.platform.default_signal)
        .with_signals(config.platform.users.clone())
        .with_delay(config.platform.delay());
    if let Some(signal) = signal {
        api = api.with_signal(user_id, signal);
    }
    tracing::debug!(user_id, signal = %api.signal_for(user_id), "scripted platform answer");

    let provider =
        PlatformCredentialProvider::new(Arc::new(api)).with_timeout(config.query_timeout());
    let mut store = Store::new(Arc::new(provider));

    store.dispatch(SiwaAction::request_status(user_id));
    let settled = store
        .run_until_settled(Duration::from_secs(wait_secs))
        .await
        .with_context(|| format!("credential status for '{user_id}' did not settle in {wait_secs}s"))?;

    println!("{}", serde_json::to_string_pretty(store.state())?);

    match settled.as_error() {
        Some(error) => {
            Err(error).with_context(|| format!("credential status query for '{user_id}' failed"))
        }
        None => Ok(()),
    }
}
