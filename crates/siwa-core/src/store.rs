//! State container wiring the inbox, the bridge and the reducer.
//!
//! ## Inbox Pattern
//!
//! External producers and the bridge send actions to one inbox channel.
//! The store drains it one action at a time: the bridge sees the action
//! first, then the reducer folds it, then the new snapshot is published to
//! subscribers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::error::Elapsed;
use tracing::trace;

use crate::action::{self, ActionReceiver, ActionSender, SiwaAction};
use crate::bridge::CredentialStatusBridge;
use crate::provider::CredentialStateProvider;
use crate::reducer::reduce;
use crate::state::SiwaState;

pub struct Store {
    state: SiwaState,
    bridge: CredentialStatusBridge,
    inbox_tx: ActionSender,
    inbox_rx: ActionReceiver,
    snapshots: watch::Sender<SiwaState>,
}

impl Store {
    /// Creates a store starting from the empty state.
    pub fn new(provider: Arc<dyn CredentialStateProvider>) -> Self {
        Self::with_state(provider, SiwaState::empty())
    }

    /// Creates a store starting from `initial`.
    pub fn with_state(provider: Arc<dyn CredentialStateProvider>, initial: SiwaState) -> Self {
        let (inbox_tx, inbox_rx) = action::channel();
        let bridge = CredentialStatusBridge::new(provider, inbox_tx.clone());
        let (snapshots, _) = watch::channel(initial.clone());
        Self {
            state: initial,
            bridge,
            inbox_tx,
            inbox_rx,
            snapshots,
        }
    }

    pub fn state(&self) -> &SiwaState {
        &self.state
    }

    pub fn bridge(&self) -> &CredentialStatusBridge {
        &self.bridge
    }

    /// Sender for producers outside the store (UI, platform callbacks).
    pub fn dispatcher(&self) -> ActionSender {
        self.inbox_tx.clone()
    }

    /// Receiver notified with every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SiwaState> {
        self.snapshots.subscribe()
    }

    /// Runs one action through the bridge and the reducer.
    pub fn dispatch(&mut self, action: SiwaAction) {
        trace!(?action, "dispatch");
        self.bridge.handle(&action);
        self.state = reduce(&action, &self.state);
        self.snapshots.send_replace(self.state.clone());
    }

    /// Waits for the next inbox action and dispatches it.
    ///
    /// The store keeps a sender of its own, so this only returns `None`
    /// if the channel is closed from the receiving side.
    pub async fn next(&mut self) -> Option<SiwaAction> {
        let action = self.inbox_rx.recv().await?;
        self.dispatch(action.clone());
        Some(action)
    }

    /// Dispatches inbox actions until a `Status` or `Error` action has been
    /// folded, or `limit` elapses. Returns the terminal action.
    pub async fn run_until_settled(&mut self, limit: Duration) -> Result<SiwaAction, Elapsed> {
        tokio::time::timeout(limit, async {
            loop {
                match self.next().await {
                    Some(action) if action.is_terminal() => return action,
                    Some(_) => {}
                    // Unreachable while the store owns a sender; wait out the limit.
                    None => std::future::pending::<()>().await,
                }
            }
        })
        .await
    }
}
