//! Credential status bridge.
//!
//! Middleware between `RequestStatus` commands and the injected
//! [`CredentialStateProvider`]. At most one query is outstanding: a new
//! request cancels the previous one, and a superseded query never emits.
//!
//! ## Emission
//!
//! The terminal action is sent while holding the task lock, after checking
//! the query is still the active one. `request_status` replaces the active
//! query under the same lock, so a result can never race past a newer
//! request.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tracing::{Instrument, Span, debug, warn};

use crate::action::{ActionSender, SiwaAction};
use crate::error::SiwaError;
use crate::provider::{CredentialStateProvider, CredentialStateResult};
use crate::task::{QueryPhase, TaskId, TaskState};

pub struct CredentialStatusBridge {
    provider: Arc<dyn CredentialStateProvider>,
    output: ActionSender,
    tasks: Arc<Mutex<TaskState>>,
    span: Span,
}

impl CredentialStatusBridge {
    /// Creates a bridge that emits terminal actions on `output`.
    pub fn new(provider: Arc<dyn CredentialStateProvider>, output: ActionSender) -> Self {
        Self {
            provider,
            output,
            tasks: Arc::new(Mutex::new(TaskState::default())),
            span: tracing::debug_span!("siwa_bridge"),
        }
    }

    /// Replaces the span query tasks are instrumented with.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Reacts to an action. Only `RequestStatus` has an effect.
    pub fn handle(&self, action: &SiwaAction) {
        if let SiwaAction::RequestStatus { user_id } = action {
            self.request_status(user_id);
        }
    }

    /// True while a query is outstanding.
    pub fn is_querying(&self) -> bool {
        lock(&self.tasks).is_running()
    }

    /// Cancels the outstanding query, if any. Nothing is emitted for it.
    pub fn cancel(&self) {
        lock(&self.tasks).clear();
    }

    fn request_status(&self, user_id: &str) {
        let _entered = self.span.enter();

        let Ok(runtime) = Handle::try_current() else {
            warn!(user_id, "no async runtime available for credential status query");
            // Still a newer request: the outstanding query must not report.
            lock(&self.tasks).clear();
            let _ = self
                .output
                .send(SiwaAction::error(SiwaError::UnknownCredentialState));
            return;
        };

        let (id, cancel, superseded) = lock(&self.tasks).start();
        if let Some(previous) = superseded {
            debug!(task = %previous, "credential status query superseded");
        }
        debug!(task = %id, user_id, "credential status query started");

        let query = self.provider.credential_state(user_id);
        let tasks = Arc::clone(&self.tasks);
        let output = self.output.clone();

        runtime.spawn(
            async move {
                let phase = tokio::select! {
                    biased;
                    () = cancel.cancelled() => QueryPhase::Superseded,
                    result = query => emit(&tasks, &output, id, result),
                };
                debug!(task = %id, ?phase, "credential status query finished");
            }
            .instrument(self.span.clone()),
        );
    }
}

impl Drop for CredentialStatusBridge {
    fn drop(&mut self) {
        lock(&self.tasks).clear();
    }
}

fn emit(
    tasks: &Mutex<TaskState>,
    output: &ActionSender,
    id: TaskId,
    result: CredentialStateResult,
) -> QueryPhase {
    let mut tasks = lock(tasks);
    if !tasks.finish_if_active(id) {
        return QueryPhase::Superseded;
    }

    let (action, phase) = match result {
        Ok(status) => {
            debug!(%status, "credential status received");
            (SiwaAction::status(status), QueryPhase::Succeeded)
        }
        Err(error) => {
            warn!(%error, "credential status query failed");
            (SiwaAction::error(error), QueryPhase::Failed)
        }
    };
    // Receiver gone means the store shut down; nothing left to notify.
    let _ = output.send(action);
    phase
}

fn lock(tasks: &Mutex<TaskState>) -> MutexGuard<'_, TaskState> {
    tasks.lock().unwrap_or_else(PoisonError::into_inner)
}
