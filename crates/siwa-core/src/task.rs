//! Bookkeeping for the single in-flight status query.

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Lifecycle of one status query.
///
/// `Idle -> Querying -> {Succeeded, Failed, Superseded}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Querying,
    Succeeded,
    Failed,
    Superseded,
}

impl QueryPhase {
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            QueryPhase::Succeeded | QueryPhase::Failed | QueryPhase::Superseded
        )
    }
}

/// The active query, if any. Owned exclusively by the bridge.
#[derive(Debug, Default)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
    seq: TaskSeq,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Cancels the current query (if any) and registers a new one.
    ///
    /// Returns the new id, its token and the id of the superseded query.
    pub fn start(&mut self) -> (TaskId, CancellationToken, Option<TaskId>) {
        let superseded = self.active.take();
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        let id = self.seq.next_id();
        let cancel = CancellationToken::new();
        self.active = Some(id);
        self.cancel = Some(cancel.clone());
        (id, cancel, superseded)
    }

    /// Clears the slot if `id` is still the active query.
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
            self.cancel = None;
        }
        ok
    }

    /// Cancels the active query without starting another.
    pub fn clear(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_cancels_previous() {
        let mut tasks = TaskState::default();

        let (first, first_cancel, superseded) = tasks.start();
        assert_eq!(superseded, None);
        assert!(!first_cancel.is_cancelled());

        let (second, second_cancel, superseded) = tasks.start();
        assert_eq!(superseded, Some(first));
        assert!(first_cancel.is_cancelled());
        assert!(!second_cancel.is_cancelled());
        assert_ne!(first, second);
        assert_eq!(tasks.active, Some(second));
    }

    #[test]
    fn test_finish_if_active_ignores_stale_id() {
        let mut tasks = TaskState::default();
        let (first, _, _) = tasks.start();
        let (second, _, _) = tasks.start();

        assert!(!tasks.finish_if_active(first));
        assert!(tasks.is_running());
        assert!(tasks.finish_if_active(second));
        assert!(!tasks.is_running());
    }

    #[test]
    fn test_clear_cancels_active() {
        let mut tasks = TaskState::default();
        let (_, cancel, _) = tasks.start();

        tasks.clear();

        assert!(cancel.is_cancelled());
        assert!(!tasks.is_running());
    }

    #[test]
    fn test_finished_phases() {
        assert!(!QueryPhase::Idle.is_finished());
        assert!(!QueryPhase::Querying.is_finished());
        assert!(QueryPhase::Succeeded.is_finished());
        assert!(QueryPhase::Failed.is_finished());
        assert!(QueryPhase::Superseded.is_finished());
    }
}
