use std::sync::{Mutex, MutexGuard, PoisonError};

use steprail_core::StepOutput;
use steprail_pipeline::{ScopeBlock, ScopeError, TransactionalResource};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeEnd {
    Committed,
    RolledBack,
}

impl ScopeEnd {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Committed => "committed",
            Self::RolledBack => "rolled back",
        }
    }
}

#[derive(Debug, Default)]
struct JournalState {
    entries: Vec<String>,
    pending: Option<Vec<String>>,
    last_end: Option<ScopeEnd>,
}

/// In-memory record of what the machine did. Entries written inside a
/// scope stay pending until the scope commits.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    state: Mutex<JournalState>,
}

impl Journal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, entry: impl Into<String>) {
        let mut state = self.lock();
        let entry = entry.into();
        match state.pending.as_mut() {
            Some(pending) => pending.push(entry),
            None => state.entries.push(entry),
        }
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.lock().entries.clone()
    }

    pub(crate) fn last_end(&self) -> Option<ScopeEnd> {
        self.lock().last_end
    }

    // Poisoning only means a step panicked mid-scope; the scope guard has
    // already discarded that scope's entries.
    fn lock(&self) -> MutexGuard<'_, JournalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open_scope(&self) -> OpenScope<'_> {
        self.lock().pending = Some(Vec::new());
        OpenScope {
            journal: self,
            commit: false,
        }
    }
}

/// Closes the journal's scope when dropped, including during a panic.
/// Pending entries are kept only if `commit` was set.
struct OpenScope<'a> {
    journal: &'a Journal,
    commit: bool,
}

impl Drop for OpenScope<'_> {
    fn drop(&mut self) {
        let mut state = self.journal.lock();
        let pending = state.pending.take().unwrap_or_default();
        let end = if self.commit {
            state.entries.extend(pending);
            ScopeEnd::Committed
        } else {
            debug!(discarded = pending.len(), "journal scope aborted");
            ScopeEnd::RolledBack
        };
        state.last_end = Some(end);
    }
}

impl TransactionalResource for Journal {
    fn run_in_scope(&self, block: ScopeBlock<'_>) -> Result<StepOutput, ScopeError> {
        let mut scope = self.open_scope();
        let result = block();
        scope.commit = result.is_ok();
        drop(scope);
        result
    }
}
