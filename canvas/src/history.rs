//! Linear undo/redo over full project snapshots.
//!
//! Changes are not recorded immediately: [`History::schedule`] parks the
//! latest project as a pending snapshot due `debounce_ms` later, and each new
//! change pushes the due time out again. A continuous drag therefore
//! collapses into one entry. The clock is supplied by the caller so the
//! debounce is deterministic under test.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use tracing::trace;

use crate::config::EditorConfig;
use crate::scene::Project;

#[derive(Debug, Clone)]
struct Pending {
    project: Project,
    due_at: u64,
}

/// Snapshot stack with a cursor.
///
/// `entries[index]` is the state the live project was last recorded or
/// restored as. Entries after `index` are the redo branch.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Project>,
    index: usize,
    pending: Option<Pending>,
    limit: usize,
    debounce_ms: u64,
}

impl History {
    /// Start a history whose first entry is `initial`.
    #[must_use]
    pub fn new(initial: Project, config: &EditorConfig) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            pending: None,
            limit: config.effective_history_limit(),
            debounce_ms: config.history_debounce_ms,
        }
    }

    /// Park `project` as the pending snapshot, replacing any earlier one.
    /// Returns the time at which it becomes due.
    pub fn schedule(&mut self, project: &Project, now_ms: u64) -> u64 {
        let due_at = now_ms.saturating_add(self.debounce_ms);
        self.pending = Some(Pending { project: project.clone(), due_at });
        due_at
    }

    /// Commit the pending snapshot if its quiet period has elapsed. Returns
    /// `true` if an entry was appended.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let due = self.pending.as_ref().is_some_and(|p| now_ms >= p.due_at);
        if due { self.flush() } else { false }
    }

    /// Commit the pending snapshot now, whatever its due time.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(p) => self.commit(p.project),
            None => false,
        }
    }

    /// Drop the pending snapshot without recording it.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Append `project` after the cursor.
    ///
    /// A snapshot equal to the one at the cursor is discarded. Otherwise the
    /// redo branch is truncated, the snapshot pushed, the oldest entries
    /// dropped down to the limit, and the cursor moved to the new last entry.
    pub fn commit(&mut self, project: Project) -> bool {
        if self.entries.get(self.index) == Some(&project) {
            trace!(index = self.index, "identical snapshot skipped");
            return false;
        }

        self.entries.truncate(self.index + 1);
        self.entries.push(project);
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;

        trace!(index = self.index, len = self.entries.len(), "snapshot recorded");
        true
    }

    /// Step the cursor back and return the snapshot to restore. A pending
    /// snapshot is dropped only when there is something to undo.
    pub fn undo(&mut self) -> Option<&Project> {
        if self.index == 0 {
            return None;
        }
        self.cancel_pending();
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step the cursor forward and return the snapshot to restore. A
    /// pending snapshot is dropped only when there is something to redo.
    pub fn redo(&mut self) -> Option<&Project> {
        if !self.can_redo() {
            return None;
        }
        self.cancel_pending();
        self.index += 1;
        self.entries.get(self.index)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the initial snapshot is never dropped below one entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Project> {
        self.entries.get(self.index)
    }

    /// Due time of the pending snapshot, if any.
    #[must_use]
    pub fn pending_due_at(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.due_at)
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
