/// Undo/redo manager built on committed batches of commands.
///
/// Commands are recorded into an open batch. `save` commits that batch to
/// the bounded done stack; `undo` and `redo` move whole batches between the
/// done and undone stacks, replaying their commands on the caller's target.
use std::collections::VecDeque;

use anyhow::Result;

use crate::batch::Batch;
use crate::command::{BoxedCommand, Command};
use crate::config::{HistoryConfig, DEFAULT_MAX_LOGS};

/// Manages undo/redo history for one target.
///
/// The manager never executes a command on `record`; running the forward
/// mutation is the caller's job. It only tracks ordering and replays
/// `invert`/`reapply` on undo/redo.
pub struct HistoryManager<T> {
    /// The open, uncommitted batch.
    recording: Batch<T>,
    /// Committed batches, oldest at the front.
    done: VecDeque<Batch<T>>,
    /// Undone batches, most recently undone on top.
    undone: Vec<Batch<T>>,
    /// Max committed batches kept in `done`.
    max_logs: usize,
    /// Next sequence number to assign on commit.
    next_seq: u64,
}

impl<T> std::fmt::Debug for HistoryManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("recording_len", &self.recording.len())
            .field("done_len", &self.done.len())
            .field("undone_len", &self.undone.len())
            .field("max_logs", &self.max_logs)
            .field("next_seq", &self.next_seq)
            .finish()
    }
}

impl<T> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HistoryManager<T> {
    /// Creates an empty manager holding up to `DEFAULT_MAX_LOGS` batches.
    pub fn new() -> Self {
        Self::with_config(HistoryConfig {
            max_logs: DEFAULT_MAX_LOGS,
        })
    }

    /// Creates an empty manager from a config.
    pub fn with_config(config: HistoryConfig) -> Self {
        let mut manager = Self {
            recording: Batch::new(),
            done: VecDeque::new(),
            undone: Vec::new(),
            max_logs: DEFAULT_MAX_LOGS,
            next_seq: 0,
        };
        manager.set_max_logs(config.max_logs);
        manager
    }

    /// The max number of batches that can be undone.
    pub fn max_logs(&self) -> usize {
        self.max_logs
    }

    /// Changes the history bound.
    ///
    /// Lowering the bound does not drop anything right away; the excess is
    /// evicted on the next `save`. Zero is raised to one.
    pub fn set_max_logs(&mut self, max_logs: usize) {
        if max_logs == 0 {
            tracing::warn!("max_logs must be at least 1, using 1");
            self.max_logs = 1;
        } else {
            self.max_logs = max_logs;
        }
    }

    /// Whether the open batch holds at least one command.
    pub fn is_recording(&self) -> bool {
        !self.recording.is_empty()
    }

    /// Appends a command to the open batch. Does not run it.
    ///
    /// Commands must be `Send` so a manager can sit behind a `Mutex`
    /// shared between threads.
    pub fn record(&mut self, command: impl Command<T> + Send + 'static) {
        self.record_boxed(Box::new(command));
    }

    /// Appends an already boxed command to the open batch.
    pub fn record_boxed(&mut self, command: BoxedCommand<T>) {
        tracing::debug!(
            "Recording {} (open batch now {} commands)",
            command.name(),
            self.recording.len() + 1
        );
        self.recording.push(command);
    }

    /// The open batch.
    pub fn recording(&self) -> &Batch<T> {
        &self.recording
    }

    /// The most recently recorded command in the open batch.
    pub fn last_recorded(&self) -> Option<&(dyn Command<T> + Send)> {
        self.recording.last()
    }

    /// Commits the open batch and starts a new one.
    ///
    /// Discards everything on the redo stack. If the done stack grows past
    /// `max_logs`, the oldest batches are dropped with a warning.
    pub fn save(&mut self) {
        let mut batch = std::mem::replace(&mut self.recording, Batch::new());
        batch.seal(self.next_seq);
        self.next_seq += 1;

        if !self.undone.is_empty() {
            tracing::debug!("Discarding {} redoable batches", self.undone.len());
            self.undone.clear();
        }

        tracing::debug!(
            "Committed batch #{} with {} commands",
            self.next_seq - 1,
            batch.len()
        );
        self.done.push_back(batch);

        while self.done.len() > self.max_logs {
            if let Some(dropped) = self.done.pop_front() {
                tracing::warn!(
                    "Dropped batch #{} from history: more than {} batches were committed. \
                     Raise max_logs to keep more undo steps",
                    dropped.seq().unwrap_or_default(),
                    self.max_logs
                );
            }
        }
    }

    /// Undoes the most recently committed batch.
    ///
    /// Inverts its commands newest first, then moves it to the redo stack.
    /// Returns `Ok(false)` if there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a command's `invert`. Commands
    /// already inverted are not rolled back, and the batch is dropped from
    /// history.
    pub fn undo(&mut self, target: &mut T) -> Result<bool> {
        let Some(mut batch) = self.done.pop_back() else {
            return Ok(false);
        };

        if let Err(e) = batch.invert_all(target) {
            tracing::error!(
                "Undo of batch #{} failed, dropping it: {e}",
                batch.seq().unwrap_or_default()
            );
            return Err(e);
        }

        tracing::debug!("Undid batch #{}", batch.seq().unwrap_or_default());
        self.undone.push(batch);
        Ok(true)
    }

    /// Redoes the most recently undone batch.
    ///
    /// Reapplies its commands in recording order, then moves it back to the
    /// done stack. Returns `Ok(false)` if there is nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a command's `reapply`. Commands
    /// already reapplied are not rolled back, and the batch is dropped from
    /// history.
    pub fn redo(&mut self, target: &mut T) -> Result<bool> {
        let Some(mut batch) = self.undone.pop() else {
            return Ok(false);
        };

        if let Err(e) = batch.reapply_all(target) {
            tracing::error!(
                "Redo of batch #{} failed, dropping it: {e}",
                batch.seq().unwrap_or_default()
            );
            return Err(e);
        }

        tracing::debug!("Redid batch #{}", batch.seq().unwrap_or_default());
        self.done.push_back(batch);
        Ok(true)
    }

    /// Whether a committed batch is available to undo.
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    /// Whether an undone batch is available to redo.
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Number of committed batches that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.done.len()
    }

    /// Number of undone batches that can be redone.
    pub fn redo_depth(&self) -> usize {
        self.undone.len()
    }

    /// Drops all history, including the open batch.
    pub fn clear(&mut self) {
        self.recording = Batch::new();
        self.done.clear();
        self.undone.clear();
    }
}
