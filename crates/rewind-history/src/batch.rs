/// The undo step: an append-only group of commands.
use std::fmt;

use crate::command::{BoxedCommand, Command};

/// A group of commands that undo/redo as a single step.
///
/// Commands are kept in the order they were recorded. Only the
/// `HistoryManager` can append to a batch, and only while it is the open
/// recording; committed batches are read-only.
pub struct Batch<T> {
    /// Commands in this batch, in recording order.
    commands: Vec<BoxedCommand<T>>,
    /// Sequence number assigned by the `HistoryManager` on commit.
    /// `None` while the batch is still being recorded.
    seq: Option<u64>,
}

impl<T> Batch<T> {
    pub(crate) fn new() -> Self {
        Self {
            commands: Vec::new(),
            seq: None,
        }
    }

    pub(crate) fn push(&mut self, command: BoxedCommand<T>) {
        self.commands.push(command);
    }

    pub(crate) fn seal(&mut self, seq: u64) {
        self.seq = Some(seq);
    }

    /// Sequence number of a committed batch.
    pub fn seq(&self) -> Option<u64> {
        self.seq
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterates the commands in recording order.
    pub fn commands(
        &self,
    ) -> impl DoubleEndedIterator<Item = &(dyn Command<T> + Send)> + '_ {
        self.commands.iter().map(|c| c.as_ref())
    }

    /// The most recently appended command.
    pub fn last(&self) -> Option<&(dyn Command<T> + Send)> {
        self.commands.last().map(|c| c.as_ref())
    }

    /// Inverts every command, newest first.
    ///
    /// Stops at the first failing command and returns its error untouched;
    /// commands before it in the batch stay applied.
    pub(crate) fn invert_all(&mut self, target: &mut T) -> anyhow::Result<()> {
        for command in self.commands.iter_mut().rev() {
            tracing::trace!("Inverting {}", command.name());
            command.invert(target)?;
        }
        Ok(())
    }

    /// Reapplies every command, oldest first.
    pub(crate) fn reapply_all(&mut self, target: &mut T) -> anyhow::Result<()> {
        for command in self.commands.iter_mut() {
            tracing::trace!("Reapplying {}", command.name());
            command.reapply(target)?;
        }
        Ok(())
    }
}

impl<T> fmt::Debug for Batch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batch")
            .field("seq", &self.seq)
            .field(
                "commands",
                &self.commands.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
