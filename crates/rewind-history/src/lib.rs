/// Reversible-command history.
///
/// Callers execute their own commands and hand them to a `HistoryManager`,
/// which groups them into batches and replays them backwards on undo and
/// forwards on redo. Each manager is an independent, explicitly owned
/// history, so one application can keep one per document.
pub mod batch;
pub mod command;
pub mod config;
pub mod manager;

pub use batch::Batch;
pub use command::{BoxedCommand, Command};
pub use config::HistoryConfig;
pub use manager::HistoryManager;
