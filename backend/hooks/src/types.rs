/// How a dispatch attempt ended, as reported to post-run hooks.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The handler ran to completion.
    Completed,
    /// No module with the command's module name is loaded.
    ModuleNotFound,
    /// The module exists but exports no such command.
    CommandNotFound,
    /// The handler failed or timed out.
    Failed { error: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
