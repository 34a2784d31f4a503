use thiserror::Error;

/// Error taxonomy for the command-routing subsystem.
///
/// Everything except `ModuleLoad` is caught at the router boundary and turned
/// into a user-visible reply. `ModuleLoad` propagates to whoever asked for the
/// load, unless it happened inside a batch operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CyborgError {
    #[error("{0}")]
    Parse(String),

    #[error("failed loading module {module}: {reason}")]
    ModuleLoad { module: String, reason: String },

    #[error("no such module: `{0}`")]
    ModuleNotFound(String),

    #[error("no such command `{command}` in module `{module}`")]
    CommandNotFound { module: String, command: String },

    #[error("failed to run {module}.{command}: {message}")]
    HandlerExecution {
        module: String,
        command: String,
        message: String,
    },
}

impl CyborgError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn module_load(module: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ModuleLoad {
            module: module.into(),
            reason: reason.to_string(),
        }
    }

    /// Short machine-friendly tag, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::ModuleLoad { .. } => "module_load",
            Self::ModuleNotFound(_) => "module_not_found",
            Self::CommandNotFound { .. } => "command_not_found",
            Self::HandlerExecution { .. } => "handler_execution",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_execution_message_format() {
        let err = CyborgError::HandlerExecution {
            module: "greet".into(),
            command: "hello".into(),
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "failed to run greet.hello: boom");
    }

    #[test]
    fn module_load_wraps_reason() {
        let err = CyborgError::module_load("greet", "module is already loaded");
        assert_eq!(
            err.to_string(),
            "failed loading module greet: module is already loaded"
        );
        assert_eq!(err.kind(), "module_load");
    }

    #[test]
    fn not_found_kinds_are_distinct() {
        let module = CyborgError::ModuleNotFound("m".into());
        let command = CyborgError::CommandNotFound {
            module: "m".into(),
            command: "c".into(),
        };
        assert_ne!(module.kind(), command.kind());
    }
}
