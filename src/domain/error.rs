use super::ResourceKind;
use thiserror::Error;

/// Failures surfaced by a [`ContainerRuntime`](super::ContainerRuntime).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Daemon unreachable, incompatible, or the connection was closed.
    #[error("cannot connect to the container engine: {0}")]
    Connection(String),

    #[error("failed to list {what}: {message}")]
    List { what: &'static str, message: String },

    #[error("failed to prune {kind}: {message}")]
    Prune { kind: ResourceKind, message: String },

    #[error("failed to stop container {id}: {message}")]
    Stop { id: String, message: String },

    #[error("failed to kill container {id}: {message}")]
    Kill { id: String, message: String },
}

impl RuntimeError {
    pub fn list(what: &'static str, message: impl ToString) -> Self {
        Self::List {
            what,
            message: message.to_string(),
        }
    }

    pub fn prune(kind: ResourceKind, message: impl ToString) -> Self {
        Self::Prune {
            kind,
            message: message.to_string(),
        }
    }

    pub fn stop(id: &str, message: impl ToString) -> Self {
        Self::Stop {
            id: id.to_string(),
            message: message.to_string(),
        }
    }

    pub fn kill(id: &str, message: impl ToString) -> Self {
        Self::Kill {
            id: id.to_string(),
            message: message.to_string(),
        }
    }

    /// Connection errors abort every command.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
