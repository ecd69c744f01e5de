use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirageError {
    #[error("Failed to get package info for {target}: {reason}")]
    MetadataError { target: String, reason: String },

    #[error("Cannot plan package {import_path}: {reason}")]
    PlanningInvariantError { import_path: String, reason: String },

    #[error("Failed to copy {}: {source}", path.display())]
    CopyError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` failed: {output}")]
    ToolError { command: String, output: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Metadata,
    Planning,
    Filesystem,
    Toolchain,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MirageError {
    pub fn metadata(target: impl Into<String>, reason: impl ToString) -> Self {
        Self::MetadataError {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invariant(import_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PlanningInvariantError {
            import_path: import_path.into(),
            reason: reason.into(),
        }
    }

    pub fn copy(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CopyError {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MetadataError { .. } => ErrorCategory::Metadata,
            Self::PlanningInvariantError { .. } => ErrorCategory::Planning,
            Self::CopyError { .. } | Self::IoError(_) => ErrorCategory::Filesystem,
            Self::ToolError { .. } | Self::SerializationError(_) => ErrorCategory::Toolchain,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Metadata | ErrorCategory::Planning | ErrorCategory::Toolchain => {
                ErrorSeverity::High
            }
            // 目的地可能只寫了一半
            ErrorCategory::Filesystem => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MetadataError { .. } => {
                "Check that the source directory is a Go package inside a module and that `go list` works there"
            }
            Self::PlanningInvariantError { .. } => {
                "The source module layout is not supported; look for nested modules or paths that differ only by case"
            }
            Self::CopyError { .. } | Self::IoError(_) => {
                "The destination may be partially written; fix the filesystem problem and run again"
            }
            Self::ToolError { .. } => "Make sure `go` and `goimports` are installed and on PATH",
            Self::SerializationError(_) => "The Go toolchain produced unexpected output; check its version",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ValidationError { .. } => "Review the command-line options and the config file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MetadataError { target, .. } => {
                format!("Could not read Go package information for {}", target)
            }
            Self::PlanningInvariantError { import_path, reason } => {
                format!("Package {} cannot be extracted: {}", import_path, reason)
            }
            Self::CopyError { path, .. } => format!("Could not write {}", path.display()),
            Self::ToolError { command, .. } => format!("External command failed: {}", command),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MirageError>;
