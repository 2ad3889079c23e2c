use std::fmt;

use serde::Serialize;

/// Errors raised while executing or assembling a shader node program.
///
/// None of these are recoverable at the node level: they mean the program
/// handed to the interpreter is malformed, so evaluation of that program stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvmError {
    /// A noise node asked for a dimensionality outside 1..=4.
    InvalidDimensions { dimensions: u32 },
    /// A node type word that the interpreter does not know.
    UnknownNode { node_type: u32, offset: usize },
    /// The node stream ended while a node still expected a trailing word.
    Truncated { offset: usize },
    /// The program builder ran out of register-stack slots.
    StackOverflow { requested: usize },
}

impl fmt::Display for SvmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvmError::InvalidDimensions { dimensions } => {
                write!(f, "Invalid noise dimensions: {dimensions}")
            }
            SvmError::UnknownNode { node_type, offset } => {
                write!(f, "Unknown node type {node_type} at offset {offset}")
            }
            SvmError::Truncated { offset } => {
                write!(f, "Program truncated at offset {offset}")
            }
            SvmError::StackOverflow { requested } => {
                write!(f, "Register stack exhausted ({requested} slots requested)")
            }
        }
    }
}

impl std::error::Error for SvmError {}

impl Serialize for SvmError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

// ── File-level errors ───────────────────────────────────────────────

/// Errors from loading or saving configs, programs and rendered images.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
    Svm(SvmError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {e}"),
            ConfigError::Json(e) => write!(f, "JSON error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {msg}"),
            ConfigError::Svm(e) => write!(f, "Program error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Svm(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl From<SvmError> for ConfigError {
    fn from(e: SvmError) -> Self {
        ConfigError::Svm(e)
    }
}

impl From<String> for ConfigError {
    fn from(s: String) -> Self {
        ConfigError::Invalid(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            SvmError::InvalidDimensions { dimensions: 7 }.to_string(),
            "Invalid noise dimensions: 7"
        );
        let wrapped = ConfigError::from(SvmError::Truncated { offset: 3 });
        assert_eq!(wrapped.to_string(), "Program error: Program truncated at offset 3");
    }

    #[test]
    fn svm_error_serializes_as_string() {
        let json = serde_json::to_string(&SvmError::StackOverflow { requested: 300 });
        assert_eq!(
            json.ok().as_deref(),
            Some("\"Register stack exhausted (300 slots requested)\"")
        );
    }
}
