//! Error types for tagdoc

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tagdoc
#[derive(Debug, Error)]
pub enum TagdocError {
    #[error("Cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Refusing to overwrite input file: {0}")]
    SameInputOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TagdocError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TagdocError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn output_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TagdocError::OutputWrite {
            path: path.into(),
            source,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TagdocError::Configuration(_)
            | TagdocError::SameInputOutput(_)
            | TagdocError::TomlDeserialize(_) => 2,
            TagdocError::OutputWrite { .. } => 3,
            TagdocError::FileAccess { .. } => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            TagdocError::SameInputOutput(path) => {
                format!(
                    "Refusing to overwrite input file: {}\n\n\
                    Suggestions:\n\
                    • Pass a different path to --output\n\
                    • Pass --in-place to strip the file where it is",
                    path.display()
                )
            }
            TagdocError::Configuration(msg) => {
                if msg.contains("Unknown tag") {
                    format!(
                        "{}\n\n\
                        Default tags: EDU, NOTE, IMPORTANT, TODO, FIXME, HACK, DEBUG, REVIEW, OPTIMIZE\n\
                        Custom tags can be declared under [[tags]] in tagdoc.toml",
                        msg
                    )
                } else if msg.contains("Unknown category") {
                    format!(
                        "{}\n\n\
                        Declare the category under [[categories]] in tagdoc.toml",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            TagdocError::OutputWrite { path, .. } => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check that {} is a directory you can write to\n\
                    • Choose another location with --output",
                    self,
                    path.display()
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using TagdocError
pub type Result<T> = std::result::Result<T, TagdocError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_exit_codes() {
        assert_eq!(TagdocError::Configuration("x".to_string()).exit_code(), 2);
        assert_eq!(
            TagdocError::SameInputOutput(PathBuf::from("a.py")).exit_code(),
            2
        );
        assert_eq!(
            TagdocError::output_write("out", io::Error::other("denied")).exit_code(),
            3
        );
        assert_eq!(
            TagdocError::file_access("a.py", io::Error::other("missing")).exit_code(),
            4
        );
        assert_eq!(TagdocError::Io(io::Error::other("boom")).exit_code(), 1);
    }

    #[test]
    fn test_same_input_output_suggestions() {
        let err = TagdocError::SameInputOutput(PathBuf::from("src/app.py"));
        let msg = err.display_with_suggestions();
        assert!(msg.contains("src/app.py"));
        assert!(msg.contains("--in-place"));
    }

    #[test]
    fn test_unknown_tag_suggestions() {
        let err = TagdocError::Configuration("Unknown tag: NOPE".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("Default tags"));
        assert!(msg.contains("[[tags]]"));
    }

    #[test]
    fn test_file_access_message_names_path() {
        let err = TagdocError::file_access("missing.py", io::Error::other("not found"));
        assert_eq!(err.to_string(), "Cannot read missing.py: not found");
    }

    #[test]
    fn test_other_errors_fallback() {
        let err = TagdocError::Configuration("bad site title".to_string());
        assert_eq!(err.display_with_suggestions(), "bad site title");
    }
}
