use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationInvalidArgument,

    PatternInvalid,

    WalkUnreadableMetadata,
    ContentNotText,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::PatternInvalid => "pattern.invalid",

            ErrorCode::WalkUnreadableMetadata => "walk.unreadable_metadata",
            ErrorCode::ContentNotText => "content.not_text",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInvalidDetails {
    pub pattern: String,
    pub error: String,
}

/// Failure on a single filesystem entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryIoDetails {
    pub action: String,
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        let problem = problem.into();
        Self::new(
            ErrorCode::ValidationInvalidArgument,
            format!("Invalid argument: {}", problem),
            to_details(InvalidArgumentDetails {
                field: field.into(),
                problem,
                value,
            }),
        )
    }

    pub fn pattern_invalid(pattern: impl Into<String>, error: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let error = error.into();
        Self::new(
            ErrorCode::PatternInvalid,
            format!(
                "Could not compile regular expression: {} - {}",
                pattern, error
            ),
            to_details(PatternInvalidDetails { pattern, error }),
        )
        .with_hint("Drop --regexp to search for the text literally")
    }

    /// An I/O failure on one entry, rendered as `Could not <action>: <path> (<cause>)`.
    pub fn entry_io(
        action: impl Into<String>,
        path: impl Into<String>,
        error: impl std::fmt::Display,
    ) -> Self {
        let action = action.into();
        let path = path.into();
        let error = error.to_string();
        Self::new(
            ErrorCode::InternalIoError,
            format!("Could not {}: {} ({})", action, path, error),
            to_details(EntryIoDetails {
                action,
                path,
                error,
            }),
        )
    }

    pub fn walk_unreadable_metadata(path: impl Into<String>, error: impl std::fmt::Display) -> Self {
        let path = path.into();
        let error = error.to_string();
        Self::new(
            ErrorCode::WalkUnreadableMetadata,
            format!("Could not read fileinfo: {} ({})", path, error),
            to_details(EntryIoDetails {
                action: "stat".to_string(),
                path,
                error,
            }),
        )
    }

    /// File content that is not valid UTF-8 and cannot be rewritten as text.
    pub fn content_not_text(path: impl Into<String>, error: impl std::fmt::Display) -> Self {
        let path = path.into();
        let error = error.to_string();
        Self::new(
            ErrorCode::ContentNotText,
            format!("Not a text file: {} ({})", path, error),
            to_details(EntryIoDetails {
                action: "read".to_string(),
                path,
                error,
            }),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalIoError,
            "IO error",
            to_details(InternalIoErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            to_details(InternalJsonErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
