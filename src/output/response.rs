//! CLI response formatting and output.
//!
//! Provides JSON envelope, printing, and exit code mapping.

use retree::error::Hint;
use retree::{Error, ErrorCode, Result};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ValidationInvalidArgument | ErrorCode::PatternInvalid => 2,

        ErrorCode::WalkUnreadableMetadata
        | ErrorCode::ContentNotText
        | ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError => 1,
    }
}

pub fn print_json_result(result: Result<serde_json::Value>) -> Result<()> {
    match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => print_response(&CliResponse::<()>::from_error(&err)),
    }
}

/// Human-readable rendering of a fatal error: an `[ERROR]` line plus hints.
pub fn print_error_line(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", render_error(err));
}

fn render_error(err: &Error) -> String {
    let mut text = format!("[ERROR] {}", err.message);
    for hint in &err.hints {
        text.push_str(&format!("\n  hint: {}", hint.message));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_carries_data() {
        let response = CliResponse::success(json!({"filesChanged": 2}));
        let value: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["filesChanged"], 2);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn error_envelope_carries_code_and_hints() {
        let err = Error::pattern_invalid("fo(o", "unclosed group");
        let response = CliResponse::<()>::from_error(&err);
        let value: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "pattern.invalid");
        assert_eq!(value["error"]["details"]["pattern"], "fo(o");
        assert_eq!(value["error"]["hints"].as_array().unwrap().len(), 1);
        assert!(value.get("data").is_none());
    }

    #[test]
    fn exit_codes_by_error_kind() {
        assert_eq!(exit_code_for_error(ErrorCode::PatternInvalid), 2);
        assert_eq!(exit_code_for_error(ErrorCode::ValidationInvalidArgument), 2);
        assert_eq!(exit_code_for_error(ErrorCode::InternalIoError), 1);
        assert_eq!(exit_code_for_error(ErrorCode::WalkUnreadableMetadata), 1);
    }

    #[test]
    fn map_cmd_result_keeps_success_exit_code() {
        let (value, code) = map_cmd_result_to_json(Ok((json!({"entries": 3}), 0)));
        assert_eq!(code, 0);
        assert_eq!(value.unwrap()["entries"], 3);

        let (value, code) = map_cmd_result_to_json::<serde_json::Value>(Err(
            Error::validation_invalid_argument("search", "Search term must not be empty", None),
        ));
        assert_eq!(code, 2);
        assert!(value.is_err());
    }

    #[test]
    fn error_line_lists_hints() {
        let err = Error::pattern_invalid("(", "unclosed group");
        assert_eq!(
            render_error(&err),
            "[ERROR] Could not compile regular expression: ( - unclosed group\n  hint: Drop --regexp to search for the text literally"
        );
    }
}
