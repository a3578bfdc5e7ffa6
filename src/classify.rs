//! Image selection and dispatch mode heuristics.
//!
//! Everything here is a pure function of the command tokens and the parsed flags.

use crate::error::LaunchError;
use std::ffi::OsString;

/// Image used when neither an override nor the lookup table applies.
pub const DEFAULT_IMAGE: &str = "alpine:latest";

/// Substrings that make a lone argument look like a shell command line.
const SHELL_OPERATORS: [&str; 7] = ["&&", "||", ";", "|", "$", "`", "("];

/// How the command is started inside the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Command and arguments are handed to the runtime unchanged.
    Exec(Vec<OsString>),
    /// Arguments joined by single spaces, run as `sh -c <joined>`.
    ///
    /// The join does not re-quote anything: `["echo", "a b"]` becomes `echo a b`.
    Shell(OsString),
}

/// Result of classifying one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub image: String,
    pub dispatch: Dispatch,
}

/// Image for a command name according to the built-in table.
pub fn image_for_command(name: &str) -> &'static str {
    match name {
        "go" | "gofmt" | "golangci-lint" => "golang:alpine",
        "python" | "python3" | "pip" => "python:alpine",
        "npx" => "node:alpine",
        _ => DEFAULT_IMAGE,
    }
}

/// Pick the image: a non-empty override wins, otherwise the command name decides.
///
/// A command name that is not valid UTF-8 never matches the table.
pub fn select_image(command: &[OsString], image_override: Option<&str>) -> String {
    match image_override {
        Some(image) if !image.is_empty() => image.to_string(),
        _ => {
            let name = command.first().and_then(|name| name.to_str());
            image_for_command(name.unwrap_or_default()).to_string()
        }
    }
}

/// Whether `s` contains any of the operators that suggest a shell command line.
pub fn contains_shell_operators(s: &str) -> bool {
    SHELL_OPERATORS.iter().any(|op| s.contains(op))
}

/// Decide between direct exec and `sh -c`.
///
/// `explicit_shell` is true when `--shell`/`-s` was given; the flag itself is not part
/// of `command`. Without the flag, a single token containing a shell operator is
/// treated as a shell command line. This also matches file names that happen to
/// contain `$` or `(`.
pub fn dispatch(command: Vec<OsString>, explicit_shell: bool) -> Result<Dispatch, LaunchError> {
    if command.is_empty() {
        return Err(LaunchError::Usage(if explicit_shell {
            "--shell requires a command string".to_string()
        } else {
            "missing command".to_string()
        }));
    }

    let looks_like_shell =
        command.len() == 1 && contains_shell_operators(&command[0].to_string_lossy());
    if explicit_shell || looks_like_shell {
        Ok(Dispatch::Shell(join_with_spaces(&command)))
    } else {
        Ok(Dispatch::Exec(command))
    }
}

fn join_with_spaces(command: &[OsString]) -> OsString {
    let mut line = OsString::new();
    for (i, arg) in command.iter().enumerate() {
        if i > 0 {
            line.push(" ");
        }
        line.push(arg);
    }
    line
}

/// Classify a command: image from the first token, then the dispatch mode.
pub fn classify(
    command: Vec<OsString>,
    explicit_shell: bool,
    image_override: Option<&str>,
) -> Result<Classification, LaunchError> {
    let image = select_image(&command, image_override);
    let dispatch = dispatch(command, explicit_shell)?;
    Ok(Classification { image, dispatch })
}
