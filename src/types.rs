use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Interpreter family of a catalog script.
///
/// Unknown values survive deserialization as `Other` so the catalog can still
/// be listed; the argument builder rejects them before anything is spawned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScriptType {
    Bash,
    Python,
    Other(String),
}

impl From<String> for ScriptType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "bash" => ScriptType::Bash,
            "python" => ScriptType::Python,
            _ => ScriptType::Other(s),
        }
    }
}

impl From<ScriptType> for String {
    fn from(t: ScriptType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptType::Bash => f.write_str("bash"),
            ScriptType::Python => f.write_str("python"),
            ScriptType::Other(s) => f.write_str(s),
        }
    }
}

/// How a parameter value is rendered onto the command line.
///
/// Anything other than `checkbox` or `list` behaves like `text`, but the
/// original spelling is kept for round-tripping to the frontend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
    #[default]
    Text,
    Checkbox,
    List,
    Other(String),
}

impl From<String> for ParamType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => ParamType::Text,
            "checkbox" => ParamType::Checkbox,
            "list" => ParamType::List,
            _ => ParamType::Other(s),
        }
    }
}

impl From<ParamType> for String {
    fn from(t: ParamType) -> Self {
        match t {
            ParamType::Text => "text".to_string(),
            ParamType::Checkbox => "checkbox".to_string(),
            ParamType::List => "list".to_string(),
            ParamType::Other(s) => s,
        }
    }
}

/// Origin tag of a [`crate::exec::StreamEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Stdout,
    Stderr,
    System,
}

impl StreamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
            StreamKind::System => "system",
        }
    }
}

/// Log level as exposed on the CLI and in `KANAME_LOG`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("invalid log level: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_param_type_keeps_its_spelling() {
        let t: ParamType = serde_json::from_str("\"select\"").unwrap();
        assert_eq!(t, ParamType::Other("select".to_string()));
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"select\"");
    }

    #[test]
    fn param_type_defaults_to_text() {
        assert_eq!(ParamType::default(), ParamType::Text);
    }

    #[test]
    fn script_type_parses_known_interpreters() {
        let t: ScriptType = serde_json::from_str("\"python\"").unwrap();
        assert_eq!(t, ScriptType::Python);
        let t: ScriptType = serde_json::from_str("\"ruby\"").unwrap();
        assert_eq!(t.to_string(), "ruby");
    }

    #[test]
    fn stream_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&StreamKind::Stderr).unwrap(), "\"stderr\"");
    }
}
