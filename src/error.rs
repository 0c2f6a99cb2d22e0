use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvcastError {
    #[error("Field '{field}' has no source key; described fields must set `key`")]
    MissingKeyDeclaration { field: String },

    #[error("Type '{tag}' for '{field}' does not exist in types: string | number | array | object | boolean")]
    UnknownType { field: String, tag: String },

    #[error(
        "The default value should match its type definition: {key} : {default} <{default_type}> !== <{declared}>"
    )]
    DefaultTypeMismatch {
        key: String,
        default: String,
        default_type: String,
        declared: String,
    },

    #[error("No value defined for '{field}' at key '{key}'{}", prefix_note(.prefix))]
    NoValueFound {
        field: String,
        key: String,
        prefix: Option<String>,
    },

    #[error(
        "Value for '{field}' @ '{key}' could not be converted to a structured value. Keeping original value as <string>"
    )]
    StructuredParseFailure {
        field: String,
        key: String,
        source: serde_json::Error,
    },

    #[error("Value '{raw}' for '{field}' @ '{key}' is not a number. Keeping original value as <string>")]
    InvalidNumber {
        field: String,
        key: String,
        raw: String,
    },

    #[error("Failed to parse {format} document: {reason}")]
    ParseError { format: &'static str, reason: String },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Resolved values do not fit the target type: {0}")]
    Deserialize(#[source] serde_json::Error),
}

fn prefix_note(prefix: &Option<String>) -> String {
    match prefix {
        Some(p) => format!(" using prefix '{p}'"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_value_mentions_prefix_when_set() {
        let err = EnvcastError::NoValueFound {
            field: "port".into(),
            key: "APP_PORT".into(),
            prefix: Some("APP_".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("port"));
        assert!(msg.contains("APP_PORT"));
        assert!(msg.contains("using prefix 'APP_'"));
    }

    #[test]
    fn no_value_without_prefix() {
        let err = EnvcastError::NoValueFound {
            field: "port".into(),
            key: "PORT".into(),
            prefix: None,
        };
        assert!(!err.to_string().contains("prefix"));
    }

    #[test]
    fn mismatch_formats_both_types() {
        let err = EnvcastError::DefaultTypeMismatch {
            key: "EMPTY_KEY".into(),
            default: "123".into(),
            default_type: "string".into(),
            declared: "number".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("<string>"));
        assert!(msg.contains("<number>"));
    }
}
