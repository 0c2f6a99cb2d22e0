//! Tags and modes shared across the resolution pipeline.
//!
//! Option documents are often written by hand, so [`CoerceMode`] and
//! [`Verbosity`] accept several spellings when deserialized:
//!
//! | Field | Accepted |
//! |-------|----------|
//! | `coerce` | `false`, `true`, `0`, `1`, `2`, `"off"`, `"explicit"`, `"auto"` |
//! | `verbose` | `0`, `1`, `2`, `"silent"`, `"log"`, `"throw"` |

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The five value shapes the coercion engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeTag {
    #[default]
    String,
    Number,
    Array,
    Object,
    Boolean,
}

impl TypeTag {
    /// Match a tag by its first letter, ignoring case.
    ///
    /// `n`/`i` → number, `o` → object, `a` → array, `b` → boolean.
    /// Everything else, including the empty string, is a string.
    pub fn from_tag(tag: &str) -> TypeTag {
        Self::recognize(tag).unwrap_or(TypeTag::String)
    }

    /// Like [`from_tag`](Self::from_tag), but `None` for tags that name no
    /// known type (anything not starting with `s`, `n`, `i`, `o`, `a`, `b`).
    pub fn recognize(tag: &str) -> Option<TypeTag> {
        let first = tag.trim_start().chars().next()?.to_ascii_lowercase();
        match first {
            'n' | 'i' => Some(TypeTag::Number),
            'o' => Some(TypeTag::Object),
            'a' => Some(TypeTag::Array),
            'b' => Some(TypeTag::Boolean),
            's' => Some(TypeTag::String),
            _ => None,
        }
    }

    /// The runtime shape of an already-typed value.
    pub fn of_value(value: &Value) -> TypeTag {
        match value {
            Value::Number(_) => TypeTag::Number,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) | Value::Null => TypeTag::Object,
            Value::String(_) => TypeTag::String,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
            TypeTag::Boolean => "boolean",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How raw strings are reinterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoerceMode {
    /// Emit raw strings as-is (unless a global type is set).
    Off,
    /// Coerce using declared types, or the type of a substituted default.
    #[default]
    Explicit,
    /// Infer a type from the raw string's shape when none was declared.
    Auto,
}

impl<'de> Deserialize<'de> for CoerceMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Level(u8),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(false) | Repr::Level(0) => Ok(CoerceMode::Off),
            Repr::Flag(true) | Repr::Level(1) => Ok(CoerceMode::Explicit),
            Repr::Level(2) => Ok(CoerceMode::Auto),
            Repr::Level(n) => Err(serde::de::Error::custom(format!(
                "invalid coerce level {n}, expected 0, 1 or 2"
            ))),
            Repr::Name(name) => match name.to_ascii_lowercase().as_str() {
                "off" | "none" => Ok(CoerceMode::Off),
                "explicit" => Ok(CoerceMode::Explicit),
                "auto" => Ok(CoerceMode::Auto),
                other => Err(serde::de::Error::custom(format!(
                    "invalid coerce mode '{other}', expected off, explicit or auto"
                ))),
            },
        }
    }
}

/// What happens when a field fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Swallow the failure and recover.
    #[default]
    Silent,
    /// Recover, but emit a diagnostic block first.
    Log,
    /// Abort the whole call with the failure.
    Throw,
}

impl<'de> Deserialize<'de> for Verbosity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Level(u8),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Level(0) => Ok(Verbosity::Silent),
            Repr::Level(1) => Ok(Verbosity::Log),
            Repr::Level(2) => Ok(Verbosity::Throw),
            Repr::Level(n) => Err(serde::de::Error::custom(format!(
                "invalid verbose level {n}, expected 0, 1 or 2"
            ))),
            Repr::Name(name) => match name.to_ascii_lowercase().as_str() {
                "silent" | "disabled" => Ok(Verbosity::Silent),
                "log" | "enabled" => Ok(Verbosity::Log),
                "throw" => Ok(Verbosity::Throw),
                other => Err(serde::de::Error::custom(format!(
                    "invalid verbosity '{other}', expected silent, log or throw"
                ))),
            },
        }
    }
}
