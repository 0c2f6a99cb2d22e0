//! Field declarations: which environment key feeds which output field.
//!
//! A declaration is either a bare source key or a described entry with an
//! optional type tag and default. In TOML:
//!
//! ```toml
//! host = "HOST"
//!
//! [port]
//! key = "PORT"
//! type = "number"
//! default = 8080
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::EnvcastError;

/// How one output field is sourced.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldDecl {
    /// Read this environment key as-is.
    Direct(String),
    /// Read `key`, coercing to `type` and falling back to `default`.
    Described {
        key: Option<String>,
        #[serde(rename = "type")]
        type_tag: Option<String>,
        default: Option<Value>,
    },
}

impl FieldDecl {
    pub fn direct(key: &str) -> Self {
        FieldDecl::Direct(key.to_string())
    }

    /// A described declaration with no type and no default yet.
    pub fn described(key: &str) -> Self {
        FieldDecl::Described {
            key: Some(key.to_string()),
            type_tag: None,
            default: None,
        }
    }

    /// Set the declared type tag. A direct declaration becomes described.
    pub fn with_type(self, tag: &str) -> Self {
        match self.into_described() {
            FieldDecl::Described { key, default, .. } => FieldDecl::Described {
                key,
                type_tag: Some(tag.to_string()),
                default,
            },
            direct => direct,
        }
    }

    /// Set the default used when the key is absent from the environment.
    pub fn with_default<V: Into<Value>>(self, value: V) -> Self {
        match self.into_described() {
            FieldDecl::Described { key, type_tag, .. } => FieldDecl::Described {
                key,
                type_tag,
                default: Some(value.into()),
            },
            direct => direct,
        }
    }

    fn into_described(self) -> Self {
        match self {
            FieldDecl::Direct(key) => FieldDecl::Described {
                key: Some(key),
                type_tag: None,
                default: None,
            },
            described => described,
        }
    }

    /// The source key, if one was declared. Empty keys count as missing.
    pub fn key(&self) -> Option<&str> {
        let key = match self {
            FieldDecl::Direct(key) => Some(key.as_str()),
            FieldDecl::Described { key, .. } => key.as_deref(),
        };
        key.filter(|k| !k.is_empty())
    }

    pub fn type_tag(&self) -> Option<&str> {
        match self {
            FieldDecl::Direct(_) => None,
            FieldDecl::Described { type_tag, .. } => type_tag.as_deref(),
        }
    }

    pub fn default_value(&self) -> Option<&Value> {
        match self {
            FieldDecl::Direct(_) => None,
            FieldDecl::Described { default, .. } => default.as_ref(),
        }
    }
}

impl From<&str> for FieldDecl {
    fn from(key: &str) -> Self {
        FieldDecl::direct(key)
    }
}

impl From<String> for FieldDecl {
    fn from(key: String) -> Self {
        FieldDecl::Direct(key)
    }
}

/// An ordered set of declarations keyed by output field.
///
/// Inserting a field that already exists replaces its declaration in place,
/// so the last declaration for a field wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declarations {
    fields: Vec<(String, FieldDecl)>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, decl: impl Into<FieldDecl>) {
        let decl = decl.into();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => *existing = decl,
            None => self.fields.push((field.to_string(), decl)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn field(mut self, field: &str, decl: impl Into<FieldDecl>) -> Self {
        self.insert(field, decl);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldDecl> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, decl)| decl)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDecl)> {
        self.fields.iter().map(|(name, decl)| (name.as_str(), decl))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a TOML document whose top-level keys are output fields.
    pub fn from_toml_str(content: &str) -> Result<Self, EnvcastError> {
        let table: BTreeMap<String, FieldDecl> =
            toml::from_str(content).map_err(|e| EnvcastError::ParseError {
                format: "TOML",
                reason: e.to_string(),
            })?;
        Ok(table.into_iter().collect())
    }

    /// Parse a JSON object whose keys are output fields.
    pub fn from_json_str(content: &str) -> Result<Self, EnvcastError> {
        let table: BTreeMap<String, FieldDecl> =
            serde_json::from_str(content).map_err(|e| EnvcastError::ParseError {
                format: "JSON",
                reason: e.to_string(),
            })?;
        Ok(table.into_iter().collect())
    }

    /// Read declarations from a file. `.json` files are parsed as JSON,
    /// anything else as TOML.
    pub fn from_path(path: &Path) -> Result<Self, EnvcastError> {
        let content = std::fs::read_to_string(path).map_err(|e| EnvcastError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }
}

impl<K: AsRef<str>, D: Into<FieldDecl>> FromIterator<(K, D)> for Declarations {
    fn from_iter<I: IntoIterator<Item = (K, D)>>(iter: I) -> Self {
        let mut decls = Declarations::new();
        for (field, decl) in iter {
            decls.insert(field.as_ref(), decl);
        }
        decls
    }
}
