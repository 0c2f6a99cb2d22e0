//! Caller options and the immutable per-call settings derived from them.

use serde::Deserialize;

use crate::error::EnvcastError;
use crate::types::{CoerceMode, TypeTag, Verbosity};

/// Resolver options. Every field is optional; see [`Settings::resolve`] for
/// the defaults applied to missing ones.
///
/// Deserializable so hosts can keep options in a config document:
///
/// ```toml
/// type = "number"
/// prefix = "APP_"
/// coerce = 2
/// verbose = "log"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Global type tag forcing the coercion branch for every field.
    #[serde(rename = "type")]
    pub global_type: Option<String>,
    /// Prepended to every declared key before lookup.
    pub prefix: Option<String>,
    pub coerce: Option<CoerceMode>,
    pub verbose: Option<Verbosity>,
    /// Whether an env loader may replace variables that are already set.
    /// Carried for loaders; resolution never reads it.
    #[serde(rename = "override")]
    pub override_existing: Option<bool>,
}

impl Options {
    pub fn from_toml_str(content: &str) -> Result<Self, EnvcastError> {
        toml::from_str(content).map_err(|e| EnvcastError::ParseError {
            format: "TOML",
            reason: e.to_string(),
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, EnvcastError> {
        serde_json::from_str(content).map_err(|e| EnvcastError::ParseError {
            format: "JSON",
            reason: e.to_string(),
        })
    }
}

/// Settings for one resolution call. Built once, never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// The global type, if it selects a non-string branch.
    pub global_type: Option<TypeTag>,
    pub prefix: Option<String>,
    pub coerce: CoerceMode,
    pub verbosity: Verbosity,
}

impl Settings {
    /// Merge `options` with the defaults: explicit coercion, silent
    /// verbosity, no prefix, no global type.
    ///
    /// A global type that names a string (or nothing recognizable) never
    /// forces a branch, so it resolves to `None`. An empty prefix is no
    /// prefix.
    pub fn resolve(options: &Options) -> Settings {
        let global_type = options
            .global_type
            .as_deref()
            .map(TypeTag::from_tag)
            .filter(|tag| *tag != TypeTag::String);

        let settings = Settings {
            global_type,
            prefix: options.prefix.clone().filter(|p| !p.is_empty()),
            coerce: options.coerce.unwrap_or_default(),
            verbosity: options.verbose.unwrap_or_default(),
        };
        tracing::debug!(?settings, "resolved settings");
        settings
    }

    /// Settings for prefix-scan mode: the scan term replaces any configured
    /// prefix.
    pub fn with_scan_term(mut self, term: &str) -> Settings {
        self.prefix = Some(term.to_string()).filter(|p| !p.is_empty());
        self
    }

    /// True when values bypass the coercion engine entirely.
    pub fn passes_raw(&self) -> bool {
        self.coerce == CoerceMode::Off && self.global_type.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_take_defaults() {
        let settings = Settings::resolve(&Options::default());
        assert_eq!(settings.global_type, None);
        assert_eq!(settings.prefix, None);
        assert_eq!(settings.coerce, CoerceMode::Explicit);
        assert_eq!(settings.verbosity, Verbosity::Silent);
    }

    #[test]
    fn global_type_is_prefix_matched() {
        let options = Options {
            global_type: Some("Num".into()),
            ..Options::default()
        };
        assert_eq!(
            Settings::resolve(&options).global_type,
            Some(TypeTag::Number)
        );
    }

    #[test]
    fn string_global_type_forces_nothing() {
        let options = Options {
            global_type: Some("string".into()),
            ..Options::default()
        };
        assert_eq!(Settings::resolve(&options).global_type, None);
    }

    #[test]
    fn empty_prefix_is_no_prefix() {
        let options = Options {
            prefix: Some(String::new()),
            ..Options::default()
        };
        assert_eq!(Settings::resolve(&options).prefix, None);
    }

    #[test]
    fn scan_term_replaces_prefix() {
        let options = Options {
            prefix: Some("APP_".into()),
            ..Options::default()
        };
        let settings = Settings::resolve(&options).with_scan_term("FOO_");
        assert_eq!(settings.prefix.as_deref(), Some("FOO_"));
    }

    #[test]
    fn passes_raw_only_without_global_type() {
        let off = Options {
            coerce: Some(CoerceMode::Off),
            ..Options::default()
        };
        assert!(Settings::resolve(&off).passes_raw());

        let forced = Options {
            global_type: Some("boolean".into()),
            ..off
        };
        assert!(!Settings::resolve(&forced).passes_raw());
    }

    #[test]
    fn options_from_toml() {
        let options = Options::from_toml_str(
            r#"
type = "number"
prefix = "APP_"
coerce = 2
verbose = "log"
override = false
"#,
        )
        .unwrap();
        assert_eq!(options.global_type.as_deref(), Some("number"));
        assert_eq!(options.prefix.as_deref(), Some("APP_"));
        assert_eq!(options.coerce, Some(CoerceMode::Auto));
        assert_eq!(options.verbose, Some(Verbosity::Log));
        assert_eq!(options.override_existing, Some(false));
    }

    #[test]
    fn options_from_json_with_legacy_flag() {
        let options = Options::from_json_str(r#"{"coerce": false, "verbose": 2}"#).unwrap();
        assert_eq!(options.coerce, Some(CoerceMode::Off));
        assert_eq!(options.verbose, Some(Verbosity::Throw));
    }

    #[test]
    fn options_reject_unknown_fields() {
        let err = Options::from_toml_str("colour = \"red\"\n").unwrap_err();
        assert!(matches!(err, EnvcastError::ParseError { format: "TOML", .. }));
    }
}
