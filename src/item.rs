//! Key resolution and default substitution.
//!
//! Turns a declaration (or a prefix-scan match) into a [`ResolutionItem`]:
//! the full lookup key, a raw value that is always present, and the type
//! the coercion engine should aim for.

use serde_json::Value;

use crate::declare::FieldDecl;
use crate::env::{self, EnvMap, ScanMatch};
use crate::error::EnvcastError;
use crate::policy::Policy;
use crate::settings::Settings;
use crate::types::TypeTag;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionItem {
    /// Output field name.
    pub field: String,
    /// The environment key that was looked up.
    pub key: String,
    /// The environment string, or the substituted default.
    pub raw: Value,
    /// True when `raw` came from the declaration's default.
    pub from_default: bool,
    /// The explicitly declared type. Unknown tags are recorded as string.
    pub declared: Option<TypeTag>,
    /// Declared type, else the default's shape, else string.
    pub effective: TypeTag,
}

/// Resolve one declaration against the environment.
///
/// `Ok(None)` means the field failed in a recoverable way and stays unset.
pub fn resolve_field(
    field: &str,
    decl: &FieldDecl,
    env: &EnvMap,
    settings: &Settings,
    policy: &mut Policy,
) -> Result<Option<ResolutionItem>, EnvcastError> {
    tracing::debug!(field, ?decl, "parsing declaration");

    let Some(key) = decl.key() else {
        policy.report(EnvcastError::MissingKeyDeclaration {
            field: field.to_string(),
        })?;
        return Ok(None);
    };
    let full_key = env::full_key(settings.prefix.as_deref(), key);

    let declared = match decl.type_tag() {
        Some(tag) => match TypeTag::recognize(tag) {
            Some(recognized) => Some(recognized),
            None => {
                policy.report(EnvcastError::UnknownType {
                    field: field.to_string(),
                    tag: tag.to_string(),
                })?;
                Some(TypeTag::String)
            }
        },
        None => None,
    };

    let default = decl.default_value();
    if let (Some(default), Some(tag)) = (default, decl.type_tag())
        && let Some(declared) = TypeTag::recognize(tag)
    {
        let shape = TypeTag::of_value(default);
        if shape != declared {
            tracing::debug!(field, %shape, %declared, "default/type mismatch");
            policy.report(EnvcastError::DefaultTypeMismatch {
                key: full_key.clone(),
                default: display_raw(default),
                default_type: shape.to_string(),
                declared: declared.to_string(),
            })?;
        }
    }

    let effective = declared
        .or_else(|| default.map(TypeTag::of_value))
        .unwrap_or_default();

    let item = match (env.get(&full_key), default) {
        (Some(raw), _) => ResolutionItem {
            field: field.to_string(),
            key: full_key,
            raw: Value::String(raw.clone()),
            from_default: false,
            declared,
            effective,
        },
        (None, Some(default)) => {
            tracing::debug!(field, key = %full_key, "no value found, using default");
            ResolutionItem {
                field: field.to_string(),
                key: full_key,
                raw: default.clone(),
                from_default: true,
                declared,
                effective,
            }
        }
        (None, None) => {
            policy.report(EnvcastError::NoValueFound {
                field: field.to_string(),
                key: full_key,
                prefix: settings.prefix.clone(),
            })?;
            return Ok(None);
        }
    };
    Ok(Some(item))
}

/// An item for a prefix-scan match. Scan items never carry defaults.
pub fn scanned(found: ScanMatch<'_>) -> ResolutionItem {
    tracing::debug!(key = found.key, field = found.field, "parsing scanned variable");
    ResolutionItem {
        field: found.field.to_string(),
        key: found.key.to_string(),
        raw: Value::String(found.value.to_string()),
        from_default: false,
        declared: None,
        effective: TypeTag::String,
    }
}

/// Render a value for messages: strings without quotes, everything else as
/// JSON.
pub fn display_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::env;
    use crate::settings::Options;
    use crate::types::Verbosity;
    use serde_json::json;

    fn settings(prefix: Option<&str>) -> Settings {
        Settings::resolve(&Options {
            prefix: prefix.map(str::to_string),
            ..Options::default()
        })
    }

    fn resolve(decl: &FieldDecl, env: &EnvMap, prefix: Option<&str>) -> Option<ResolutionItem> {
        let mut policy = Policy::new(Verbosity::Silent);
        resolve_field("field", decl, env, &settings(prefix), &mut policy).unwrap()
    }

    #[test]
    fn direct_lookup() {
        let env = env(&[("HOST", "localhost")]);
        let item = resolve(&FieldDecl::direct("HOST"), &env, None).unwrap();
        assert_eq!(item.key, "HOST");
        assert_eq!(item.raw, json!("localhost"));
        assert_eq!(item.effective, TypeTag::String);
        assert!(!item.from_default);
    }

    #[test]
    fn prefix_applied_to_lookup() {
        let env = env(&[("APP_PORT", "80"), ("PORT", "1")]);
        let item = resolve(&FieldDecl::direct("PORT"), &env, Some("APP_")).unwrap();
        assert_eq!(item.key, "APP_PORT");
        assert_eq!(item.raw, json!("80"));
    }

    #[test]
    fn already_prefixed_key_kept() {
        let env = env(&[("APP_PORT", "80")]);
        let item = resolve(&FieldDecl::direct("APP_PORT"), &env, Some("APP_")).unwrap();
        assert_eq!(item.key, "APP_PORT");
    }

    #[test]
    fn declared_type_used_for_env_value() {
        let env = env(&[("PORT", "80")]);
        let decl = FieldDecl::described("PORT").with_type("int");
        let item = resolve(&decl, &env, None).unwrap();
        assert_eq!(item.declared, Some(TypeTag::Number));
        assert_eq!(item.effective, TypeTag::Number);
    }

    #[test]
    fn default_substituted_with_its_shape() {
        let decl = FieldDecl::described("MISSING").with_default(1234);
        let item = resolve(&decl, &EnvMap::new(), None).unwrap();
        assert_eq!(item.raw, json!(1234));
        assert!(item.from_default);
        assert_eq!(item.declared, None);
        assert_eq!(item.effective, TypeTag::Number);
    }

    #[test]
    fn declared_type_beats_default_shape() {
        let decl = FieldDecl::described("MISSING")
            .with_type("number")
            .with_default("123");
        let item = resolve(&decl, &EnvMap::new(), None).unwrap();
        assert_eq!(item.raw, json!("123"));
        assert_eq!(item.effective, TypeTag::Number);
    }

    #[test]
    fn env_value_beats_default() {
        let env = env(&[("PORT", "80")]);
        let decl = FieldDecl::described("PORT").with_default(8080);
        let item = resolve(&decl, &env, None).unwrap();
        assert_eq!(item.raw, json!("80"));
        assert!(!item.from_default);
        assert_eq!(item.declared, None);
        assert_eq!(item.effective, TypeTag::Number);
    }

    #[test]
    fn default_shape_types_env_value() {
        let env = env(&[("DEBUG", "1")]);
        let decl = FieldDecl::described("DEBUG").with_default(false);
        let item = resolve(&decl, &env, None).unwrap();
        assert_eq!(item.effective, TypeTag::Boolean);
    }

    #[test]
    fn no_type_and_no_default_is_string() {
        let env = env(&[("HOST", "h")]);
        let item = resolve(&FieldDecl::described("HOST"), &env, None).unwrap();
        assert_eq!(item.effective, TypeTag::String);
    }

    #[test]
    fn unknown_type_treated_as_string() {
        let env = env(&[("RATE", "1.5")]);
        let decl = FieldDecl::described("RATE").with_type("float");
        let item = resolve(&decl, &env, None).unwrap();
        assert_eq!(item.declared, Some(TypeTag::String));
        assert_eq!(item.effective, TypeTag::String);
    }

    #[test]
    fn missing_value_and_default_leaves_field_unset() {
        assert!(resolve(&FieldDecl::direct("NOPE"), &EnvMap::new(), None).is_none());
    }

    #[test]
    fn missing_value_throws_with_prefix() {
        let mut policy = Policy::new(Verbosity::Throw);
        let err = resolve_field(
            "port",
            &FieldDecl::direct("PORT"),
            &EnvMap::new(),
            &settings(Some("APP_")),
            &mut policy,
        )
        .unwrap_err();
        match err {
            EnvcastError::NoValueFound { field, key, prefix } => {
                assert_eq!(field, "port");
                assert_eq!(key, "APP_PORT");
                assert_eq!(prefix.as_deref(), Some("APP_"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_key_reported() {
        let decl = FieldDecl::Described {
            key: None,
            type_tag: Some("number".into()),
            default: Some(json!(1)),
        };
        let mut policy = Policy::new(Verbosity::Throw);
        let err = resolve_field("a", &decl, &EnvMap::new(), &settings(None), &mut policy)
            .unwrap_err();
        assert!(matches!(err, EnvcastError::MissingKeyDeclaration { .. }));
    }

    #[test]
    fn mismatch_reported_before_lookup() {
        let env = env(&[("EMPTY_KEY", "5")]);
        let decl = FieldDecl::described("EMPTY_KEY")
            .with_type("number")
            .with_default("123");
        let mut policy = Policy::new(Verbosity::Throw);
        let err = resolve_field("a", &decl, &env, &settings(None), &mut policy).unwrap_err();
        assert!(matches!(err, EnvcastError::DefaultTypeMismatch { .. }));
    }

    #[test]
    fn matching_default_is_not_a_mismatch() {
        let decl = FieldDecl::described("K").with_type("boolean").with_default(true);
        let mut policy = Policy::new(Verbosity::Throw);
        let item = resolve_field("a", &decl, &EnvMap::new(), &settings(None), &mut policy)
            .unwrap()
            .unwrap();
        assert_eq!(item.raw, json!(true));
    }

    #[test]
    fn mismatch_logged_and_recovered() {
        let decl = FieldDecl::described("K").with_type("array").with_default(3);
        let mut policy = Policy::new(Verbosity::Log);
        let item = resolve_field("a", &decl, &EnvMap::new(), &settings(None), &mut policy)
            .unwrap()
            .unwrap();
        assert_eq!(item.effective, TypeTag::Array);
        assert_eq!(policy.into_diagnostics().len(), 1);
    }

    #[test]
    fn scanned_items_are_strings() {
        let env = env(&[("FOO_A", "1")]);
        let found = crate::env::scan_prefix(&env, "FOO_").next().unwrap();
        let item = scanned(found);
        assert_eq!(item.field, "A");
        assert_eq!(item.key, "FOO_A");
        assert_eq!(item.raw, json!("1"));
        assert_eq!(item.effective, TypeTag::String);
    }
}
