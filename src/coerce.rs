//! The type coercion engine.
//!
//! Branch selection, in order:
//!
//! 1. Coercion off and no global type: the raw value is emitted untouched.
//! 2. The global type, when it names a non-string type.
//! 3. In auto mode, for env strings without a declared type, the type
//!    inferred from the string's shape ([`infer_type`]).
//! 4. The item's effective type.
//!
//! Values that are already typed (substituted defaults that are not
//! strings) pass through every branch unchanged.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use crate::error::EnvcastError;
use crate::item::ResolutionItem;
use crate::policy::Policy;
use crate::settings::Settings;
use crate::types::{CoerceMode, TypeTag};

static NUMBER_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9,._]+$").expect("number shape pattern"));

/// A bare key followed by a colon, plus the first character of its value.
static BARE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([^",{}\s]+?)\s*:\s*(.,*)"#).expect("bare key pattern"));

/// The leading numeric part of a string, the way a lenient float parser
/// reads it: `"2.5kg"` → `2.5`, `"1e3 "` → `1000`.
static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("leading float pattern")
});

/// Coerce one item into its output value.
///
/// Recoverable failures go through `policy` and fall back to the raw
/// string; under `Throw` they end the call.
pub fn coerce_item(
    item: &ResolutionItem,
    settings: &Settings,
    policy: &mut Policy,
) -> Result<Value, EnvcastError> {
    if settings.passes_raw() {
        tracing::debug!(field = %item.field, "coercion disabled, setting raw value");
        return Ok(item.raw.clone());
    }

    let Value::String(raw) = &item.raw else {
        tracing::debug!(field = %item.field, "typed default, passing through");
        return Ok(item.raw.clone());
    };

    let mut effective = item.effective;
    let inferred = settings.coerce == CoerceMode::Auto
        && item.declared.is_none()
        && !item.from_default
        && settings.global_type.is_none();
    if inferred {
        effective = infer_type(raw);
        tracing::debug!(field = %item.field, %effective, "auto-detected type");
    }
    let branch = settings.global_type.unwrap_or(effective);
    if branch != TypeTag::String {
        tracing::debug!(field = %item.field, raw = %raw, to = %branch, "coercing");
    }

    let value = match branch {
        TypeTag::Number => match coerce_number(raw) {
            Some(number) => number,
            None if inferred => {
                tracing::debug!(field = %item.field, raw = %raw, "not numeric, keeping string");
                Value::String(raw.clone())
            }
            None => {
                policy.report(EnvcastError::InvalidNumber {
                    field: item.field.clone(),
                    key: item.key.clone(),
                    raw: raw.clone(),
                })?;
                Value::String(raw.clone())
            }
        },
        TypeTag::Object => match coerce_object(raw) {
            Ok(object) => object,
            Err(source) => {
                policy.report(EnvcastError::StructuredParseFailure {
                    field: item.field.clone(),
                    key: item.key.clone(),
                    source,
                })?;
                Value::String(raw.clone())
            }
        },
        TypeTag::Array => coerce_array(raw),
        TypeTag::Boolean => Value::Bool(coerce_boolean(raw)),
        TypeTag::String => Value::String(raw.clone()),
    };
    Ok(value)
}

/// Guess a type from the shape of a raw string.
///
/// Checked in order: numeric characters with at most one period, a quoted
/// `"{...}"` object, more than one comma (unless it looks like an object),
/// `true`/`false`, else string.
pub fn infer_type(raw: &str) -> TypeTag {
    let looks_quoted_object = raw.starts_with("\"{") || raw.starts_with("{\"");
    if NUMBER_SHAPE.is_match(raw) && raw.matches('.').count() <= 1 {
        TypeTag::Number
    } else if raw.starts_with("\"{") && raw.ends_with("}\"") {
        TypeTag::Object
    } else if !looks_quoted_object && raw.matches(',').count() > 1 {
        TypeTag::Array
    } else if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("false") {
        TypeTag::Boolean
    } else {
        TypeTag::String
    }
}

/// Parse a number, ignoring `_` and `,` separators.
///
/// With a period the value is a float. Otherwise the leading numeric part is
/// read as an integer (`"12px"` → `12`), or as a float when it has an
/// exponent or overflows `i64`. `None` when no numeric value can be read.
pub fn coerce_number(raw: &str) -> Option<Value> {
    let cleaned: String = raw.chars().filter(|c| *c != '_' && *c != ',').collect();
    if cleaned.contains('.') {
        return leading_float(&cleaned).and_then(float_value);
    }
    let leading = LEADING_FLOAT.find(cleaned.trim_start())?.as_str();
    match leading.trim_start_matches('+').parse::<i64>() {
        Ok(int) => Some(Value::from(int)),
        Err(_) => leading.parse().ok().and_then(float_value),
    }
}

/// Parse structured data. Bare keys are quoted first (`{port:80}` →
/// `{"port":80}`); if that fails the string is parsed as written.
pub fn coerce_object(raw: &str) -> Result<Value, serde_json::Error> {
    let quoted = quote_bare_keys(raw);
    serde_json::from_str(&quoted).or_else(|_| serde_json::from_str(raw))
}

/// Split on commas and trim each element.
pub fn coerce_array(raw: &str) -> Value {
    Value::Array(
        raw.split(',')
            .map(|part| Value::String(part.trim().to_string()))
            .collect(),
    )
}

/// True for `true` (any case) or anything whose leading number is above
/// zero; false otherwise, including the empty string.
pub fn coerce_boolean(raw: &str) -> bool {
    let value = raw.trim().to_lowercase();
    value == "true" || leading_float(&value).is_some_and(|f| f > 0.0)
}

fn quote_bare_keys(input: &str) -> String {
    BARE_KEY.replace_all(input, "\"${1}\":${2}").into_owned()
}

fn leading_float(s: &str) -> Option<f64> {
    let m = LEADING_FLOAT.find(s.trim_start())?;
    m.as_str().parse().ok()
}

fn float_value(f: f64) -> Option<Value> {
    Number::from_f64(f).map(Value::Number)
}
