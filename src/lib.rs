//! Resolve environment variables into typed, application-shaped values.
//!
//! Declare which variable feeds each output field, optionally with a type
//! and a default, and envcast looks the values up, fills in defaults, and
//! coerces each one to a string, number, boolean, array, or object.
//!
//! ```ignore
//! let resolved = Envcast::builder()
//!     .prefix("APP_")
//!     .field("host", "HOST")
//!     .field("port", FieldDecl::described("PORT").with_type("number").with_default(8080))
//!     .resolve()?;
//! ```
//!
//! That call reads `APP_HOST` and `APP_PORT`, falls back to `8080` when
//! `APP_PORT` is unset, and returns `{ host: "...", port: 8080 }`.
//!
//! # Scope
//!
//! envcast works on a flat map of variables that is already populated. It
//! does not read `.env` files, pick files by environment name, or write to
//! the environment; pair it with a loader for that. Each call is a pure
//! read-then-compute pass over a snapshot, with no state kept between calls.
//!
//! # Three ways to ask
//!
//! - **Declared fields**: [`field()`](EnvcastBuilder::field) or
//!   [`declarations()`](EnvcastBuilder::declarations). Each field is either
//!   a bare key ([`FieldDecl::Direct`]) or a key with an optional type tag
//!   and default ([`FieldDecl::Described`]). Declarations can also be read
//!   from TOML or JSON with [`Declarations::from_path`].
//! - **Prefix scan**: [`scan("FOO_")`](EnvcastBuilder::scan) returns every
//!   variable starting with `FOO_`, with the prefix stripped from the key.
//! - **Everything**: with no declarations and no options, the environment
//!   comes back verbatim. With options but no declarations, every variable
//!   goes through coercion under those options.
//!
//! # Key lookup
//!
//! With prefix `APP_`, a declared key `PORT` is looked up as `APP_PORT`. A
//! key that already starts with the prefix is used as written.
//!
//! When the variable is missing, the declared default is used. If no type
//! was declared, the default's own shape becomes the type, and a default
//! that is already typed (a number, a boolean, an array) is emitted as is.
//! A missing variable without a default is a failure (see below).
//!
//! # Coercion
//!
//! Type tags match by first letter, ignoring case: `n`/`i` number, `o`
//! object, `a` array, `b` boolean, anything else string. So `"int"`,
//! `"Number"`, and `"n"` all mean number.
//!
//! | Type | Raw | Result |
//! |------|-----|--------|
//! | number | `1_000,000.5` | `1000000.5` |
//! | array | `a, b ,c` | `["a", "b", "c"]` |
//! | object | `{myKey:"a value"}` | `{"myKey": "a value"}` |
//! | boolean | `TRUE`, `1`, `2.5` | `true` |
//! | boolean | `false`, `0`, `""` | `false` |
//!
//! [`CoerceMode`] decides when coercion happens:
//!
//! - **`Off`**: raw strings are emitted untouched.
//! - **`Explicit`** (default): declared types and default shapes are used.
//! - **`Auto`**: fields without a declared type get one inferred from the
//!   raw string: numeric characters become numbers, `"{...}"` becomes an
//!   object, two or more commas become an array, `true`/`false` become
//!   booleans.
//!
//! A global type ([`global_type()`](EnvcastBuilder::global_type)) forces its
//! branch for every field, even with coercion off. It never rewrites a
//! default that is already typed.
//!
//! # Failures and verbosity
//!
//! Field-level failures ([`EnvcastError::MissingKeyDeclaration`],
//! [`UnknownType`](EnvcastError::UnknownType),
//! [`DefaultTypeMismatch`](EnvcastError::DefaultTypeMismatch),
//! [`NoValueFound`](EnvcastError::NoValueFound),
//! [`StructuredParseFailure`](EnvcastError::StructuredParseFailure),
//! [`InvalidNumber`](EnvcastError::InvalidNumber)) are handled according to
//! [`Verbosity`]:
//!
//! - **`Silent`** (default): recover and continue. A missing value leaves the
//!   field out; an unparseable object or number keeps the raw string.
//! - **`Log`**: recover the same way, but emit a framed diagnostic block as a
//!   `tracing` warning and keep the message on
//!   [`Resolved::diagnostics`].
//! - **`Throw`**: the first failure ends the call and is returned as the
//!   error. No partial result is produced.
//!
//! # Logging
//!
//! Every stage emits `tracing` debug events. envcast never installs a
//! subscriber.

pub mod error;
pub mod types;

mod builder;
mod coerce;
mod declare;
mod env;
mod item;
mod policy;
mod resolve;
mod resolved;
mod settings;

#[cfg(test)]
mod fixtures;

pub use builder::{Envcast, EnvcastBuilder};
pub use coerce::infer_type;
pub use declare::{Declarations, FieldDecl};
pub use env::{EnvMap, process_env};
pub use error::EnvcastError;
pub use resolve::{Request, ResolveInput, resolve};
pub use resolved::Resolved;
pub use settings::{Options, Settings};
pub use types::{CoerceMode, TypeTag, Verbosity};
