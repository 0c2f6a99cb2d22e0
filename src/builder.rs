use serde::de::DeserializeOwned;

use crate::declare::{Declarations, FieldDecl};
use crate::env::{self, EnvMap};
use crate::error::EnvcastError;
use crate::resolve::{self, Request, ResolveInput};
use crate::resolved::Resolved;
use crate::settings::Options;
use crate::types::{CoerceMode, Verbosity};

/// Entry point for building a resolution.
pub struct Envcast;

impl Envcast {
    pub fn builder() -> EnvcastBuilder {
        EnvcastBuilder::new()
    }

    /// Every process variable starting with `prefix`, prefix stripped.
    pub fn scan(prefix: &str) -> Result<Resolved, EnvcastError> {
        Self::builder().scan(prefix).resolve()
    }
}

/// Builder for one resolution call.
///
/// Three things are composed:
///
/// - **What to resolve**: [`field()`](Self::field) / [`declarations()`](Self::declarations)
///   for declared fields, or [`scan()`](Self::scan) for a prefix scan. With
///   neither, every variable is returned.
/// - **How**: [`options()`](Self::options) or the individual setters
///   ([`prefix()`](Self::prefix), [`global_type()`](Self::global_type),
///   [`coerce()`](Self::coerce), [`verbosity()`](Self::verbosity)).
/// - **From where**: the process environment, unless
///   [`env_vars()`](Self::env_vars) supplies a snapshot.
pub struct EnvcastBuilder {
    options: Option<Options>,
    request: Request,
    env_vars: Option<EnvMap>,
}

impl EnvcastBuilder {
    fn new() -> Self {
        Self {
            options: None,
            request: Request::Everything,
            env_vars: None,
        }
    }

    /// Replace all options at once.
    pub fn options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    fn options_mut(&mut self) -> &mut Options {
        self.options.get_or_insert_with(Options::default)
    }

    /// Prefix prepended to every declared key.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.options_mut().prefix = Some(prefix.to_string());
        self
    }

    /// Type tag forcing the coercion branch for every field.
    pub fn global_type(mut self, tag: &str) -> Self {
        self.options_mut().global_type = Some(tag.to_string());
        self
    }

    pub fn coerce(mut self, mode: CoerceMode) -> Self {
        self.options_mut().coerce = Some(mode);
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.options_mut().verbose = Some(verbosity);
        self
    }

    /// Declare one output field. Replaces a prefix scan if one was set.
    pub fn field(mut self, name: &str, decl: impl Into<FieldDecl>) -> Self {
        match &mut self.request {
            Request::Fields(decls) => decls.insert(name, decl),
            other => *other = Request::Fields(Declarations::new().field(name, decl)),
        }
        self
    }

    /// Declare many fields. Fields already declared with the same name are
    /// replaced.
    pub fn declarations(mut self, declarations: Declarations) -> Self {
        match &mut self.request {
            Request::Fields(decls) => {
                for (name, decl) in declarations.iter() {
                    decls.insert(name, decl.clone());
                }
            }
            other => *other = Request::Fields(declarations),
        }
        self
    }

    /// Resolve every variable starting with `prefix` instead of declared
    /// fields. Any declarations made so far are dropped.
    pub fn scan(mut self, prefix: &str) -> Self {
        self.request = Request::Scan(prefix.to_string());
        self
    }

    /// Use these variables instead of the process environment.
    pub fn env_vars(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env_vars = Some(vars.into_iter().collect());
        self
    }

    fn build_input(self) -> ResolveInput {
        let env = self.env_vars.unwrap_or_else(env::process_env);
        ResolveInput {
            env,
            request: self.request,
            options: self.options,
        }
    }

    pub fn resolve(self) -> Result<Resolved, EnvcastError> {
        resolve::resolve(self.build_input())
    }

    /// Resolve and deserialize into an application type.
    pub fn resolve_into<T: DeserializeOwned>(self) -> Result<T, EnvcastError> {
        self.resolve()?.deserialize_into()
    }
}
