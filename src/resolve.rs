//! Core resolution pipeline: turn an environment snapshot into resolved
//! values.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. No request and no options: return the environment verbatim
//! 2. Derive `Settings` from the options
//! 3. Build one resolution item per declaration (or per scan match)
//! 4. Coerce each item and assign it to the output record
//!
//! Field failures go through the verbosity policy; under `Throw` the first
//! one aborts the call and nothing is returned.

use crate::coerce;
use crate::declare::Declarations;
use crate::env::{self, EnvMap};
use crate::error::EnvcastError;
use crate::item::{self, ResolutionItem};
use crate::policy::Policy;
use crate::resolved::Resolved;
use crate::settings::{Options, Settings};

/// What the caller asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Request {
    /// No declarations: every variable.
    #[default]
    Everything,
    /// Every variable whose key starts with the term, term stripped.
    Scan(String),
    /// One output field per declaration.
    Fields(Declarations),
}

/// All pre-loaded data needed for one resolution. No I/O happens here.
#[derive(Debug, Clone, Default)]
pub struct ResolveInput {
    /// The environment snapshot (pass `env::process_env()` or synthetic data).
    pub env: EnvMap,
    pub request: Request,
    /// `None` when the caller gave no options at all.
    pub options: Option<Options>,
}

pub fn resolve(input: ResolveInput) -> Result<Resolved, EnvcastError> {
    tracing::debug!(request = ?input.request, options = ?input.options, "resolve start");

    let ResolveInput {
        env,
        request,
        options,
    } = input;

    let Some(options) = options else {
        if request == Request::Everything {
            tracing::debug!(vars = env.len(), "nothing declared, returning environment");
            return Ok(Resolved::verbatim(env));
        }
        return run(&env, request, Settings::resolve(&Options::default()));
    };
    run(&env, request, Settings::resolve(&options))
}

fn run(env: &EnvMap, request: Request, settings: Settings) -> Result<Resolved, EnvcastError> {
    let mut policy = Policy::new(settings.verbosity);
    let mut resolved = Resolved::default();

    match request {
        Request::Everything => scan(env, "", settings, &mut policy, &mut resolved)?,
        Request::Scan(term) => scan(env, &term, settings, &mut policy, &mut resolved)?,
        Request::Fields(decls) => {
            for (field, decl) in decls.iter() {
                let found = item::resolve_field(field, decl, env, &settings, &mut policy)?;
                if let Some(item) = found {
                    assign(item, &settings, &mut policy, &mut resolved)?;
                }
            }
        }
    }

    tracing::debug!(fields = resolved.len(), "resolve done");
    Ok(resolved.with_diagnostics(policy.into_diagnostics()))
}

fn scan(
    env: &EnvMap,
    term: &str,
    settings: Settings,
    policy: &mut Policy,
    resolved: &mut Resolved,
) -> Result<(), EnvcastError> {
    tracing::debug!(term, "matching keys by prefix");
    let settings = settings.with_scan_term(term);
    for found in env::scan_prefix(env, term) {
        assign(item::scanned(found), &settings, policy, resolved)?;
    }
    Ok(())
}

fn assign(
    item: ResolutionItem,
    settings: &Settings,
    policy: &mut Policy,
    resolved: &mut Resolved,
) -> Result<(), EnvcastError> {
    let value = coerce::coerce_item(&item, settings, policy)?;
    resolved.set(item.field, value);
    Ok(())
}
