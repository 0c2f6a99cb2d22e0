use std::collections::BTreeMap;

/// A snapshot of the environment. Sorted so prefix scans are deterministic.
pub type EnvMap = BTreeMap<String, String>;

/// Snapshot the process environment.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
pub fn process_env() -> EnvMap {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Compute the key to look up for a declared source key.
///
/// The prefix is prepended unless the key already carries it, so both
/// `PORT` and `APP_PORT` resolve to `APP_PORT` under prefix `APP_`.
pub fn full_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(p) if !key.starts_with(p) => format!("{p}{key}"),
        _ => key.to_string(),
    }
}

/// An environment entry matched by a prefix scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanMatch<'a> {
    /// The key with the scan term stripped from its start.
    pub field: &'a str,
    pub key: &'a str,
    pub value: &'a str,
}

/// Every entry whose key starts with `term`, in key order.
///
/// An empty term matches every entry. A key equal to the term yields an
/// empty field name.
pub fn scan_prefix<'a>(env: &'a EnvMap, term: &'a str) -> impl Iterator<Item = ScanMatch<'a>> {
    env.iter().filter_map(move |(key, value)| {
        let field = key.strip_prefix(term)?;
        Some(ScanMatch {
            field,
            key: key.as_str(),
            value: value.as_str(),
        })
    })
}
