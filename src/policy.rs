//! Verbosity policy: what happens to a field failure.
//!
//! - `Silent`: recorded at debug level only, resolution recovers.
//! - `Log`: a diagnostic block is emitted as a warning and kept on the
//!   result, resolution recovers.
//! - `Throw`: the failure is returned and ends the call.

use crate::error::EnvcastError;
use crate::types::Verbosity;

const RULE_WIDTH: usize = 100;

pub struct Policy {
    verbosity: Verbosity,
    diagnostics: Vec<String>,
}

impl Policy {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            diagnostics: Vec::new(),
        }
    }

    /// Apply the policy to `failure`. `Ok` means the caller should recover
    /// and keep going.
    pub fn report(&mut self, failure: EnvcastError) -> Result<(), EnvcastError> {
        tracing::debug!(error = %failure, "field failure");
        match self.verbosity {
            Verbosity::Silent => Ok(()),
            Verbosity::Log => {
                tracing::warn!("{}", render_block(&failure));
                self.diagnostics.push(failure.to_string());
                Ok(())
            }
            Verbosity::Throw => Err(failure),
        }
    }

    pub fn into_diagnostics(self) -> Vec<String> {
        self.diagnostics
    }
}

/// Frame a failure message as a multi-line block.
pub fn render_block(failure: &EnvcastError) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut block = format!("{rule}\n| ENVCAST ERROR:\n");
    for line in failure.to_string().lines() {
        block.push_str("| ");
        block.push_str(line);
        block.push('\n');
    }
    block.push_str(&rule);
    block
}
