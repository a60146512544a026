//! Code verification

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::secret::{Secret, SecretProvider};
use crate::CODE_LENGTH;

/// Outcome of judging a complete code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The code equals the secret
    Success,
    /// The code has the right length but differs from the secret
    Failure,
}

/// Judges complete codes against the secret
#[derive(Debug, Clone)]
pub struct Verifier {
    secret: Secret,
}

impl Verifier {
    pub fn new(secret: Secret) -> Self {
        Self { secret }
    }

    /// Build a verifier from whatever provider is configured
    pub fn from_provider(provider: &dyn SecretProvider) -> Result<Self> {
        Ok(Self::new(provider.secret()?))
    }

    /// Judge a code.
    ///
    /// Returns `None` unless the code is exactly [`CODE_LENGTH`] characters,
    /// so a duplicate submission that arrives after the buffer was cleared
    /// does nothing.
    pub fn judge(&self, code: &str) -> Option<Verdict> {
        if code.len() != CODE_LENGTH {
            return None;
        }

        let verdict = if self.secret.matches(code) {
            Verdict::Success
        } else {
            Verdict::Failure
        };
        tracing::debug!(?verdict, "code judged");
        Some(verdict)
    }
}
