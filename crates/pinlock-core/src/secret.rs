//! The expected code and where it comes from

use zeroize::Zeroizing;

use crate::error::{GateError, Result};
use crate::CODE_LENGTH;

/// Environment variable read by [`EnvSecret::default`]
pub const DEFAULT_SECRET_VAR: &str = "PINLOCK_SECRET";

/// The code the gate accepts.
///
/// Always exactly [`CODE_LENGTH`] ASCII digits. The value is wiped on drop and
/// never printed by `Debug`.
#[derive(Clone)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    /// Validate and wrap a secret value
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let found = value.chars().count();
        if found != CODE_LENGTH {
            return Err(GateError::InvalidSecretLength {
                expected: CODE_LENGTH,
                found,
            });
        }
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(GateError::InvalidSecretFormat);
        }
        Ok(Self(Zeroizing::new(value.to_string())))
    }

    /// Compare a candidate code without short-circuiting on the first
    /// differing digit
    pub fn matches(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        let candidate = candidate.as_bytes();
        if expected.len() != candidate.len() {
            return false;
        }
        expected
            .iter()
            .zip(candidate)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(******)")
    }
}

impl std::str::FromStr for Secret {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Source of the secret, resolved once when the gate is built.
pub trait SecretProvider {
    fn secret(&self) -> Result<Secret>;
}

/// A secret handed in directly (tests, embedding, configuration files)
#[derive(Clone, Debug)]
pub struct StaticSecret(Secret);

impl StaticSecret {
    pub fn new(secret: Secret) -> Self {
        Self(secret)
    }
}

impl SecretProvider for StaticSecret {
    fn secret(&self) -> Result<Secret> {
        Ok(self.0.clone())
    }
}

/// Reads the secret from an environment variable
#[derive(Clone, Debug)]
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvSecret {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_VAR)
    }
}

impl SecretProvider for EnvSecret {
    fn secret(&self) -> Result<Secret> {
        let value = Zeroizing::new(std::env::var(&self.var).map_err(|e| {
            GateError::SecretUnavailable(format!("{}: {}", self.var, e))
        })?);
        Secret::parse(&value)
    }
}
