//! Credential resolution.
//!
//! A credential is looked up in two places, in order:
//!
//! 1. the value passed explicitly in the adapter's configuration;
//! 2. a fixed, per-adapter environment variable.
//!
//! Empty strings count as absent in both places.  Resolution happens exactly
//! once, when the adapter is constructed, so a missing key is reported before
//! any request is attempted.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, VaultError};

// ---------------------------------------------------------------------------
// Environment lookup
// ---------------------------------------------------------------------------

/// Source of environment variables.
///
/// Production code uses [`ProcessEnv`]; tests pass a closure so they never
/// have to mutate the process environment.
pub trait EnvLookup {
    /// Return the value of `name`, or `None` when it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads variables from the current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a secret credential from an explicit value or `env_var`.
///
/// Returns [`VaultError::MissingCredential`] when neither source provides a
/// non-empty value.  The error names the lower-cased variable as the config
/// field (e.g. `OPENAI_API_KEY` -> `openai_api_key`).
pub fn resolve_credential(
    explicit: Option<SecretString>,
    env_var: &str,
    lookup: &impl EnvLookup,
) -> Result<SecretString> {
    if let Some(secret) = explicit.filter(|s| !s.expose_secret().is_empty()) {
        tracing::trace!(env_var, "using explicitly configured credential");
        return Ok(secret);
    }

    match lookup.var(env_var).filter(|v| !v.is_empty()) {
        Some(value) => {
            tracing::debug!(env_var, "credential resolved from environment");
            Ok(SecretString::from(value))
        }
        None => Err(VaultError::MissingCredential {
            field: env_var.to_ascii_lowercase(),
            env_var: env_var.to_string(),
        }),
    }
}

/// Resolve a non-secret setting from an explicit value or `env_var`.
///
/// Unlike [`resolve_credential`] a missing value is not an error.
pub fn resolve_optional(
    explicit: Option<String>,
    env_var: &str,
    lookup: &impl EnvLookup,
) -> Option<String> {
    explicit
        .filter(|v| !v.is_empty())
        .or_else(|| lookup.var(env_var).filter(|v| !v.is_empty()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
