//! Vault error types.
//!
//! Credential resolution surfaces errors through [`VaultError`].  Each
//! variant names the setting that failed so callers can tell the user which
//! value to provide.

/// Unified error type for credential handling.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// A required credential was neither passed explicitly nor found in the
    /// environment.
    #[error(
        "missing credential `{field}`: set the `{env_var}` environment variable \
         or pass `{field}` explicitly"
    )]
    MissingCredential { field: String, env_var: String },
}

/// Convenience alias used throughout the vault crate.
pub type Result<T> = std::result::Result<T, VaultError>;
