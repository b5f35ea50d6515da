//! Credential handling for Conduit adapters.
//!
//! Adapters never hold raw API keys as plain `String`s.  Keys are resolved
//! once, at construction, from an explicit value or a fixed environment
//! variable, and are kept in a [`SecretString`] whose `Debug` output is
//! redacted.  Exposing the raw value requires an explicit
//! [`ExposeSecret::expose_secret`] call at the point of use.
//!
//! # Modules
//!
//! - [`secret`] -- credential resolution and environment lookup.
//! - [`error`] -- Unified error types.
//!
//! # Quick Start
//!
//! ```rust
//! use conduit_vault::{ExposeSecret, SecretString, resolve_credential};
//!
//! let env = |name: &str| (name == "EXAMPLE_API_KEY").then(|| "from-env".to_string());
//!
//! // An explicit value wins over the environment.
//! let key = resolve_credential(Some(SecretString::from("explicit")), "EXAMPLE_API_KEY", &env)?;
//! assert_eq!(key.expose_secret(), "explicit");
//!
//! // Otherwise the environment variable is used.
//! let key = resolve_credential(None, "EXAMPLE_API_KEY", &env)?;
//! assert_eq!(key.expose_secret(), "from-env");
//! # Ok::<(), conduit_vault::VaultError>(())
//! ```

pub mod error;
pub mod secret;

pub use error::{Result, VaultError};
pub use secret::{EnvLookup, ProcessEnv, resolve_credential, resolve_optional};
pub use secrecy::{ExposeSecret, SecretString};
