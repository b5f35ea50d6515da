//! Hosted language-model completion for Conduit.
//!
//! This crate wraps a single hosted completion endpoint (the ForefrontAI
//! "complete" API) behind the [`LanguageModel`] trait.  Each call performs
//! exactly one authenticated POST and returns the generated text.
//!
//! ## Modules
//!
//! - [`client`] -- endpoint configuration and the HTTP client.
//! - [`params`] -- default sampling parameters and per-call overrides.
//! - [`stop`] -- client-side stop-token enforcement.
//! - [`model`] -- the provider-agnostic [`LanguageModel`] trait.
//! - [`error`] -- LLM error types.

pub mod client;
pub mod error;
pub mod model;
pub mod params;
pub mod stop;

// Re-export the most commonly used types at the crate root.
pub use client::{FOREFRONTAI_API_KEY_ENV, ForefrontClient, ForefrontConfig};
pub use error::{LlmError, Result};
pub use model::LanguageModel;
pub use params::{SamplingOverrides, SamplingParams};
pub use stop::enforce_stop_tokens;
