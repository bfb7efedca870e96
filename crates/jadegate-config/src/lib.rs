//! Layered configuration for the JadeGate binaries.
//!
//! [`Config`] covers the ambient knobs every `jadegate-cli` subcommand
//! needs — log level/format, the trust directory, an optional policy
//! file, an optional audit log path, and the default upstream response
//! timeout. [`load`] resolves it with the precedence the specification
//! calls for: embedded defaults, then a user file
//! (`${HOME}/.jadegate/config.toml` unless overridden), then
//! `JADEGATE_*` environment variables. An explicit CLI flag is the
//! fourth and final tier; since that only exists once a binary's
//! argument parser has run, applying it is left to the caller.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod env;
mod error;
mod loader;
mod types;

pub use error::{ConfigError, ConfigResult};
pub use loader::load;
pub use types::{default_config_path, default_trust_dir, Config};
