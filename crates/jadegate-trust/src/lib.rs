//! Certificates, trust scoring, and trust-on-first-use for the JadeGate
//! security gateway.
//!
//! A [`Certificate`] is a local, optionally-signed record of what a tool
//! is believed capable of and how trustworthy it has been so far. A
//! [`TrustStore`] persists one certificate per tool under a trust
//! directory (default `~/.jadegate/trust/`), and a [`TofuChecker`] pins a
//! tool's capability baseline the first time it's seen and alerts when
//! later observations deviate from it.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod certificate;
mod error;
mod risk;
mod store;
mod tofu;

pub use certificate::Certificate;
pub use error::{TrustError, TrustResult};
pub use risk::{RiskLevel, RiskProfile};
pub use store::{default_trust_dir, TrustStore, TrustSummary};
pub use tofu::{TofuAlert, TofuAlertKind, TofuChecker};

#[cfg(test)]
mod tests;
