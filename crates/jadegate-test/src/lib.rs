//! Shared test fixtures and a fake-upstream harness for the JadeGate
//! workspace. A dev-dependency only — never pulled in by a shipped
//! binary or library crate.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod fixtures;
mod upstream;

pub use fixtures::{
    benign_call_params, dangerous_pattern_params, network_send_params, sensitive_read_params,
    signed_test_certificate, test_certificate, tight_policy,
};
pub use upstream::scripted_upstream;
