//! Ordered pre-call evaluation pipeline and post-call bookkeeping for the
//! JadeGate security gateway.
//!
//! [`ToolCallInterceptor`] is where [`jadegate_policy::Policy`],
//! [`jadegate_dag::DynamicDag`], and [`jadegate_breaker::CircuitBreaker`]
//! meet: every tool call is evaluated against all three before it is
//! allowed to execute, and the outcome is reported back afterward so the
//! breaker and the audit log stay current.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod interceptor;
mod patterns;
mod scan;
mod types;

pub use interceptor::{AuditEntry, ToolCallInterceptor};
pub use patterns::{first_dangerous_match, DANGEROUS_PATTERNS};
pub use scan::{deep_string_scan, sanitize_params, scan_dangerous_patterns, scan_domains, scan_file_paths};
pub use types::{InterceptResult, Verdict};

#[cfg(test)]
mod tests;
