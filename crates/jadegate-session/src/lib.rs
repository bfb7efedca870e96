//! Per-agent-connection security session for the JadeGate gateway.
//!
//! [`JadeSession`] is the top-level object a host application holds: one
//! per agent conversation or MCP connection, wiring together a
//! [`jadegate_policy::Policy`], a [`jadegate_dag::DynamicDag`], a
//! [`jadegate_breaker::CircuitBreaker`], and a
//! [`jadegate_interceptor::ToolCallInterceptor`], and tracking call counts
//! and closed state on top.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod session;
mod status;

pub use session::JadeSession;
pub use status::SessionStatus;

#[cfg(test)]
mod tests;
