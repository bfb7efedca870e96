//! Stdio JSON-RPC splice between a host application and an upstream MCP
//! tool server, routing every `tools/call` through a [`jadegate_session`]
//! security session and annotating `tools/list` responses with a risk
//! profile for each tool.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod profile;
mod proxy;
mod transport;
mod upstream;

pub use error::{ProxyError, ProxyResult};
pub use profile::tool_security_profile;
pub use proxy::JadeMcpProxy;
pub use transport::{intercept_call, report_result, Transport};
pub use upstream::{UpstreamProcess, DEFAULT_RESPONSE_TIMEOUT};

#[cfg(test)]
mod tests;
