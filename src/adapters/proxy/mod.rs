//! Upstream proxy adapter
//!
//! GET passthrough to the launch-platform API plus binary asset fetches.

pub mod forwarder;
pub mod upstream;

pub use forwarder::{guess_content_type, ProxiedResponse, ProxyAuth, ProxyError, ProxyForwarder, PROXY_USER_AGENT};
pub use upstream::{OhlcvRange, UpstreamApi, DEFAULT_UPSTREAM_API, GMGN_LOGO_URL};
