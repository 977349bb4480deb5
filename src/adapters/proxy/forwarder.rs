//! Proxy Forwarder
//!
//! Relays GET requests to the upstream API and hands back status, content
//! type and body untouched. Also fetches plain binary assets for the launch
//! flow and logo passthrough.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Url};
use thiserror::Error;

use crate::ports::{AssetError, AssetPort, FetchedAsset};

/// User agent sent on every outbound request
pub const PROXY_USER_AGENT: &str = "LimeScopeProxy/1.0";

const PROXY_ACCEPT: &str = "application/json, text/plain, */*";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
    #[error("{0}")]
    RequestFailed(String),
}

/// Authorization handling for a forwarded request
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyAuth {
    /// No Authorization header
    Public,
    /// Inbound bearer if usable, else the configured one
    Authed(Option<String>),
}

/// Upstream response as relayed to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct ProxiedResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct ProxyForwarder {
    http: Client,
    bearer: Option<String>,
}

impl ProxyForwarder {
    /// `bearer` is the server-side fallback token, already vetted as usable
    pub fn new(bearer: Option<String>) -> Result<Self, ProxyError> {
        let http = Client::builder()
            .user_agent(PROXY_USER_AGENT)
            .build()
            .map_err(|e| ProxyError::ClientBuild(e.to_string()))?;

        Ok(Self { http, bearer })
    }

    pub fn has_bearer(&self) -> bool {
        self.bearer.is_some()
    }

    /// Authorization value to send, if any
    pub fn choose_authorization(&self, auth: &ProxyAuth) -> Option<String> {
        match auth {
            ProxyAuth::Public => None,
            ProxyAuth::Authed(inbound) => inbound
                .as_deref()
                .filter(|h| h.starts_with("Bearer "))
                .map(str::to_string)
                .or_else(|| self.bearer.clone()),
        }
    }

    pub async fn forward(&self, url: Url, auth: ProxyAuth) -> Result<ProxiedResponse, ProxyError> {
        let mut req = self
            .http
            .get(url.clone())
            .header(USER_AGENT, PROXY_USER_AGENT)
            .header(ACCEPT, PROXY_ACCEPT);

        if let Some(authorization) = self.choose_authorization(&auth) {
            req = req.header(AUTHORIZATION, authorization);
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!("[Proxy] {} -> {}", url, e);
            ProxyError::RequestFailed(e.to_string())
        })?;

        let status = response.status().as_u16();
        let upstream_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let body = response.text().await.map_err(|e| {
            tracing::error!("[Proxy] {} body -> {}", url, e);
            ProxyError::RequestFailed(e.to_string())
        })?;

        tracing::debug!("[Proxy] {} -> {}", url, status);
        Ok(ProxiedResponse {
            status,
            content_type: upstream_type.unwrap_or_else(|| guess_content_type(&body).to_string()),
            body,
        })
    }
}

/// Content type for a body the upstream did not label
pub fn guess_content_type(body: &str) -> &'static str {
    let trimmed = body.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        "application/json; charset=utf-8"
    } else {
        "text/plain"
    }
}

#[async_trait]
impl AssetPort for ProxyForwarder {
    async fn fetch_asset(&self, url: &str) -> Result<FetchedAsset, AssetError> {
        let response = self
            .http
            .get(url)
            .header(USER_AGENT, PROXY_USER_AGENT)
            .send()
            .await
            .map_err(|e| AssetError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AssetError::RequestFailed(e.to_string()))?;

        Ok(FetchedAsset {
            status,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("  {\"a\":1}"), "application/json; charset=utf-8");
        assert_eq!(guess_content_type("[1,2]"), "application/json; charset=utf-8");
        assert_eq!(guess_content_type("Not Found"), "text/plain");
        assert_eq!(guess_content_type(""), "text/plain");
    }

    #[test]
    fn test_public_never_sends_auth() {
        let proxy = ProxyForwarder::new(Some("Bearer server".to_string())).unwrap();
        assert_eq!(proxy.choose_authorization(&ProxyAuth::Public), None);
    }

    #[test]
    fn test_inbound_bearer_preferred() {
        let proxy = ProxyForwarder::new(Some("Bearer server".to_string())).unwrap();
        assert_eq!(
            proxy.choose_authorization(&ProxyAuth::Authed(Some("Bearer client".to_string()))),
            Some("Bearer client".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_configured_bearer() {
        let proxy = ProxyForwarder::new(Some("Bearer server".to_string())).unwrap();
        assert_eq!(
            proxy.choose_authorization(&ProxyAuth::Authed(Some("Basic abc".to_string()))),
            Some("Bearer server".to_string())
        );
        assert_eq!(
            proxy.choose_authorization(&ProxyAuth::Authed(None)),
            Some("Bearer server".to_string())
        );
    }

    #[test]
    fn test_no_bearer_available() {
        let proxy = ProxyForwarder::new(None).unwrap();
        assert!(!proxy.has_bearer());
        assert_eq!(proxy.choose_authorization(&ProxyAuth::Authed(None)), None);
    }

    #[tokio::test]
    async fn test_network_failure() {
        let proxy = ProxyForwarder::new(None).unwrap();
        let url = Url::parse("http://127.0.0.1:1/feed").unwrap();
        let err = proxy.forward(url, ProxyAuth::Public).await.unwrap_err();
        assert!(matches!(err, ProxyError::RequestFailed(_)));
    }
}
