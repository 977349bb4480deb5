//! Upstream API routes
//!
//! Builds the launch-platform URLs the proxy endpoints forward to. Path
//! segments and query values are percent-encoded.

use reqwest::Url;

use super::forwarder::ProxyError;

/// Default base of the launch-platform public API
pub const DEFAULT_UPSTREAM_API: &str = "https://api2.bags.fm/api/v1";

/// Fixed logo relayed by `/api/gmgn-logo`
pub const GMGN_LOGO_URL: &str = "https://gmgn.ai/static/logo.svg";

const OVERVIEW_EXTENSIONS: &str = "allTimeHigh,creationMetadata";

/// Candle query for the OHLCV endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvRange {
    pub resolution: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct UpstreamApi {
    base: Url,
}

impl UpstreamApi {
    pub fn new(base: &str) -> Result<Self, ProxyError> {
        let base = Url::parse(base.trim_end_matches('/'))
            .map_err(|e| ProxyError::RequestFailed(format!("invalid upstream url {}: {}", base, e)))?;
        if base.cannot_be_a_base() {
            return Err(ProxyError::RequestFailed(format!("invalid upstream url {}", base)));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    pub fn feed(&self) -> Url {
        self.endpoint(&["token-launch", "feed"], &[])
    }

    pub fn leaderboard(&self) -> Url {
        self.endpoint(&["token-launch", "leaderboard"], &[])
    }

    pub fn lifetime_fees(&self, token_mint: &str) -> Url {
        self.endpoint(&["token-launch", "lifetime-fees"], &[("tokenMint", token_mint)])
    }

    pub fn market(&self, token_address: &str) -> Url {
        self.endpoint(&["bags", "token", "find"], &[("tokenAddress", token_address)])
    }

    pub fn token_overview(&self, token_address: &str) -> Url {
        self.endpoint(
            &["token", token_address, "overview"],
            &[("extensions", OVERVIEW_EXTENSIONS)],
        )
    }

    pub fn token_trades(&self, token_address: &str) -> Url {
        self.endpoint(&["token", token_address, "trades"], &[])
    }

    pub fn token_top_holders(&self, token_address: &str) -> Url {
        self.endpoint(&["token", token_address, "top-holders"], &[])
    }

    pub fn token_ohlcv(&self, token_address: &str, range: &OhlcvRange) -> Url {
        self.endpoint(
            &["token", token_address, "ohlcv", "v2"],
            &[
                ("resolution", range.resolution.as_str()),
                ("from", range.from.as_str()),
                ("to", range.to.as_str()),
            ],
        )
    }

    pub fn creator(&self, token_mint: &str) -> Url {
        self.endpoint(&["token-launch", "creator", "v2"], &[("tokenMint", token_mint)])
    }

    pub fn subscription(&self) -> Url {
        self.endpoint(&["subscription"], &[])
    }

    pub fn subscription_info(&self, uuid: &str) -> Url {
        self.endpoint(&["subscription", "info", uuid], &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_api() -> UpstreamApi {
        UpstreamApi::new(DEFAULT_UPSTREAM_API).unwrap()
    }

    #[test]
    fn test_feed_urls() {
        let api = default_api();
        assert_eq!(api.feed().as_str(), "https://api2.bags.fm/api/v1/token-launch/feed");
        assert_eq!(
            api.leaderboard().as_str(),
            "https://api2.bags.fm/api/v1/token-launch/leaderboard"
        );
    }

    #[test]
    fn test_query_encoded() {
        let api = UpstreamApi::new("http://localhost:9000/api/v1/").unwrap();
        assert_eq!(
            api.lifetime_fees("a b&c").as_str(),
            "http://localhost:9000/api/v1/token-launch/lifetime-fees?tokenMint=a+b%26c"
        );
    }

    #[test]
    fn test_path_segment_encoded() {
        let api = default_api();
        assert_eq!(
            api.token_trades("mint/../x").as_str(),
            "https://api2.bags.fm/api/v1/token/mint%2F..%2Fx/trades"
        );
    }

    #[test]
    fn test_token_routes() {
        let api = default_api();
        assert_eq!(
            api.token_overview("Mint").as_str(),
            "https://api2.bags.fm/api/v1/token/Mint/overview?extensions=allTimeHigh%2CcreationMetadata"
        );
        assert_eq!(
            api.market("Mint").as_str(),
            "https://api2.bags.fm/api/v1/bags/token/find?tokenAddress=Mint"
        );

        let range = OhlcvRange {
            resolution: "1".to_string(),
            from: "100".to_string(),
            to: "200".to_string(),
        };
        assert_eq!(
            api.token_ohlcv("Mint", &range).as_str(),
            "https://api2.bags.fm/api/v1/token/Mint/ohlcv/v2?resolution=1&from=100&to=200"
        );
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(UpstreamApi::new("not a url").is_err());
        assert!(UpstreamApi::new("mailto:someone@example.com").is_err());
    }
}
