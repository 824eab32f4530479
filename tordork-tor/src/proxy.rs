//! Tor SOCKS5h proxy client
//!
//! Builds the per-run HTTP identity that routes through Tor and verifies
//! the route is anonymized before any search is sent.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Proxy};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Tor proxy configuration
#[derive(Debug, Clone)]
pub struct TorConfig {
    /// SOCKS5 proxy address (default: socks5h://127.0.0.1:9050)
    pub socks_addr: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Identity-check endpoint that reports whether the caller is a Tor exit
    pub check_url: String,
}

impl Default for TorConfig {
    fn default() -> Self {
        Self {
            socks_addr: "socks5h://127.0.0.1:9050".to_string(),
            timeout_secs: 30,
            check_url: "https://check.torproject.org/api/ip".to_string(),
        }
    }
}

/// Errors from Tor networking
#[derive(Debug, Error)]
pub enum TorError {
    #[error("Failed to build Tor client: {0}")]
    ClientBuild(String),
}

/// Fatal errors that stop a run before any query is sent
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Tor setup error: {0}")]
    ClientBuild(String),

    #[error("Tor is not running or not anonymizing traffic via {0}")]
    NotAnonymized(String),
}

impl From<TorError> for SetupError {
    fn from(err: TorError) -> Self {
        SetupError::ClientBuild(err.to_string())
    }
}

/// User agents for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// Get a random user agent
pub fn random_user_agent() -> &'static str {
    use rand::Rng;
    let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
    USER_AGENTS[idx]
}

/// Browser-like headers sent with every request of a run
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
    headers
}

/// Create a Tor-enabled HTTP client
pub fn create_tor_client(config: &TorConfig) -> Result<Client, TorError> {
    let proxy = Proxy::all(&config.socks_addr)
        .map_err(|e| TorError::ClientBuild(e.to_string()))?;

    Client::builder()
        .proxy(proxy)
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(random_user_agent())
        .default_headers(default_headers())
        .build()
        .map_err(|e| TorError::ClientBuild(e.to_string()))
}

/// Body of the Tor Project check endpoint
#[derive(Debug, Deserialize)]
struct TorCheck {
    #[serde(rename = "IsTor")]
    is_tor: bool,
    #[serde(rename = "IP", default)]
    ip: Option<String>,
}

/// Ask the identity-check endpoint whether `client` exits through Tor.
///
/// Any transport failure, non-2xx status, or body that does not assert
/// `"IsTor": true` counts as not anonymized.
pub async fn check_anonymity(client: &Client, check_url: &str) -> bool {
    let response = match client.get(check_url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            debug!("Tor check request failed: {}", e);
            return false;
        }
    };

    if !response.status().is_success() {
        warn!("Tor check returned status: {}", response.status());
        return false;
    }

    match response.json::<TorCheck>().await {
        Ok(check) => {
            if let Some(ip) = &check.ip {
                debug!(exit_ip = %ip, is_tor = check.is_tor, "Tor check response");
            }
            check.is_tor
        }
        Err(e) => {
            debug!("Unreadable Tor check response: {}", e);
            false
        }
    }
}

/// Check if Tor proxy is reachable and anonymizing
pub async fn check_tor_connection(config: &TorConfig) -> Result<bool, TorError> {
    let client = create_tor_client(config)?;
    Ok(check_anonymity(&client, &config.check_url).await)
}

/// The shared anonymous identity used by every query of a run
#[derive(Debug, Clone)]
pub struct TorSession {
    pub(crate) client: Client,
}

impl TorSession {
    /// Wrap an already-built client without verifying its route.
    ///
    /// Only for driving the executor against local mock servers; real runs
    /// get their session from [`open_session`].
    #[doc(hidden)]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// Build the run's Tor identity and verify it before handing it out
pub async fn open_session(config: &TorConfig) -> Result<TorSession, SetupError> {
    let client = create_tor_client(config)?;

    if !check_anonymity(&client, &config.check_url).await {
        return Err(SetupError::NotAnonymized(config.socks_addr.clone()));
    }

    info!("Tor connection verified via {}", config.socks_addr);
    Ok(TorSession { client })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TorConfig::default();
        assert!(config.socks_addr.contains("9050"));
        assert!(config.socks_addr.starts_with("socks5h://"));
        assert_eq!(config.timeout_secs, 30);
        assert!(config.check_url.contains("check.torproject.org"));
    }

    #[test]
    fn test_random_user_agent() {
        let ua = random_user_agent();
        assert!(ua.contains("Mozilla"));
        assert!(USER_AGENTS.contains(&ua));
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers();
        assert_eq!(headers.get(ACCEPT).unwrap(), "*/*");
        assert_eq!(headers.get("dnt").unwrap(), "1");
    }

    #[test]
    fn test_create_tor_client() {
        assert!(create_tor_client(&TorConfig::default()).is_ok());
    }

    #[test]
    fn test_tor_check_parsing() {
        let check: TorCheck =
            serde_json::from_str(r#"{"IsTor":true,"IP":"185.220.101.1"}"#).unwrap();
        assert!(check.is_tor);
        assert_eq!(check.ip.as_deref(), Some("185.220.101.1"));

        let check: TorCheck = serde_json::from_str(r#"{"IsTor":false}"#).unwrap();
        assert!(!check.is_tor);
        assert!(check.ip.is_none());
    }

    #[tokio::test]
    async fn test_open_session_fails_without_tor() {
        // Nothing listens on the discard port, so verification cannot pass.
        let config = TorConfig {
            socks_addr: "socks5h://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..Default::default()
        };
        let result = open_session(&config).await;
        assert!(matches!(result, Err(SetupError::NotAnonymized(_))));
    }
}
