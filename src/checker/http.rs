// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Bounds every probe by a connect timeout plus a read timeout
// - Folds every failure mode (bad URL, DNS, refusal, timeout, 4xx/5xx)
//   into one of three classifications: ALIVE, DEAD, ERROR
// - Checks many bookmarks with a fixed number of probes in flight
//
// The checker holds nothing but a reqwest Client (an Arc'd connection
// pool), so it is cheap to clone and safe to share between the interactive
// commands and the background sweep.
// =============================================================================

use std::error::Error as StdError;

use futures::stream::{self, StreamExt}; // StreamExt gives us .buffered()
use reqwest::{redirect, Client};
use url::Url;

use super::status::LinkStatus;
use crate::config::CheckerConfig;
use crate::error::{NetworkFailureKind, ProbeError};
use crate::store::Bookmark;

/// Classifies single URLs. Never fails, never panics.
#[derive(Debug, Clone)]
pub struct UrlHealthChecker {
    client: Client,
}

impl UrlHealthChecker {
    /// Builds the shared HTTP client.
    ///
    /// Only fails if the TLS backend cannot be initialised.
    pub fn new(config: &CheckerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_deadline())
            .redirect(redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// Classifies one URL as ALIVE, DEAD or ERROR.
    ///
    /// Any string is accepted; anything that is not an http(s) URL is an
    /// ERROR without touching the network.
    pub async fn check_link(&self, url: &str) -> LinkStatus {
        match self.probe(url).await {
            Ok(_) => LinkStatus::Alive,
            Err(e) => {
                log::debug!("probe of {} failed: {}", url, e);
                e.link_status()
            }
        }
    }

    /// Sends one HEAD request and returns the alive status code, or the
    /// reason the URL is not alive.
    ///
    /// The response is owned by this function and dropped before it
    /// returns, which hands the connection back to the pool on every path.
    pub async fn probe(&self, url: &str) -> Result<u16, ProbeError> {
        let target = parse_probe_target(url)?;

        let response = self
            .client
            .head(target)
            .send()
            .await
            .map_err(network_failure)?;

        classify_status(response.status().as_u16())
    }

    /// Checks a list of bookmarks with at most `concurrency` probes in flight.
    ///
    /// Results come back in input order, paired with the bookmark they
    /// belong to.
    pub async fn check_bookmarks(
        &self,
        bookmarks: Vec<Bookmark>,
        concurrency: usize,
    ) -> Vec<(Bookmark, LinkStatus)> {
        let futures = bookmarks.into_iter().map(|bookmark| async move {
            let status = self.check_link(&bookmark.url).await;
            (bookmark, status)
        });

        // .buffered(n) keeps n futures running and yields them in the order
        // they were created, unlike buffer_unordered which yields by completion.
        stream::iter(futures)
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

// Validates the raw string before anything hits the network.
fn parse_probe_target(input: &str) -> Result<Url, ProbeError> {
    let malformed = |reason: String| ProbeError::MalformedInput {
        input: input.to_string(),
        reason,
    };

    let parsed = Url::parse(input.trim()).map_err(|e| malformed(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(malformed(format!("unsupported scheme '{}'", other))),
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(malformed("URL has no host".to_string()));
    }

    Ok(parsed)
}

// HTTP status codes:
// - 200-299: Success
// - 300-399: Redirect (only seen when the redirect could not be followed)
// - anything else: the server is there but the resource is not
fn classify_status(code: u16) -> Result<u16, ProbeError> {
    if (200..400).contains(&code) {
        Ok(code)
    } else {
        Err(ProbeError::RemoteError { status: code })
    }
}

// Categorizes transport errors from reqwest.
//
// reqwest's Display only shows the outermost layer ("error sending request"),
// so we look through the whole source chain to spot DNS and TLS failures.
fn network_failure(error: reqwest::Error) -> ProbeError {
    let chain = error_chain_text(&error);

    if error.is_builder() {
        return ProbeError::MalformedInput {
            input: error.url().map(|u| u.to_string()).unwrap_or_default(),
            reason: chain,
        };
    }

    let kind = if error.is_timeout() {
        NetworkFailureKind::Timeout
    } else if error.is_redirect() {
        NetworkFailureKind::Redirect
    } else if chain.contains("dns") || chain.contains("lookup") {
        NetworkFailureKind::Dns
    } else if chain.contains("certificate") || chain.contains("tls") || chain.contains("ssl") {
        NetworkFailureKind::Tls
    } else if error.is_connect() {
        NetworkFailureKind::Connect
    } else {
        NetworkFailureKind::Other
    };

    ProbeError::NetworkFailure {
        kind,
        message: chain,
    }
}

fn error_chain_text(error: &reqwest::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text.to_lowercase()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why HEAD instead of GET?
//    - HEAD asks for the status line and headers only
//    - No body is transferred, so a check costs one round trip
//
// 2. Why .buffered() and not .buffer_unordered()?
//    - Both keep at most N futures running
//    - buffered() hands results back in input order, which batch callers need
//
// 3. Where does the connection get released?
//    - `response` is a local in probe(); when probe() returns (any path) it is
//      dropped and reqwest returns the socket to its pool
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn checker() -> UrlHealthChecker {
        UrlHealthChecker::new(&CheckerConfig::default()).unwrap()
    }

    #[test]
    fn status_boundaries() {
        assert!(classify_status(199).is_err());
        assert_eq!(classify_status(200).unwrap(), 200);
        assert_eq!(classify_status(399).unwrap(), 399);
        assert!(matches!(
            classify_status(400),
            Err(ProbeError::RemoteError { status: 400 })
        ));
    }

    #[test]
    fn rejects_non_http_input() {
        assert!(matches!(
            parse_probe_target("not-a-url"),
            Err(ProbeError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_probe_target("ftp://example.com/file"),
            Err(ProbeError::MalformedInput { .. })
        ));
        assert!(parse_probe_target("https://example.com").is_ok());
    }

    #[tokio::test]
    async fn malformed_url_is_error() {
        assert_eq!(checker().check_link("not-a-url").await, LinkStatus::Error);
        assert_eq!(checker().check_link("").await, LinkStatus::Error);
    }

    #[tokio::test]
    async fn ok_response_is_alive_and_uses_head() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/page", server.uri());
        assert_eq!(checker().check_link(&url).await, LinkStatus::Alive);
    }

    #[tokio::test]
    async fn client_and_server_errors_are_dead() {
        let server = MockServer::start().await;
        Mock::given(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let checker = checker();
        let missing = format!("{}/missing", server.uri());
        let broken = format!("{}/broken", server.uri());
        assert_eq!(checker.check_link(&missing).await, LinkStatus::Dead);
        assert_eq!(checker.check_link(&broken).await, LinkStatus::Dead);
    }

    #[tokio::test]
    async fn redirect_to_live_page_is_alive() {
        let server = MockServer::start().await;
        Mock::given(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/new"),
            )
            .mount(&server)
            .await;
        Mock::given(path("/new"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let url = format!("{}/old", server.uri());
        assert_eq!(checker().check_link(&url).await, LinkStatus::Alive);
    }

    #[tokio::test]
    async fn refused_connection_is_error() {
        // Port 1 on loopback is essentially never listening
        let status = checker().check_link("http://127.0.0.1:1/").await;
        assert_eq!(status, LinkStatus::Error);
    }

    #[tokio::test]
    async fn slow_server_times_out_as_error() {
        let server = MockServer::start().await;
        Mock::given(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let config = CheckerConfig {
            connect_timeout: Duration::from_millis(200),
            read_timeout: Duration::from_millis(300),
            ..CheckerConfig::default()
        };
        let checker = UrlHealthChecker::new(&config).unwrap();
        let url = format!("{}/slow", server.uri());

        let err = checker.probe(&url).await.unwrap_err();
        assert!(matches!(
            err,
            ProbeError::NetworkFailure {
                kind: NetworkFailureKind::Timeout,
                ..
            }
        ));
        assert_eq!(checker.check_link(&url).await, LinkStatus::Error);
    }
}
