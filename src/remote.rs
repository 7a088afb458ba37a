//! Remote version manifest fetching.
//!
//! Each tracked dependency publishes a package manifest (JSON with at least
//! a `version` string field) at a fixed URL. [`VersionFetcher`] performs a
//! blocking GET and extracts that field. No retries: a failed fetch leaves
//! the dependency unresolved for the current run.

use crate::error::{PlugsyncError, Result};
use std::time::Duration;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches version strings from remote package manifests.
pub struct VersionFetcher {
    timeout: Duration,
    client: reqwest::blocking::Client,
}

impl VersionFetcher {
    /// Create a fetcher with the specified timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: reqwest::blocking::Client::builder()
                .user_agent("plugsync")
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Fetch the `version` field from the manifest at `url`.
    pub fn fetch_version(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| PlugsyncError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlugsyncError::Network {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().map_err(|e| PlugsyncError::Network {
            url: url.to_string(),
            message: format!("failed to read response body: {}", e),
        })?;

        extract_version(&body, url)
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for VersionFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

/// Parse a manifest body and pull out its `version` string.
fn extract_version(body: &str, url: &str) -> Result<String> {
    let manifest: serde_json::Value =
        serde_json::from_str(body).map_err(|e| PlugsyncError::Parse {
            what: format!("remote manifest at {}", url),
            message: e.to_string(),
        })?;

    manifest["version"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| PlugsyncError::Parse {
            what: format!("remote manifest at {}", url),
            message: "missing string field 'version'".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn default_fetcher_uses_default_timeout() {
        let fetcher = VersionFetcher::default();
        assert_eq!(fetcher.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn extracts_version_from_valid_manifest() {
        let version = extract_version(r#"{"name":"pkg","version":"1.2.3"}"#, "test").unwrap();
        assert_eq!(version, "1.2.3");
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = extract_version("not json {", "test").unwrap_err();
        assert!(matches!(err, PlugsyncError::Parse { .. }));
    }

    #[test]
    fn missing_version_field_is_parse_error() {
        let err = extract_version(r#"{"name":"pkg"}"#, "test").unwrap_err();
        assert!(matches!(err, PlugsyncError::Parse { .. }));
    }

    #[test]
    fn non_string_version_is_parse_error() {
        let err = extract_version(r#"{"version":123}"#, "test").unwrap_err();
        assert!(matches!(err, PlugsyncError::Parse { .. }));
    }

    #[test]
    fn fetches_version_over_http() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/package.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"name":"tech.example.uploader","version":"2.4.1"}"#);
        });

        let fetcher = VersionFetcher::new(Duration::from_secs(5));
        let version = fetcher.fetch_version(&server.url("/package.json")).unwrap();

        mock.assert();
        assert_eq!(version, "2.4.1");
    }

    #[test]
    fn http_error_status_is_network_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.json");
            then.status(404);
        });

        let fetcher = VersionFetcher::new(Duration::from_secs(5));
        let err = fetcher
            .fetch_version(&server.url("/missing.json"))
            .unwrap_err();
        assert!(matches!(err, PlugsyncError::Network { .. }));
    }

    #[test]
    fn unreachable_server_is_network_error() {
        // Port 9 (discard) is almost certainly closed
        let fetcher = VersionFetcher::new(Duration::from_millis(200));
        let err = fetcher
            .fetch_version("http://127.0.0.1:9/package.json")
            .unwrap_err();
        assert!(matches!(err, PlugsyncError::Network { .. }));
    }
}
