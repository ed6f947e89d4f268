//! HTTP fetch client
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client with timeouts and compression
//! - Rotating the browser identity presented per request
//! - Backing off and retrying when the site blocks or drops requests
//! - Error classification
//!
//! The identity is set per request rather than on the client, because a 403
//! triggers a rotation mid-flight.

use crate::config::FetchConfig;
use crate::FetchError;
use rand::Rng;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::time::Duration;

/// A completed HTTP exchange
///
/// Carries whatever the server answered. Interpreting the status is the
/// caller's job; only 403 and transport failures are handled below this
/// type.
#[derive(Debug)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body
    pub body: String,
}

/// Outcome of a single attempt, before retry handling
enum AttemptOutcome {
    /// The server answered with something other than 403
    Response { status: u16, body: String },

    /// The server answered 403
    Blocked,

    /// The request never completed
    Transport { error: String },
}

/// HTTP client with retry and identity rotation
pub struct FetchClient {
    client: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Builds the client from fetch settings
    ///
    /// # Arguments
    ///
    /// * `config` - Timeouts, retry counts, and the identity pool
    ///
    /// # Returns
    ///
    /// * `Ok(FetchClient)` - Ready to fetch
    /// * `Err(FetchError::Build)` - The underlying client could not be built
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(FetchError::Build)?;

        Ok(Self { client, config })
    }

    /// Picks a browser identity from the configured pool
    fn draw_identity(&self) -> &str {
        // Config validation guarantees a non-empty pool
        let pool = &self.config.user_agents;
        let index = rand::thread_rng().gen_range(0..pool.len());
        &pool[index]
    }

    /// Picks a replacement identity after a block
    ///
    /// The blocked identity is excluded from the draw whenever the pool has
    /// an alternative, so a retry never presents the identity that was just
    /// refused.
    fn rotate_identity(&self, blocked: &str) -> &str {
        let candidates: Vec<&str> = self
            .config
            .user_agents
            .iter()
            .map(String::as_str)
            .filter(|agent| *agent != blocked)
            .collect();

        if candidates.is_empty() {
            // A single-identity pool leaves nothing to switch to
            return self.draw_identity();
        }
        candidates[rand::thread_rng().gen_range(0..candidates.len())]
    }

    /// Fetches a URL, absorbing blocks and transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 403 | Wait `blocked_delay_ms × attempt`, switch to another identity, retry |
    /// | Timeout | Wait `retry_delay_ms`, retry |
    /// | Connection refused | Wait `retry_delay_ms`, retry |
    /// | Any other status | Returned to the caller |
    ///
    /// Both paths give up after `max_attempts` attempts total.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResponse)` - The server answered; status may still be 404 etc.
    /// * `Err(FetchError::Blocked)` - Every attempt came back 403
    /// * `Err(FetchError::Unavailable)` - Every attempt failed in transit
    pub async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let mut identity = self.draw_identity();
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match self.attempt(url, identity).await {
                AttemptOutcome::Response { status, body } => {
                    return Ok(FetchResponse { status, body });
                }
                AttemptOutcome::Blocked => {
                    if attempt >= self.config.max_attempts {
                        return Err(FetchError::Blocked {
                            url: url.to_string(),
                            attempts: attempt,
                        });
                    }
                    // Escalating pause, fresh identity for the next try
                    let delay =
                        Duration::from_millis(self.config.blocked_delay_ms * attempt as u64);
                    tracing::warn!(
                        "{} blocked (403), waiting {:?} before attempt {}",
                        url,
                        delay,
                        attempt + 1
                    );
                    tokio::time::sleep(delay).await;
                    identity = self.rotate_identity(identity);
                }
                AttemptOutcome::Transport { error } => {
                    if attempt >= self.config.max_attempts {
                        return Err(FetchError::Unavailable {
                            url: url.to_string(),
                            attempts: attempt,
                            reason: error,
                        });
                    }
                    tracing::warn!("{} attempt {} failed: {}", url, attempt, error);
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                }
            }
        }
    }

    /// Performs one request with the given identity
    async fn attempt(&self, url: &str, identity: &str) -> AttemptOutcome {
        let result = self
            .client
            .get(url)
            .header(USER_AGENT, identity)
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                if status == 403 {
                    return AttemptOutcome::Blocked;
                }

                match response.text().await {
                    Ok(body) => AttemptOutcome::Response { status, body },
                    Err(e) => AttemptOutcome::Transport {
                        error: e.to_string(),
                    },
                }
            }
            Err(e) => {
                // Classify error
                if e.is_timeout() {
                    AttemptOutcome::Transport {
                        error: "Request timeout".to_string(),
                    }
                } else if e.is_connect() {
                    AttemptOutcome::Transport {
                        error: "Connection refused".to_string(),
                    }
                } else {
                    AttemptOutcome::Transport {
                        error: e.to_string(),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> FetchConfig {
        FetchConfig {
            max_attempts: 3,
            retry_delay_ms: 10,
            blocked_delay_ms: 10,
            timeout_secs: 5,
            user_agents: vec![
                "AgentOne/1.0".to_string(),
                "AgentTwo/2.0".to_string(),
            ],
        }
    }

    #[test]
    fn test_build_client() {
        let client = FetchClient::new(create_test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_identity_comes_from_pool() {
        let client = FetchClient::new(create_test_config()).unwrap();

        for _ in 0..50 {
            let identity = client.draw_identity();
            assert!(client
                .config
                .user_agents
                .iter()
                .any(|agent| agent == identity));
        }
    }

    #[test]
    fn test_single_identity_pool() {
        let mut config = create_test_config();
        config.user_agents = vec!["OnlyAgent/1.0".to_string()];
        let client = FetchClient::new(config).unwrap();

        assert_eq!(client.draw_identity(), "OnlyAgent/1.0");
    }

    #[test]
    fn test_rotation_avoids_blocked_identity() {
        let client = FetchClient::new(create_test_config()).unwrap();

        // With a two-entry pool the replacement is forced
        for _ in 0..50 {
            assert_eq!(client.rotate_identity("AgentOne/1.0"), "AgentTwo/2.0");
            assert_eq!(client.rotate_identity("AgentTwo/2.0"), "AgentOne/1.0");
        }
    }

    #[test]
    fn test_rotation_with_single_identity_pool() {
        let mut config = create_test_config();
        config.user_agents = vec!["OnlyAgent/1.0".to_string()];
        let client = FetchClient::new(config).unwrap();

        assert_eq!(client.rotate_identity("OnlyAgent/1.0"), "OnlyAgent/1.0");
    }

    // Retry behavior against live responses is covered with wiremock in the
    // integration tests
}
