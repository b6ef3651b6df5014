//! SurrealDB connection management
//!
//! The protocol is selected at runtime from the URL scheme:
//! - `ws://` / `wss://` - WebSocket connections
//! - `http://` / `https://` - HTTP connections
//! - `mem://` - In-memory database (tests and local runs)

use std::time::Duration;

use crate::config::SurrealDbConfig;
use crate::error::{DatabaseError, DatabaseOperation, Result};

/// SurrealDB client using the `Any` engine for runtime protocol selection
pub type SurrealClient = surrealdb::Surreal<surrealdb::engine::any::Any>;

/// Connect to SurrealDB, retrying with exponential backoff
///
/// Makes `max_retries + 1` attempts in total. The delay before retry `n`
/// is `retry_delay_secs * 2^(n-1)`.
pub async fn create_client(config: &SurrealDbConfig) -> Result<SurrealClient> {
    let mut attempt = 0;
    let base_delay = Duration::from_secs(config.retry_delay_secs);

    loop {
        match try_create_client(config).await {
            Ok(client) => {
                if attempt > 0 {
                    tracing::info!(
                        "SurrealDB connection established after {} attempt(s)",
                        attempt + 1
                    );
                } else {
                    tracing::info!(
                        "SurrealDB connected: url={}, ns={}, db={}",
                        sanitize_connection_url(&config.url),
                        config.namespace,
                        config.database
                    );
                }
                return Ok(client);
            }
            Err(e) => {
                attempt += 1;

                if attempt > config.max_retries {
                    tracing::error!(
                        "Failed to connect to SurrealDB after {} attempts: {}",
                        config.max_retries + 1,
                        e
                    );
                    return Err(e.into());
                }

                let delay = base_delay * 2_u32.saturating_pow(attempt - 1);

                tracing::warn!(
                    "SurrealDB connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Single connection attempt: connect, sign in if configured, select ns/db
async fn try_create_client(
    config: &SurrealDbConfig,
) -> std::result::Result<SurrealClient, DatabaseError> {
    let url_safe = sanitize_connection_url(&config.url);
    tracing::debug!("Connecting to SurrealDB: {}", url_safe);

    let client = surrealdb::engine::any::connect(config.url.as_str())
        .await
        .map_err(|e| {
            DatabaseError::connection_failed(format!(
                "{} at '{}': {}",
                categorize_surrealdb_error(&e),
                url_safe,
                e
            ))
        })?;

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        client
            .signin(surrealdb::opt::auth::Root {
                username,
                password,
            })
            .await
            .map_err(|e| {
                DatabaseError::connection_failed(format!(
                    "{} while signing in to '{}': {}",
                    categorize_surrealdb_error(&e),
                    url_safe,
                    e
                ))
            })?;
    }

    client
        .use_ns(&config.namespace)
        .use_db(&config.database)
        .await
        .map_err(|e| {
            DatabaseError::from(e)
                .with_operation(DatabaseOperation::Connect)
                .add_context(format!(
                    "selecting namespace '{}' / database '{}' on '{}'",
                    config.namespace, config.database, url_safe
                ))
        })?;

    Ok(client)
}

/// Round-trip a trivial statement to check the store answers
pub async fn ping(client: &SurrealClient) -> std::result::Result<(), DatabaseError> {
    client
        .query("RETURN true")
        .await
        .and_then(|response| response.check())
        .map(|_| ())
        .map_err(DatabaseError::from)
}

/// Strip credentials from a connection URL before logging it
pub fn sanitize_connection_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(scheme_end) = url.find("://") {
            let scheme = &url[..scheme_end + 3];
            let after_at = &url[at_pos..];
            return format!("{}***{}", scheme, after_at);
        }
    }
    url.to_string()
}

fn categorize_surrealdb_error(err: &surrealdb::Error) -> &'static str {
    let err_str = err.to_string().to_lowercase();

    if err_str.contains("auth") || err_str.contains("credentials") || err_str.contains("signin") {
        "Authentication error"
    } else if err_str.contains("connect")
        || err_str.contains("network")
        || err_str.contains("dns")
        || err_str.contains("refused")
    {
        "Network connection error"
    } else if err_str.contains("permission")
        || err_str.contains("denied")
        || err_str.contains("not allowed")
    {
        "Permission error"
    } else if err_str.contains("timeout") {
        "Connection timeout"
    } else {
        "Connection error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_config() -> SurrealDbConfig {
        SurrealDbConfig {
            url: "mem://".to_string(),
            namespace: "test".to_string(),
            database: "test".to_string(),
            username: None,
            password: None,
            max_retries: 0,
            retry_delay_secs: 0,
        }
    }

    #[test]
    fn test_sanitize_connection_url_no_credentials() {
        let url = "ws://localhost:8000";
        assert_eq!(sanitize_connection_url(url), url);
    }

    #[test]
    fn test_sanitize_connection_url_with_credentials() {
        let sanitized = sanitize_connection_url("ws://user:pass@localhost:8000");
        assert_eq!(sanitized, "ws://***@localhost:8000");
    }

    #[test]
    fn test_sanitize_connection_url_mem() {
        assert_eq!(sanitize_connection_url("mem://"), "mem://");
    }

    #[tokio::test]
    async fn test_mem_connection_answers_ping() {
        let client = create_client(&mem_config()).await.unwrap();
        ping(&client).await.unwrap();
    }

    #[tokio::test]
    async fn test_unsupported_scheme_fails_without_retry() {
        let config = SurrealDbConfig {
            url: "bogus://nowhere".to_string(),
            ..mem_config()
        };

        let err = create_client(&config).await.unwrap_err();
        assert!(matches!(err, crate::error::Error::Database(_)));
    }
}
