//! Application configuration

use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,

    // Authentication
    pub jwt_secret: String,

    // CORS
    pub client_origin: String,

    // Service-to-service calls (REST API -> realtime notify endpoint)
    pub internal_api_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),

            // Authentication
            jwt_secret: {
                let secret =
                    env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
                // Must match the secret the main API signs tokens with
                if secret.len() < 32 {
                    return Err(ConfigError::WeakSecret(
                        "JWT_SECRET must be at least 32 characters",
                    ));
                }
                secret
            },

            // CORS
            client_origin: env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),

            // Internal notify endpoint stays open when no token is configured
            internal_api_token: match env::var("INTERNAL_API_TOKEN") {
                Ok(token) => {
                    if token.len() < 32 {
                        return Err(ConfigError::WeakSecret(
                            "INTERNAL_API_TOKEN must be at least 32 characters",
                        ));
                    }
                    Some(token)
                }
                Err(_) => None,
            },
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Weak secret: {0}")]
    WeakSecret(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure config tests run serially (they modify shared env vars)
    static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set required env vars for testing
    fn setup_minimal_config() {
        env::set_var(
            "JWT_SECRET",
            "test-jwt-secret-must-be-at-least-32-characters-long",
        );
    }

    /// Helper to clear env vars after tests
    fn cleanup_config() {
        env::remove_var("JWT_SECRET");
        env::remove_var("BIND_ADDRESS");
        env::remove_var("CLIENT_ORIGIN");
        env::remove_var("INTERNAL_API_TOKEN");
    }

    /// Combined config validation tests - runs serially to avoid env var race conditions
    #[test]
    fn test_config_validation() {
        let _lock = CONFIG_TEST_MUTEX.lock().unwrap();

        // === Test 1: Missing JWT secret ===
        cleanup_config();

        let result = Config::from_env();
        assert!(result.is_err(), "Missing JWT secret should fail");
        match result {
            Err(ConfigError::Missing("JWT_SECRET")) => {}
            other => panic!("Expected Missing error for JWT_SECRET, got: {:?}", other),
        }

        // === Test 2: Short JWT secret rejected ===
        env::set_var("JWT_SECRET", "too-short");
        let result = Config::from_env();
        assert!(result.is_err(), "Short JWT secret should be rejected");
        assert!(
            matches!(result, Err(ConfigError::WeakSecret(_))),
            "Short JWT secret should return WeakSecret error"
        );

        // === Test 3: Defaults applied ===
        setup_minimal_config();
        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.client_origin, "http://localhost:5173");
        assert!(config.internal_api_token.is_none());

        // === Test 4: Short internal token rejected ===
        env::set_var("INTERNAL_API_TOKEN", "too-short");
        let result = Config::from_env();
        assert!(result.is_err(), "Short internal token should be rejected");
        assert!(
            matches!(result, Err(ConfigError::WeakSecret(_))),
            "Short internal token should return WeakSecret error"
        );

        // === Test 5: Overrides respected ===
        env::set_var("BIND_ADDRESS", "127.0.0.1:4000");
        env::set_var("CLIENT_ORIGIN", "https://app.skillswap.dev");
        env::set_var(
            "INTERNAL_API_TOKEN",
            "internal-token-that-is-32-chars-long!",
        );
        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:4000");
        assert_eq!(config.client_origin, "https://app.skillswap.dev");
        assert_eq!(
            config.internal_api_token.as_deref(),
            Some("internal-token-that-is-32-chars-long!")
        );

        cleanup_config();
    }
}
