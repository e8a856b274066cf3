//! JWT verification for WebSocket connections
//!
//! Tokens are issued by the main SkillSwap API; this service only verifies
//! them. A missing or invalid token downgrades the connection to anonymous
//! rather than rejecting the upgrade, so meeting invite links keep working
//! for users who are not logged in.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use skillswap_shared::UserId;

/// Claims carried by SkillSwap-issued tokens
///
/// The user id claim has been renamed twice over the life of the API; all
/// three spellings remain in circulation and are accepted.
#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    /// Current claim name for the user id
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    /// Older tokens carried the id here
    #[serde(default)]
    pub id: Option<String>,
    /// Oldest tokens exposed the raw document id
    #[serde(rename = "_id", default)]
    pub mongo_id: Option<String>,
    /// Expiration
    pub exp: i64,
}

impl TokenClaims {
    /// The user id under whichever claim name this token carries it
    pub fn subject(&self) -> Option<&str> {
        [&self.user_id, &self.id, &self.mongo_id]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|subject| !subject.is_empty())
    }
}

/// Verifies login tokens presented on WebSocket upgrade
#[derive(Clone)]
pub struct Authenticator {
    decoding_key: DecodingKey,
}

impl Authenticator {
    /// Create a verifier for tokens signed with the shared secret
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Resolve the user behind an optional token
    ///
    /// Never fails: verification problems are logged and the connection
    /// proceeds as anonymous.
    pub fn authenticate(&self, token: Option<&str>) -> Option<UserId> {
        let token = token?;
        match self.verify(token) {
            Ok(claims) => match claims.subject() {
                Some(subject) => Some(UserId::from(subject)),
                None => {
                    tracing::warn!("Token verified but carries no user id claim");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "WebSocket token rejected, continuing anonymously");
                None
            }
        }
    }

    /// Validate and decode a token
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 60; // 60 second clock skew tolerance

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidToken => AuthError::Invalid,
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => AuthError::Invalid,
                _ => AuthError::Validation(e.to_string()),
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
    #[error("Token validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;
    use time::{Duration, OffsetDateTime};

    const SECRET: &str = "test-secret-key-at-least-32-chars!";

    fn mint<T: Serialize>(claims: &T, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("Failed to encode token")
    }

    fn exp_in(seconds: i64) -> i64 {
        (OffsetDateTime::now_utc() + Duration::seconds(seconds)).unix_timestamp()
    }

    #[derive(Serialize)]
    struct CurrentClaims {
        #[serde(rename = "userId")]
        user_id: String,
        exp: i64,
    }

    #[derive(Serialize)]
    struct LegacyIdClaims {
        id: String,
        exp: i64,
    }

    #[derive(Serialize)]
    struct MongoIdClaims {
        #[serde(rename = "_id")]
        mongo_id: String,
        exp: i64,
    }

    #[derive(Serialize)]
    struct MixedClaims {
        #[serde(rename = "userId")]
        user_id: String,
        id: String,
        exp: i64,
    }

    #[test]
    fn test_user_id_claim() {
        let auth = Authenticator::new(SECRET);
        let token = mint(
            &CurrentClaims {
                user_id: "u-1".to_string(),
                exp: exp_in(3600),
            },
            SECRET,
        );

        assert_eq!(auth.authenticate(Some(&token)), Some(UserId::from("u-1")));
    }

    #[test]
    fn test_legacy_id_claim_fallback() {
        let auth = Authenticator::new(SECRET);
        let token = mint(
            &LegacyIdClaims {
                id: "u-2".to_string(),
                exp: exp_in(3600),
            },
            SECRET,
        );

        assert_eq!(auth.authenticate(Some(&token)), Some(UserId::from("u-2")));
    }

    #[test]
    fn test_mongo_id_claim_fallback() {
        let auth = Authenticator::new(SECRET);
        let token = mint(
            &MongoIdClaims {
                mongo_id: "u-3".to_string(),
                exp: exp_in(3600),
            },
            SECRET,
        );

        assert_eq!(auth.authenticate(Some(&token)), Some(UserId::from("u-3")));
    }

    #[test]
    fn test_user_id_claim_wins_over_fallbacks() {
        let auth = Authenticator::new(SECRET);
        let token = mint(
            &MixedClaims {
                user_id: "primary".to_string(),
                id: "secondary".to_string(),
                exp: exp_in(3600),
            },
            SECRET,
        );

        assert_eq!(
            auth.authenticate(Some(&token)),
            Some(UserId::from("primary"))
        );
    }

    #[test]
    fn test_empty_claim_is_skipped() {
        let auth = Authenticator::new(SECRET);
        let token = mint(
            &MixedClaims {
                user_id: String::new(),
                id: "fallback".to_string(),
                exp: exp_in(3600),
            },
            SECRET,
        );

        assert_eq!(
            auth.authenticate(Some(&token)),
            Some(UserId::from("fallback"))
        );
    }

    #[test]
    fn test_expired_token_downgrades_to_anonymous() {
        let auth = Authenticator::new(SECRET);
        let token = mint(
            &CurrentClaims {
                user_id: "u-1".to_string(),
                exp: exp_in(-3600),
            },
            SECRET,
        );

        assert!(matches!(auth.verify(&token), Err(AuthError::Expired)));
        assert_eq!(auth.authenticate(Some(&token)), None);
    }

    #[test]
    fn test_wrong_secret_downgrades_to_anonymous() {
        let auth = Authenticator::new(SECRET);
        let token = mint(
            &CurrentClaims {
                user_id: "u-1".to_string(),
                exp: exp_in(3600),
            },
            "a-different-secret-also-32-chars-long!",
        );

        assert_eq!(auth.authenticate(Some(&token)), None);
    }

    #[test]
    fn test_garbage_token_downgrades_to_anonymous() {
        let auth = Authenticator::new(SECRET);
        assert_eq!(auth.authenticate(Some("not-a-token")), None);
    }

    #[test]
    fn test_missing_token_is_anonymous() {
        let auth = Authenticator::new(SECRET);
        assert_eq!(auth.authenticate(None), None);
    }
}
