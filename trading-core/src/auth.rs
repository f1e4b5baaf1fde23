//! Bearer-token authentication shared by every service.
//!
//! Authentication is an explicit step a handler calls first
//! ([`AuthKeys::authenticate`]), optionally followed by a scope check
//! ([`Claims::require_broker`]). Nothing runs implicitly before a handler.

use crate::error::ApiError;
use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use trading::BrokerType;

/// Lifetime of tokens handed to users at login.
pub const USER_TOKEN_TTL_HOURS: i64 = 24;
/// Lifetime of tokens forwarded to broker services.
pub const BROKER_TOKEN_TTL_HOURS: i64 = 1;

/// Payload of every token in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    /// Broker codes the user may read from.
    #[serde(default)]
    pub brokers: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// The known brokers in the `brokers` claim. Unknown codes are ignored.
    pub fn broker_types(&self) -> Vec<BrokerType> {
        BrokerType::ALL
            .into_iter()
            .filter(|b| self.has_broker(*b))
            .collect()
    }

    pub fn has_broker(&self, broker: BrokerType) -> bool {
        self.brokers.iter().any(|code| code == broker.code())
    }

    /// Rejects the request unless the token grants `broker`.
    pub fn require_broker(&self, broker: BrokerType) -> Result<(), ApiError> {
        if self.has_broker(broker) {
            Ok(())
        } else {
            Err(ApiError::forbidden("User does not have access to this broker"))
        }
    }
}

/// HS256 signing and verification keys derived from the shared secret.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthKeys(..)")
    }
}

impl AuthKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a token for `user_id` valid for `ttl`.
    pub fn issue(
        &self,
        user_id: &str,
        username: &str,
        brokers: &[BrokerType],
        ttl: Duration,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            brokers: brokers.iter().map(|b| b.code().to_string()).collect(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::internal("Failed to sign token", e))
    }

    /// Re-signs `claims` as a short-lived token for a broker service.
    pub fn forward(&self, claims: &Claims) -> Result<String, ApiError> {
        self.issue(
            &claims.user_id,
            &claims.username,
            &claims.broker_types(),
            Duration::hours(BROKER_TOKEN_TTL_HOURS),
        )
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))
    }

    /// Reads and verifies the `Authorization: Bearer <token>` header.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, ApiError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Authentication token is required"))?;

        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_issue_and_authenticate() {
        let keys = AuthKeys::new("secret");
        let token = keys
            .issue("u1", "alice", &[BrokerType::BrokerB], Duration::hours(1))
            .unwrap();

        let claims = keys.authenticate(&bearer(&token)).unwrap();
        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.brokers, vec!["brokerB".to_string()]);
        assert!(claims.require_broker(BrokerType::BrokerB).is_ok());
        assert!(matches!(
            claims.require_broker(BrokerType::BrokerA),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_missing_header() {
        let keys = AuthKeys::new("secret");
        let err = keys.authenticate(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "Authentication token is required");

        let mut basic = HeaderMap::new();
        basic.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(keys.authenticate(&basic), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret_and_expired() {
        let keys = AuthKeys::new("secret");
        let other = AuthKeys::new("other");
        let token = other
            .issue("u1", "alice", &[], Duration::hours(1))
            .unwrap();
        let err = keys.authenticate(&bearer(&token)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid or expired token");

        let expired = keys
            .issue("u1", "alice", &[], Duration::hours(-2))
            .unwrap();
        assert!(matches!(
            keys.authenticate(&bearer(&expired)),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_unknown_broker_codes_are_ignored() {
        let claims = Claims {
            user_id: "u".into(),
            username: "u".into(),
            brokers: vec!["brokerZ".into(), "brokerA".into()],
            iat: 0,
            exp: 0,
        };
        assert_eq!(claims.broker_types(), vec![BrokerType::BrokerA]);
    }

    #[test]
    fn test_forward_keeps_identity() {
        let keys = AuthKeys::new("secret");
        let token = keys
            .issue("u9", "bob", &BrokerType::ALL, Duration::hours(24))
            .unwrap();
        let claims = keys.verify(&token).unwrap();

        let forwarded = keys.verify(&keys.forward(&claims).unwrap()).unwrap();
        assert_eq!(forwarded.user_id, "u9");
        assert_eq!(forwarded.broker_types(), BrokerType::ALL.to_vec());
        assert!(forwarded.exp <= claims.exp);
    }
}
