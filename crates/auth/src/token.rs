//! Token issue and verification
//!
//! Access and refresh tokens are HS256 JWTs signed with separate secrets
//! and bound to a single issuer/audience pair. Verification uses zero
//! leeway so expiry is exact.

use axum::http::HeaderValue;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use uuid::Uuid;

use crate::claims::{AccessClaims, RefreshClaims, REFRESH_TOKEN_TYPE};
use crate::config::TokenConfig;
use crate::error::AuthError;
use crate::principal::Principal;

/// Access + refresh token pair returned by signup, login, and refresh
#[derive(Debug, Serialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Issues and verifies signed, time-bound credentials.
///
/// Stateless aside from configuration read at construction; cloned freely
/// into router state.
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    config: TokenConfig,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            config,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Issue a short-lived access token encoding the full principal
    pub fn issue_access_token(&self, principal: &Principal) -> worklane_common::Result<String> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: principal.user_id.to_string(),
            email: principal.email.clone(),
            role: principal.role.to_string(),
            permissions: principal.permissions.clone(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now.timestamp(),
            exp: (now + self.config.access_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| worklane_common::Error::Internal(format!("Failed to sign token: {e}")))
    }

    /// Issue a long-lived refresh token carrying only the user id
    pub fn issue_refresh_token(&self, user_id: Uuid) -> worklane_common::Result<String> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now.timestamp(),
            exp: (now + self.config.refresh_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| worklane_common::Error::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn issue_token_pair(&self, principal: &Principal) -> worklane_common::Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue_access_token(principal)?,
            refresh_token: self.issue_refresh_token(principal.user_id)?,
        })
    }

    /// Verify an access token and rebuild the principal from its claims
    pub fn verify_access_token(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.decode_claims::<AccessClaims>(token, &self.access_decoding)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let role = claims.role.parse().map_err(|_| AuthError::InvalidToken)?;

        Ok(Principal {
            user_id,
            email: claims.email,
            role,
            permissions: claims.permissions,
        })
    }

    /// Verify a refresh token.
    ///
    /// Rejects tokens whose `token_type` is not `"refresh"`, so an access
    /// token presented to the refresh endpoint is never accepted.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        let claims = self.decode_claims::<RefreshClaims>(token, &self.refresh_decoding)?;

        if claims.token_type != REFRESH_TOKEN_TYPE {
            tracing::debug!("Refresh verification rejected non-refresh token");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    fn decode_claims<C: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        key: &DecodingKey,
    ) -> Result<C, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let data = decode::<C>(token, key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Token validation failed");
            AuthError::InvalidToken
        })?;

        Ok(data.claims)
    }
}

/// Extract the bearer token from an Authorization header.
///
/// Only the exact `Bearer <token>` form is accepted.
pub fn extract_bearer_token(header: &HeaderValue) -> Result<String, AuthError> {
    let header_str = header.to_str().map_err(|_| AuthError::InvalidFormat)?;

    if let Some(token) = header_str.strip_prefix("Bearer ") {
        Ok(token.to_string())
    } else {
        Err(AuthError::InvalidFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::Role;
    use axum::http::HeaderValue;

    fn service() -> TokenService {
        TokenService::new(TokenConfig::new(
            "access-secret-for-tests",
            "refresh-secret-for-tests",
            "worklane-test",
            "worklane-api",
            "15m",
            "7d",
        ))
    }

    fn principal(role: Role) -> Principal {
        Principal::new(Uuid::new_v4(), "test@example.com", role)
    }

    #[test]
    fn test_extract_bearer_token() {
        // Valid bearer token
        let header = HeaderValue::from_static("Bearer abc123");
        assert_eq!(extract_bearer_token(&header).unwrap(), "abc123");

        // Missing prefix
        let header = HeaderValue::from_static("abc123");
        assert!(extract_bearer_token(&header).is_err());

        // Basic auth (wrong type)
        let header = HeaderValue::from_static("Basic abc123");
        assert!(extract_bearer_token(&header).is_err());

        // Empty header
        let header = HeaderValue::from_static("");
        assert!(extract_bearer_token(&header).is_err());
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = service();
        let issued = principal(Role::Manager);

        let token = service.issue_access_token(&issued).unwrap();
        let verified = service.verify_access_token(&token).unwrap();

        assert_eq!(verified.user_id, issued.user_id);
        assert_eq!(verified.email, issued.email);
        assert_eq!(verified.role, Role::Manager);
        assert_eq!(verified.permissions, issued.permissions);
    }

    #[test]
    fn test_token_pair_contains_both_tokens() {
        let service = service();
        let pair = service.issue_token_pair(&principal(Role::Member)).unwrap();
        assert!(service.verify_access_token(&pair.access_token).is_ok());
        assert!(service.verify_refresh_token(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let service = service();
        let now = Utc::now();
        let claims = AccessClaims {
            sub: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "MEMBER".to_string(),
            permissions: Role::Member.permissions(),
            iss: "worklane-test".to_string(),
            aud: "worklane-api".to_string(),
            iat: (now - chrono::Duration::minutes(30)).timestamp(),
            exp: (now - chrono::Duration::minutes(15)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"access-secret-for-tests"),
        )
        .unwrap();

        assert!(matches!(
            service.verify_access_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_issuer_mismatch_rejected() {
        let issuing = TokenService::new(TokenConfig::new(
            "access-secret-for-tests",
            "refresh-secret-for-tests",
            "someone-else",
            "worklane-api",
            "15m",
            "7d",
        ));
        let token = issuing.issue_access_token(&principal(Role::Member)).unwrap();

        assert!(matches!(
            service().verify_access_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service();
        let token = service.issue_access_token(&principal(Role::Member)).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('x') { 'y' } else { 'x' });

        assert!(matches!(
            service.verify_access_token(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_access_token_rejected_by_refresh_verification() {
        // Even with identical secrets, an access token must not pass the
        // refresh path: it carries no token_type claim.
        let service = TokenService::new(TokenConfig::new(
            "shared-secret",
            "shared-secret",
            "worklane-test",
            "worklane-api",
            "15m",
            "7d",
        ));
        let token = service.issue_access_token(&principal(Role::Admin)).unwrap();

        assert!(matches!(
            service.verify_refresh_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_token_with_wrong_type_rejected() {
        let service = service();
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
            iss: "worklane-test".to_string(),
            aud: "worklane-api".to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"refresh-secret-for-tests"),
        )
        .unwrap();

        assert!(matches!(
            service.verify_refresh_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let service = service();
        let user_id = Uuid::new_v4();
        let token = service.issue_refresh_token(user_id).unwrap();
        let claims = service.verify_refresh_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, REFRESH_TOKEN_TYPE);
    }
}
