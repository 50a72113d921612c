//! Verification of bearer tokens issued by the auth server.
//!
//! Tokens are only ever verified here, never issued, apart from the test
//! helper used by the HTTP tests.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::config::JwtVerificationKey;
use crate::core::AppError;
use crate::domain::models::token::TokenClaims;

pub struct TokenService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// # Errors
    ///
    /// * `AppError::InternalError` - the RSA public key is not valid PEM
    pub fn new(key: &JwtVerificationKey) -> Result<Self, AppError> {
        let (decoding_key, algorithm) = match key {
            JwtVerificationKey::Secret(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
            JwtVerificationKey::RsaPublicKeyPem(pem) => (
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AppError::InternalError(format!("invalid JWT public key: {}", e)))?,
                Algorithm::RS256,
            ),
        };

        let mut validation = Validation::new(algorithm);
        // auth server tokens carry no audience
        validation.validate_aud = false;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Checks signature and expiry and returns the claims.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - expired, malformed or badly signed token
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let claims = token_service.verify_token(token)?;
    /// println!("Authorities: {:?}", claims.authorities);
    /// ```
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError("Token has expired".to_string())
                }
                _ => {
                    log::debug!("Token rejected: {}", e);
                    AppError::AuthenticationError("Invalid token".to_string())
                }
            })
    }

    /// Strips the `Bearer ` prefix of an Authorization header value.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - the header is not a bearer token
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("Invalid authorization header".to_string()))
    }
}

#[cfg(test)]
pub mod testing {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    pub const TEST_SECRET: &str = "test-secret-for-delius-community-api";

    pub fn test_token_service() -> TokenService {
        TokenService::new(&JwtVerificationKey::Secret(TEST_SECRET.to_string())).unwrap()
    }

    /// HS256 token for `username` holding `roles`.
    pub fn issue_token(username: &str, roles: &[&str]) -> String {
        issue_token_expiring(username, roles, Duration::hours(1))
    }

    pub fn issue_token_expiring(username: &str, roles: &[&str], lifetime: Duration) -> String {
        let now = Utc::now();
        let claims = TokenClaims {
            user_name: Some(username.to_string()),
            client_id: Some("community-api-client".to_string()),
            sub: Some(username.to_string()),
            authorities: roles.iter().map(|r| r.to_string()).collect(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::testing::*;
    use super::*;

    #[test]
    fn test_verify_token_returns_claims() {
        let service = test_token_service();
        let token = issue_token("bobby.davro", &["ROLE_COMMUNITY"]);

        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.user_name.as_deref(), Some("bobby.davro"));
        assert_eq!(claims.authorities, vec!["ROLE_COMMUNITY".to_string()]);
    }

    #[test]
    fn test_verify_token_rejects_expired_token() {
        let service = test_token_service();
        let token = issue_token_expiring("bobby.davro", &[], Duration::hours(-2));

        let result = service.verify_token(&token);

        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_verify_token_rejects_other_secret() {
        let service = TokenService::new(&JwtVerificationKey::Secret("another".to_string())).unwrap();
        let token = issue_token("bobby.davro", &[]);

        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        let service = test_token_service();

        assert_eq!(service.extract_bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert!(service.extract_bearer_token("Basic abc").is_err());
        assert!(service.extract_bearer_token("Bearer ").is_err());
    }
}
