//! Bearer token verification settings and the role names guarding each route group.

use std::env;

/// Authority granted to every client of the `/secure` API.
pub const ROLE_COMMUNITY: &str = "ROLE_COMMUNITY";
/// Authority required to move prisoners or rewrite their key dates.
pub const ROLE_COMMUNITY_CUSTODY_UPDATE: &str = "ROLE_COMMUNITY_CUSTODY_UPDATE";
/// Authority required to book appointments on behalf of an intervention provider.
pub const ROLE_COMMUNITY_INTERVENTIONS_UPDATE: &str = "ROLE_COMMUNITY_INTERVENTIONS_UPDATE";
/// Authority required to change an offender's management tier.
pub const ROLE_MANAGEMENT_TIER_UPDATE: &str = "ROLE_MANAGEMENT_TIER_UPDATE";

/// How incoming JWTs are verified.
#[derive(Debug, Clone, PartialEq)]
pub enum JwtVerificationKey {
    /// Shared HMAC secret (HS256).
    Secret(String),
    /// PEM encoded RSA public key of the auth server (RS256).
    RsaPublicKeyPem(String),
}

pub struct JwtConfig;

impl JwtConfig {
    /// Shared secret used for HS256 tokens.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`
    pub fn secret() -> Option<String> {
        env::var("JWT_SECRET").ok().filter(|s| !s.is_empty())
    }

    /// Path to the auth server's RSA public key.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_PUBLIC_KEY_PATH`
    pub fn public_key_path() -> Option<String> {
        env::var("JWT_PUBLIC_KEY_PATH").ok().filter(|s| !s.is_empty())
    }

    /// Resolves the verification key, preferring the RSA public key when both are set.
    ///
    /// # Errors
    ///
    /// * the public key file cannot be read
    /// * neither variable is set
    pub fn verification_key() -> Result<JwtVerificationKey, String> {
        if let Some(path) = Self::public_key_path() {
            let pem = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read JWT public key {}: {}", path, e))?;
            return Ok(JwtVerificationKey::RsaPublicKeyPem(pem));
        }

        match Self::secret() {
            Some(secret) => {
                log::warn!("JWT_PUBLIC_KEY_PATH not set, verifying tokens with JWT_SECRET (HS256)");
                Ok(JwtVerificationKey::Secret(secret))
            }
            None => Err("either JWT_PUBLIC_KEY_PATH or JWT_SECRET must be set".to_string()),
        }
    }
}
