use std::future::{ready, Ready};

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::domain::models::token::TokenClaims;

/// Caller identity extracted from a verified bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Delius username for user tokens, client id for client credential tokens.
    pub username: String,

    /// Granted authorities, e.g. `ROLE_COMMUNITY`.
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|&role| self.has_role(role))
    }
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        let username = claims
            .user_name
            .or(claims.client_id)
            .or(claims.sub)
            .unwrap_or_default();
        Self {
            username,
            roles: claims.authorities,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized("Unauthenticated request"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(user_name: Option<&str>, client_id: Option<&str>) -> TokenClaims {
        TokenClaims {
            user_name: user_name.map(str::to_string),
            client_id: client_id.map(str::to_string),
            sub: None,
            authorities: vec!["ROLE_COMMUNITY".to_string()],
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_username_prefers_user_name_claim() {
        let user = AuthenticatedUser::from(claims(Some("bobby.davro"), Some("community-api-client")));
        assert_eq!(user.username, "bobby.davro");
    }

    #[test]
    fn test_username_falls_back_to_client_id() {
        let user = AuthenticatedUser::from(claims(None, Some("community-api-client")));
        assert_eq!(user.username, "community-api-client");
    }

    #[test]
    fn test_authenticated_user_has_any_role() {
        let user = AuthenticatedUser {
            username: "bobby.davro".to_string(),
            roles: vec!["ROLE_COMMUNITY".to_string()],
        };

        assert!(user.has_role("ROLE_COMMUNITY"));
        assert!(user.has_any_role(&["ROLE_COMMUNITY_CUSTODY_UPDATE", "ROLE_COMMUNITY"]));
        assert!(!user.has_any_role(&["ROLE_COMMUNITY_CUSTODY_UPDATE"]));
    }
}
