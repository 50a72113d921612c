use serde::{Deserialize, Serialize};

/// Claims of tokens issued by the HMPPS auth server.
///
/// - `user_name`: present on tokens issued to a person
/// - `client_id`: present on client credential tokens
/// - `authorities`: granted roles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default)]
    pub authorities: Vec<String>,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}
