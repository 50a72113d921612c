/// Whether a route group rejects requests without a valid token.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    Required,
    /// Verify a token when present, never reject.
    Optional,
}

/// Authorities a route group requires.
#[derive(Debug, Clone)]
pub enum RequiredRole {
    Single(String),
    /// Any one of the listed authorities.
    Any(Vec<String>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, user_roles: &[String]) -> bool {
        match self {
            RequiredRole::Single(required_role) => user_roles.contains(required_role),
            RequiredRole::Any(required_roles) => {
                required_roles.iter().any(|role| user_roles.contains(role))
            }
        }
    }
}
