//! User context decoded from JWT claims.
//!
//! The signature is not checked here: the backend enforces authorization,
//! and the dashboard only uses the claims to decide which search
//! categories and actions to offer.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AuthError;

/// Role that unlocks administrative boards and categories.
pub const ADMIN_ROLE: &str = "ROLE_ADMIN";

/// The signed-in user, constructed once per session and passed to boards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    /// Durable account identifier.
    pub account_id: String,
    /// Granted roles, e.g. `ROLE_ADMIN`.
    pub roles: Vec<String>,
    /// Token expiry, from the `exp` claim.
    pub expires_at: Option<DateTime<Utc>>,
}

impl UserContext {
    /// Creates a context directly.
    pub fn new(account_id: impl Into<String>, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            account_id: account_id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            expires_at: None,
        }
    }

    /// Decodes the payload segment of a JWT.
    pub fn from_jwt(token: &str) -> Result<Self, AuthError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token);
        let mut parts = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::MalformedToken(
                "expected three dot-separated segments".to_string(),
            ));
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthError::MalformedToken(e.to_string()))?;
        let claims: Claims =
            serde_json::from_slice(&bytes).map_err(|e| AuthError::Claims(e.to_string()))?;

        claims.try_into()
    }

    /// Returns `true` if the user holds `role`.
    ///
    /// A missing `ROLE_` prefix on either side is tolerated.
    pub fn has_role(&self, role: &str) -> bool {
        let wanted = role.strip_prefix("ROLE_").unwrap_or(role);
        self.roles
            .iter()
            .any(|r| r.strip_prefix("ROLE_").unwrap_or(r).eq_ignore_ascii_case(wanted))
    }

    /// Returns `true` for administrators.
    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<Value>,
    #[serde(rename = "accountId")]
    account_id: Option<Value>,
    auth: Option<RolesClaim>,
    roles: Option<RolesClaim>,
    exp: Option<i64>,
}

/// Roles arrive either as a list or as a comma-joined string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RolesClaim {
    List(Vec<String>),
    Joined(String),
}

impl RolesClaim {
    fn into_roles(self) -> Vec<String> {
        match self {
            RolesClaim::List(roles) => roles,
            RolesClaim::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

fn claim_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl TryFrom<Claims> for UserContext {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let account_id = claims
            .account_id
            .and_then(claim_to_string)
            .or_else(|| claims.sub.and_then(claim_to_string))
            .ok_or(AuthError::MissingAccountId)?;

        let roles = claims
            .auth
            .or(claims.roles)
            .map(RolesClaim::into_roles)
            .unwrap_or_default();

        let expires_at = claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0));

        Ok(Self {
            account_id,
            roles,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_sub_and_joined_roles() {
        let token = jwt(r#"{"sub":"admin01","auth":"ROLE_ADMIN,ROLE_USER","exp":1700000000}"#);
        let user = UserContext::from_jwt(&token).unwrap();

        assert_eq!(user.account_id, "admin01");
        assert_eq!(user.roles, vec!["ROLE_ADMIN", "ROLE_USER"]);
        assert!(user.is_admin());
        assert_eq!(user.expires_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn test_account_id_claim_wins_over_sub() {
        let token = jwt(r#"{"sub":"login","accountId":42,"roles":["USER"]}"#);
        let user = UserContext::from_jwt(&token).unwrap();

        assert_eq!(user.account_id, "42");
        assert!(user.has_role("ROLE_USER"));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_bearer_prefix_is_stripped() {
        let token = format!("Bearer {}", jwt(r#"{"sub":"u1"}"#));
        assert_eq!(UserContext::from_jwt(&token).unwrap().account_id, "u1");
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(matches!(
            UserContext::from_jwt("not-a-jwt"),
            Err(AuthError::MalformedToken(_))
        ));
        assert!(matches!(
            UserContext::from_jwt("a.!!!.c"),
            Err(AuthError::MalformedToken(_))
        ));
        assert_eq!(
            UserContext::from_jwt(&jwt(r#"{"exp":1}"#)),
            Err(AuthError::MissingAccountId)
        );
    }
}
