use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

pub fn issue_token(secret: &str, username: &str) -> Result<String, AppError> {
    let claims = Claims {
        sub: username.to_string(),
        role: "admin".to_string(),
        exp: (Utc::now().timestamp() + TOKEN_TTL_SECS) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Missing or invalid token is 401; a valid token without the admin role is 403.
pub fn require_admin(headers: &HeaderMap, secret: &str) -> Result<Claims, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    if data.claims.role != "admin" {
        return Err(AppError::Forbidden);
    }
    Ok(data.claims)
}

/// Non-failing variant for endpoints that serve both public and admin views.
pub fn is_admin(headers: &HeaderMap, secret: &str) -> bool {
    require_admin(headers, secret).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_round_trip() {
        let token = issue_token("secret", "admin@example.com").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        let claims = require_admin(&headers, "secret").unwrap();
        assert_eq!(claims.sub, "admin@example.com");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let headers = HeaderMap::new();
        assert!(matches!(
            require_admin(&headers, "secret"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token("secret", "admin@example.com").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        assert!(require_admin(&headers, "other-secret").is_err());
    }

    #[test]
    fn test_non_admin_role_is_forbidden() {
        let claims = Claims {
            sub: "viewer".to_string(),
            role: "viewer".to_string(),
            exp: (Utc::now().timestamp() + 600) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        assert!(matches!(
            require_admin(&headers, "secret"),
            Err(AppError::Forbidden)
        ));
    }
}
