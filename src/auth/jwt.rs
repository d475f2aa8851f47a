use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::entities::user::Role;

/// Claims embedded in an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user ID as a UUID string.
    pub sub: String,
    /// Role at the time the token was issued.
    pub role: Role,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued-at time (Unix timestamp).
    pub iat: i64,
}

/// Issue an access token for the given user.
///
/// # Errors
///
/// Returns an error if JWT encoding fails.
pub fn generate_access_token(user_id: Uuid, role: Role, config: &Config) -> anyhow::Result<String> {
    let now = Utc::now().timestamp();
    #[allow(clippy::cast_possible_wrap)]
    let exp = now + config.jwt_access_expiration_secs as i64;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp,
        iat: now,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| anyhow::anyhow!("Failed to encode access token: {e}"))
}

/// Validate an access token and return its claims.
///
/// # Errors
///
/// Returns an error if the token is malformed, signed with another key, or expired.
pub fn validate_access_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())
        .map_err(|e| anyhow::anyhow!("Invalid access token: {e}"))?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn config(secret: &str) -> Config {
        Config {
            database_url: String::new(),
            server_host: std::net::IpAddr::from([127, 0, 0, 1]),
            server_port: 0,
            environment: Environment::Development,
            log_level: "warn".to_string(),
            jwt_secret: secret.to_string(),
            jwt_access_expiration_secs: 60,
            frontend_url: String::new(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let cfg = config("unit-test-secret");
        let id = Uuid::new_v4();
        let token = generate_access_token(id, Role::Admin, &cfg).unwrap_or_default();
        let claims = validate_access_token(&token, "unit-test-secret");
        assert!(claims.is_ok());
        if let Ok(claims) = claims {
            assert_eq!(claims.sub, id.to_string());
            assert_eq!(claims.role, Role::Admin);
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let cfg = config("unit-test-secret");
        let token = generate_access_token(Uuid::new_v4(), Role::Buyer, &cfg).unwrap_or_default();
        assert!(validate_access_token(&token, "another-secret").is_err());
    }
}
