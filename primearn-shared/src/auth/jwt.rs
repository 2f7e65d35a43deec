/// Session token issuance and validation
///
/// Session tokens are HS256-signed JWTs carrying the account identity and
/// the premium flag at issue time. Verification is stateless; the server
/// keeps no session table and a token stays usable until it expires.
///
/// # Example
///
/// ```
/// use primearn_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let account_id = Uuid::new_v4();
/// let claims = Claims::new(account_id, "ada@example.com", false, Duration::days(30));
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, account_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer stamped on every token
pub const ISSUER: &str = "primearn";

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Bad signature, malformed token or not yet valid
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// Signing settings injected from configuration
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// HMAC secret
    pub secret: String,

    /// Token lifetime
    pub ttl: Duration,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

/// Token payload
///
/// Timestamps are Unix seconds. `email` and `is_premium` are snapshots taken
/// when the token was issued; handlers that care about the current tier read
/// the account instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub email: String,
    #[serde(rename = "isPremium")]
    pub is_premium: bool,
}

impl Claims {
    /// Creates claims expiring `expires_in` from now
    pub fn new(account_id: Uuid, email: &str, is_premium: bool, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: account_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            email: email.to_string(),
            is_premium,
        }
    }

    /// True once `exp` has passed, with no leeway
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Checks signature, issuer, `exp` and `nbf`, then returns the claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    // The library allows a leeway past `exp`; sessions end exactly on time
    if data.claims.is_expired() {
        return Err(JwtError::Expired);
    }

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let account_id = Uuid::new_v4();
        let claims = Claims::new(account_id, "ada@example.com", true, Duration::days(30));

        assert_eq!(claims.sub, account_id);
        assert_eq!(claims.iss, "primearn");
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.is_premium);
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let account_id = Uuid::new_v4();
        let claims = Claims::new(account_id, "ada@example.com", false, Duration::hours(1));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, account_id);
        assert_eq!(validated.email, "ada@example.com");
        assert!(!validated.is_premium);
    }

    #[test]
    fn test_premium_claim_wire_name() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.com", true, Duration::hours(1));
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["isPremium"], true);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.com", false, Duration::hours(1));
        let token = create_token(&claims, "secret1").expect("Should create token");

        let result = validate_token(&token, "wrong-secret");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        // Expired an hour ago, well outside the default leeway
        let claims = Claims::new(Uuid::new_v4(), "a@b.com", false, Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_recently_expired_token() {
        // Inside jsonwebtoken's default 60s leeway
        let claims = Claims::new(Uuid::new_v4(), "a@b.com", false, Duration::seconds(-10));
        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_garbage() {
        assert!(validate_token("not-a-token", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }
}
