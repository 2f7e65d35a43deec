/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification (Credential Service)
/// - [`jwt`]: Session token issuance and validation (Session Token Service)
///
/// # Example
///
/// ```no_run
/// use chrono::Duration;
/// use primearn_shared::auth::jwt::{create_token, Claims};
/// use primearn_shared::auth::password::{hash_password, verify_password, HashingParams};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password", &HashingParams::default())?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "user@example.com", false, Duration::days(30));
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
