use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims - data stored in the token
///
/// Tokens are minted by the portal's identity provider; this service only
/// verifies them. Claims carry identity, never permissions: whether a
/// resident can moderate is resolved per request from configuration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,      // Subject (resident_id as string)
    pub resident_id: Uuid, // Resident UUID
    pub email: String,    // Verified email (notification recipient)
    pub exp: i64,         // Expiration timestamp
    pub iat: i64,         // Issued at timestamp
    pub iss: String,      // Issuer
    pub jti: String,      // JWT ID (unique token identifier)
}

/// JWT Service - creates and verifies JWT tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a new JWT token for a resident
    ///
    /// Token expires after 24 hours
    pub fn create_token(&self, resident_id: Uuid, email: String) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(24);

        let claims = Claims {
            sub: resident_id.to_string(),
            resident_id,
            email,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(), // Unique token ID
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token
    ///
    /// Returns claims if token is valid and not expired
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let resident_id = Uuid::new_v4();

        let token = service
            .create_token(resident_id, "resident@example.org".to_string())
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.resident_id, resident_id);
        assert_eq!(claims.email, "resident@example.org");
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let result = service.verify_token("invalid_token");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new("secret1", "test_issuer".to_string());
        let service2 = JwtService::new("secret2", "test_issuer".to_string());

        let resident_id = Uuid::new_v4();
        let token = service1
            .create_token(resident_id, "resident@example.org".to_string())
            .unwrap();

        // Token created with secret1 should not verify with secret2
        let result = service2.verify_token(&token);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let minting = JwtService::new("test_secret_key", "other_issuer".to_string());
        let verifying = JwtService::new("test_secret_key", "test_issuer".to_string());

        let token = minting
            .create_token(Uuid::new_v4(), "resident@example.org".to_string())
            .unwrap();

        assert!(verifying.verify_token(&token).is_err());
    }

    #[test]
    fn test_expiry_window() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let resident_id = Uuid::new_v4();

        let token = service
            .create_token(resident_id, "resident@example.org".to_string())
            .unwrap();

        let claims = service.verify_token(&token).unwrap();

        // Token should expire in ~24 hours
        let now = chrono::Utc::now().timestamp();
        let expires_in = claims.exp - now;
        assert!(expires_in > 23 * 3600); // At least 23 hours
        assert!(expires_in <= 24 * 3600); // At most 24 hours
    }
}
