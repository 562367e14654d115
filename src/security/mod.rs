use crate::config::SecurityConfig;
use crate::db::models::user_models::{AuthToken, User};
use crate::error::Error;
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod auth;
pub mod password;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User name
    pub name: String,
    /// User role
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// Get the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Whether the caller carries the admin role
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Owner-or-admin rule shared by every mutating endpoint: the caller may
    /// modify a record they own, and admins may modify anything.
    pub fn can_modify(&self, owner_id: &Uuid) -> bool {
        if self.is_admin() {
            return true;
        }

        self.user_id().map(|id| id == *owner_id).unwrap_or(false)
    }
}

/// Security service for handling authentication and authorization
pub struct SecurityService {
    config: SecurityConfig,
}

impl SecurityService {
    /// Create a new security service
    pub fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    /// Generate a JWT token for a user
    pub fn generate_token(&self, user: &User) -> Result<AuthToken> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.jwt_expiration_minutes as i64);

        let claims = Claims {
            sub: user.id.to_string(),
            name: user.username.clone(),
            role: format!("{:?}", user.role).to_lowercase(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Authentication(format!("Failed to generate JWT token: {}", e)))?;

        Ok(AuthToken {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.jwt_expiration_minutes * 60, // Convert to seconds
        })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| Error::Authentication(format!("Invalid token: {}", e)))?;

        Ok(token_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::user_models::UserRole;

    fn test_user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "marie".to_string(),
            email: "marie@viillaage.test".to_string(),
            password_hash: "hash".to_string(),
            display_name: Some("Marie".to_string()),
            role,
            created_at: now,
            updated_at: now,
            last_login: None,
            active: true,
        }
    }

    fn claims_for(sub: &str, role: &str) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: sub.to_string(),
            name: "marie".to_string(),
            role: role.to_string(),
            exp: (now + 3600) as usize,
            iat: now as usize,
        }
    }

    #[test]
    fn token_roundtrip_preserves_claims() {
        let service = SecurityService::new(SecurityConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_minutes: 60,
            password_hash_cost: 4,
        });
        let user = test_user(UserRole::Resident);

        let token = service.generate_token(&user).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);

        let decoded = service.validate_token(&token.access_token).unwrap();
        assert_eq!(decoded.claims.sub, user.id.to_string());
        assert_eq!(decoded.claims.name, "marie");
        assert_eq!(decoded.claims.role, "resident");
        assert_eq!(decoded.claims.user_id().unwrap(), user.id);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = SecurityService::new(SecurityConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_minutes: 60,
            password_hash_cost: 4,
        });
        let other = SecurityService::new(SecurityConfig {
            jwt_secret: "different-secret".to_string(),
            jwt_expiration_minutes: 60,
            password_hash_cost: 4,
        });

        let token = service.generate_token(&test_user(UserRole::Admin)).unwrap();
        assert!(other.validate_token(&token.access_token).is_err());
        assert!(service.validate_token("not-a-token").is_err());
    }

    #[test]
    fn owners_and_admins_may_modify() {
        let owner_id = Uuid::new_v4();
        let owner = claims_for(&owner_id.to_string(), "resident");
        let admin = claims_for(&Uuid::new_v4().to_string(), "admin");
        let stranger = claims_for(&Uuid::new_v4().to_string(), "resident");

        assert!(owner.can_modify(&owner_id));
        assert!(admin.can_modify(&owner_id));
        assert!(!stranger.can_modify(&owner_id));
    }

    #[test]
    fn garbage_subject_never_modifies() {
        let claims = claims_for("not-a-uuid", "resident");
        assert!(!claims.can_modify(&Uuid::new_v4()));
        assert!(!claims.is_admin());
    }
}
