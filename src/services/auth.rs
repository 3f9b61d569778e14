//! Authentication service implementation
//!
//! Account registration, credential checks, bearer-token issuance and
//! verification, and profile management. Passwords are stored as salted
//! iterated SHA-256 digests; tokens are HS256 JWTs carrying the user id
//! and role.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{Duration, Utc};
use constant_time_eq::constant_time_eq;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::settings::Settings;
use crate::database::repositories::user::NewUser;
use crate::database::repositories::UserRepository;
use crate::models::user::{
    CreateUserRequest, UpdateProfileRequest, User, UserProfile, UserRole,
};
use crate::utils::errors::{EventifyError, Result};
use crate::utils::helpers;

const HASH_ITERATIONS: u32 = 10_000;
const SALT_LEN: usize = 16;

/// Token claims: who the caller is and what role they hold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authentication service for account and token management
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    settings: Settings,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(users: UserRepository, settings: Settings) -> Self {
        Self { users, settings }
    }

    /// Register a new account and issue its first token
    pub async fn register(&self, request: CreateUserRequest) -> Result<(UserProfile, String)> {
        validate_registration(&request)?;

        let email = request.email.trim().to_lowercase();
        if self.users.email_exists(&email).await? {
            return Err(EventifyError::EmailTaken);
        }

        let password_hash = hash_password(&request.password);
        let new_user = NewUser {
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email,
            password_hash,
            role: request.role,
            student_number: request.student_number,
            club_name: request.club_name,
            department: request.department,
            phone: request.phone,
        };

        let user = match self.users.create(new_user).await {
            Ok(user) => user,
            // concurrent signup with the same email hit the unique constraint
            Err(EventifyError::Database(sqlx::Error::Database(db)))
                if db.code().as_deref() == Some("23505") =>
            {
                return Err(EventifyError::EmailTaken);
            }
            Err(err) => return Err(err),
        };

        info!(user_id = user.id, role = %user.role, "New account registered");

        let token = self.issue_token(&user)?;
        Ok((user.into(), token))
    }

    /// Check credentials and issue a token
    pub async fn login(&self, email: &str, password: &str) -> Result<(UserProfile, String)> {
        debug!(email = %email, "Login attempt");

        let user = self
            .users
            .find_by_email(email.trim().to_lowercase().as_str())
            .await?
            .ok_or(EventifyError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "Failed login attempt");
            return Err(EventifyError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(EventifyError::PermissionDenied(
                "Account is deactivated".to_string(),
            ));
        }

        let token = self.issue_token(&user)?;
        info!(user_id = user.id, "User logged in");
        Ok((user.into(), token))
    }

    /// Get a user's profile
    pub async fn profile(&self, user_id: i64) -> Result<UserProfile> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(EventifyError::UserNotFound { user_id })?;
        Ok(user.into())
    }

    /// Update profile fields
    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile> {
        if let Some(name) = &request.first_name {
            if !helpers::is_valid_name(name) {
                return Err(EventifyError::InvalidInput(
                    "First name must be 2-50 letters".to_string(),
                ));
            }
        }
        if let Some(name) = &request.last_name {
            if !helpers::is_valid_name(name) {
                return Err(EventifyError::InvalidInput(
                    "Last name must be 2-50 letters".to_string(),
                ));
            }
        }
        if let Some(phone) = &request.phone {
            if !helpers::is_valid_phone(phone) {
                return Err(EventifyError::InvalidInput(
                    "Please provide a valid phone number".to_string(),
                ));
            }
        }

        // existence check keeps the repository's fetch_one from surfacing
        // as an unexpected failure
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(EventifyError::UserNotFound { user_id })?;

        let user = self.users.update_profile(user_id, request).await?;
        info!(user_id = user_id, "Profile updated");
        Ok(user.into())
    }

    /// Change password after re-checking the current one
    pub async fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(EventifyError::UserNotFound { user_id })?;

        if !verify_password(current_password, &user.password_hash) {
            return Err(EventifyError::InvalidInput(
                "Current password is incorrect".to_string(),
            ));
        }
        if !helpers::is_strong_password(new_password) {
            return Err(EventifyError::InvalidInput(
                "Password must be at least 6 characters with an uppercase letter, \
                 a lowercase letter, and a number"
                    .to_string(),
            ));
        }

        self.users
            .set_password_hash(user_id, &hash_password(new_password))
            .await?;
        info!(user_id = user_id, "Password changed");
        Ok(())
    }

    /// Issue a bearer token for a user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.settings.auth.token_ttl_hours)).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verify a bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

fn validate_registration(request: &CreateUserRequest) -> Result<()> {
    if !helpers::is_valid_name(&request.first_name) {
        return Err(EventifyError::InvalidInput(
            "First name must be 2-50 letters".to_string(),
        ));
    }
    if !helpers::is_valid_name(&request.last_name) {
        return Err(EventifyError::InvalidInput(
            "Last name must be 2-50 letters".to_string(),
        ));
    }
    if !helpers::is_valid_email(&request.email) {
        return Err(EventifyError::InvalidInput(
            "Please provide a valid email address".to_string(),
        ));
    }
    if !helpers::is_strong_password(&request.password) {
        return Err(EventifyError::InvalidInput(
            "Password must be at least 6 characters with an uppercase letter, \
             a lowercase letter, and a number"
                .to_string(),
        ));
    }

    let role: UserRole = request
        .role
        .parse()
        .map_err(|_| EventifyError::InvalidInput(
            "Role must be either student or club_admin".to_string(),
        ))?;

    match role {
        UserRole::Student => {
            let number = request.student_number.as_deref().unwrap_or("");
            if !(3..=20).contains(&number.len()) {
                return Err(EventifyError::InvalidInput(
                    "Student ID must be between 3 and 20 characters".to_string(),
                ));
            }
        }
        UserRole::ClubAdmin => {
            let club = request.club_name.as_deref().unwrap_or("");
            if !(2..=100).contains(&club.len()) {
                return Err(EventifyError::InvalidInput(
                    "Club name must be between 2 and 100 characters".to_string(),
                ));
            }
        }
    }

    if let Some(phone) = &request.phone {
        if !helpers::is_valid_phone(phone) {
            return Err(EventifyError::InvalidInput(
                "Please provide a valid phone number".to_string(),
            ));
        }
    }

    Ok(())
}

/// Hash a password with a fresh random salt.
/// Format: `v1$<iterations>$<salt-b64>$<digest-b64>`
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = derive(password, &salt, HASH_ITERATIONS);
    format!(
        "v1${}${}${}",
        HASH_ITERATIONS,
        BASE64.encode(salt),
        BASE64.encode(digest)
    )
}

/// Verify a password against a stored digest in constant time
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some("v1"), Some(iterations), Some(salt), Some(digest)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(digest)) = (BASE64.decode(salt), BASE64.decode(digest)) else {
        return false;
    };

    let candidate = derive(password, &salt, iterations);
    constant_time_eq(&candidate, &digest)
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut digest: [u8; 32] = Sha256::new()
        .chain_update(salt)
        .chain_update(password.as_bytes())
        .finalize()
        .into();
    for _ in 1..iterations {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(password.as_bytes())
            .finalize()
            .into();
    }
    digest
}
