//! User repository implementation

use sqlx::PgPool;

use crate::models::user::{UpdateProfileRequest, User};
use crate::utils::errors::EventifyError;

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, role, \
     student_number, club_name, department, phone, is_active, created_at, updated_at";

/// Column values for inserting a new user; the password arrives pre-hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub student_number: Option<String>,
    pub club_name: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, new_user: NewUser) -> Result<User, EventifyError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, role,
                               student_number, club_name, department, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.role)
        .bind(new_user.student_number)
        .bind(new_user.club_name)
        .bind(new_user.department)
        .bind(new_user.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, EventifyError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email (login path)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, EventifyError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check whether an email is already taken
    pub async fn email_exists(&self, email: &str) -> Result<bool, EventifyError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    /// Update profile fields
    pub async fn update_profile(
        &self,
        id: i64,
        request: UpdateProfileRequest,
    ) -> Result<User, EventifyError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                department = COALESCE($4, department),
                phone = COALESCE($5, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.department)
        .bind(request.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Replace a user's password hash
    pub async fn set_password_hash(
        &self,
        id: i64,
        password_hash: &str,
    ) -> Result<(), EventifyError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, EventifyError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
