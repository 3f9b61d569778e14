//! Club repository implementation
//!
//! Clubs expose aggregate member counts only; individual membership rows
//! never leave this layer except as the caller's own membership checks.

use sqlx::PgPool;

use crate::models::club::{Club, ClubMember, ClubSummary};
use crate::utils::errors::EventifyError;

#[derive(Debug, Clone)]
pub struct ClubRepository {
    pool: PgPool,
}

impl ClubRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find club by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Club>, EventifyError> {
        let club = sqlx::query_as::<_, Club>(
            "SELECT id, name, description, created_at, updated_at FROM clubs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(club)
    }

    /// List all clubs with member counts
    pub async fn list_summaries(&self) -> Result<Vec<ClubSummary>, EventifyError> {
        let clubs = sqlx::query_as::<_, ClubSummary>(
            r#"
            SELECT c.id, c.name, c.description, COUNT(m.id) AS member_count
            FROM clubs c
            LEFT JOIN club_members m ON m.club_id = c.id
            GROUP BY c.id, c.name, c.description
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clubs)
    }

    /// List the clubs a user belongs to, with member counts
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<ClubSummary>, EventifyError> {
        let clubs = sqlx::query_as::<_, ClubSummary>(
            r#"
            SELECT c.id, c.name, c.description, COUNT(all_members.id) AS member_count
            FROM clubs c
            INNER JOIN club_members mine ON mine.club_id = c.id AND mine.user_id = $1
            LEFT JOIN club_members all_members ON all_members.club_id = c.id
            GROUP BY c.id, c.name, c.description
            ORDER BY c.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(clubs)
    }

    /// Check whether a user is a member of a club
    pub async fn is_member(&self, club_id: i64, user_id: i64) -> Result<bool, EventifyError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM club_members WHERE club_id = $1 AND user_id = $2",
        )
        .bind(club_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Add a user to a club
    pub async fn add_member(
        &self,
        club_id: i64,
        user_id: i64,
    ) -> Result<ClubMember, EventifyError> {
        let member = sqlx::query_as::<_, ClubMember>(
            r#"
            INSERT INTO club_members (club_id, user_id)
            VALUES ($1, $2)
            RETURNING id, club_id, user_id, is_leader, joined_at
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    /// Remove a user from a club; returns false when there was no membership
    pub async fn remove_member(&self, club_id: i64, user_id: i64) -> Result<bool, EventifyError> {
        let result = sqlx::query("DELETE FROM club_members WHERE club_id = $1 AND user_id = $2")
            .bind(club_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
