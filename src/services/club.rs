//! Club service implementation
//!
//! Club discovery and membership management.

use tracing::{debug, info};

use crate::database::repositories::ClubRepository;
use crate::models::club::{ClubMember, ClubSummary};
use crate::utils::errors::{EventifyError, Result};

/// Club service for listings and membership
#[derive(Debug, Clone)]
pub struct ClubService {
    clubs: ClubRepository,
}

impl ClubService {
    /// Create a new ClubService instance
    pub fn new(clubs: ClubRepository) -> Self {
        Self { clubs }
    }

    /// List all clubs with member counts
    pub async fn list(&self) -> Result<Vec<ClubSummary>> {
        debug!("Listing clubs");
        self.clubs.list_summaries().await
    }

    /// List the clubs the caller belongs to
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<ClubSummary>> {
        self.clubs.list_for_user(user_id).await
    }

    /// Join a club
    pub async fn join(&self, club_id: i64, user_id: i64) -> Result<ClubMember> {
        self.clubs
            .find_by_id(club_id)
            .await?
            .ok_or(EventifyError::ClubNotFound { club_id })?;

        if self.clubs.is_member(club_id, user_id).await? {
            return Err(EventifyError::InvalidInput(
                "You are already a member of this club".to_string(),
            ));
        }

        let member = match self.clubs.add_member(club_id, user_id).await {
            Ok(member) => member,
            // lost a race against an identical join request
            Err(EventifyError::Database(sqlx::Error::Database(db)))
                if db.code().as_deref() == Some("23505") =>
            {
                return Err(EventifyError::InvalidInput(
                    "You are already a member of this club".to_string(),
                ));
            }
            Err(err) => return Err(err),
        };

        info!(club_id = club_id, user_id = user_id, "User joined club");
        Ok(member)
    }

    /// Leave a club
    pub async fn leave(&self, club_id: i64, user_id: i64) -> Result<()> {
        self.clubs
            .find_by_id(club_id)
            .await?
            .ok_or(EventifyError::ClubNotFound { club_id })?;

        if !self.clubs.remove_member(club_id, user_id).await? {
            return Err(EventifyError::InvalidInput(
                "You are not a member of this club".to_string(),
            ));
        }

        info!(club_id = club_id, user_id = user_id, "User left club");
        Ok(())
    }
}
