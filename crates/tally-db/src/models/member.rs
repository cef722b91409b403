//! Member counter database models

use sqlx::FromRow;

/// Database model for the members table (counter columns only)
#[derive(Debug, Clone, FromRow)]
pub struct MemberCountersModel {
    pub guild_id: i64,
    pub storage_id: String,
    pub user_id: i64,
    pub regular: i64,
    pub leaves: i64,
    pub bonus: i64,
    pub fake: i64,
}

/// One leaderboard row with the net expression computed by the database
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardRowModel {
    pub user_id: i64,
    pub regular: i64,
    pub leaves: i64,
    pub bonus: i64,
    pub fake: i64,
    pub net: i64,
}

/// Epoch-wide counter sums; zero rows sum to all zeroes via COALESCE
#[derive(Debug, Clone, FromRow)]
pub struct InviteTotalsModel {
    pub regular: i64,
    pub leaves: i64,
    pub bonus: i64,
    pub fake: i64,
}
