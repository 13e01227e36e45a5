use super::client::{ApiRequest, Authenticated};
use super::error::ApiError;
use crate::domain::{DashboardSummary, LeaderboardEntry};

pub async fn fetch_dashboard(api: &Authenticated<'_>) -> Result<DashboardSummary, ApiError> {
    api.json(&ApiRequest::get("/dashboard")).await
}

pub async fn fetch_leaderboard(api: &Authenticated<'_>) -> Result<Vec<LeaderboardEntry>, ApiError> {
    api.json(&ApiRequest::get("/gamification/leaderboard")).await
}
