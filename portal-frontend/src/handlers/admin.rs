use axum::{
    extract::{Path, State},
    Json,
};
use portal_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::analytics::{user_summary, UserSummary};
use crate::models::{AdminStats, CurrentUser, User};
use crate::AppState;

#[derive(Serialize)]
pub struct AdminDashboard {
    pub user: User,
    pub summary: UserSummary,
    pub stats: AdminStats,
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<AdminDashboard>, AppError> {
    let (users, stats) = tokio::join!(state.api.list_users(), state.api.admin_stats());
    let users = users?;

    Ok(Json(AdminDashboard {
        user,
        summary: user_summary(&users),
        stats: stats?,
    }))
}

pub async fn users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.api.list_users().await?))
}

#[derive(Deserialize)]
pub struct UserStatusUpdate {
    pub active: bool,
}

pub async fn set_user_status(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Path(user_id): Path<i64>,
    Json(update): Json<UserStatusUpdate>,
) -> Result<Json<User>, AppError> {
    let user = state.api.set_user_active(user_id, update.active).await?;
    tracing::info!(
        admin_id = admin.id,
        user_id,
        active = update.active,
        "User status updated"
    );
    Ok(Json(user))
}
