use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::models::{WorkoutResponse, WorkoutStatus};
use crate::services::WorkoutService;
use crate::session::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StartWorkoutRequest {
    pub equipment_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWorkoutRequest {
    /// Parsed by hand so unknown values surface as a 400 with our error body
    pub status: Option<String>,
}

/// List the current user's workouts with set aggregates
pub async fn list_workouts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<WorkoutResponse>>> {
    let workouts = WorkoutService::new(&state.db).list(user.id).await?;
    Ok(Json(workouts))
}

/// The current user's in-progress workout, or `null`
pub async fn in_progress_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Option<WorkoutResponse>>> {
    let workout = WorkoutService::new(&state.db).in_progress(user.id).await?;
    Ok(Json(workout))
}

/// Start a workout on a piece of equipment
pub async fn start_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: std::result::Result<Json<StartWorkoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkoutResponse>)> {
    let Json(payload) = payload?;

    let workout = WorkoutService::new(&state.db)
        .start(user.id, payload.equipment_id)
        .await?;

    Ok((StatusCode::CREATED, Json(workout)))
}

/// Complete or abandon a workout
pub async fn update_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    payload: std::result::Result<Json<UpdateWorkoutRequest>, JsonRejection>,
) -> Result<Json<WorkoutResponse>> {
    let Json(payload) = payload?;
    let status = payload
        .status
        .as_deref()
        .map(str::parse::<WorkoutStatus>)
        .transpose()?;

    let workout = WorkoutService::new(&state.db)
        .set_status(id, user.id, status)
        .await?;

    Ok(Json(workout))
}

/// Delete a workout and its sets
pub async fn delete_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    WorkoutService::new(&state.db).delete(id, user.id).await?;
    Ok(Json(json!({ "message": "Workout deleted" })))
}
