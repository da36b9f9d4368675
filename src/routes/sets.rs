use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::models::WorkoutSet;
use crate::services::{SetChanges, SetService};
use crate::session::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSetRequest {
    pub workout_id: Option<i64>,
    pub reps_dist: Option<f64>,
    pub weight_time: Option<i64>,
    pub resistance: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSetRequest {
    pub reps_dist: Option<f64>,
    pub weight_time: Option<i64>,
    pub resistance: Option<i64>,
}

/// List a workout's sets ordered by set number
pub async fn list_sets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(workout_id): Path<i64>,
) -> Result<Json<Vec<WorkoutSet>>> {
    let sets = SetService::new(&state.db).list(workout_id, user.id).await?;
    Ok(Json(sets))
}

/// Append a set to an in-progress workout
pub async fn create_set(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: std::result::Result<Json<CreateSetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkoutSet>)> {
    let Json(payload) = payload?;

    let set = SetService::new(&state.db)
        .append(
            payload.workout_id,
            user.id,
            SetChanges {
                reps_dist: payload.reps_dist,
                weight_time: payload.weight_time,
                resistance: payload.resistance,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(set)))
}

/// Partially update a set
pub async fn update_set(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    payload: std::result::Result<Json<UpdateSetRequest>, JsonRejection>,
) -> Result<Json<WorkoutSet>> {
    let Json(payload) = payload?;

    let set = SetService::new(&state.db)
        .update(
            id,
            user.id,
            SetChanges {
                reps_dist: payload.reps_dist,
                weight_time: payload.weight_time,
                resistance: payload.resistance,
            },
        )
        .await?;

    Ok(Json(set))
}

pub async fn delete_set(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    SetService::new(&state.db).delete(id, user.id).await?;
    Ok(Json(json!({ "message": "Set deleted" })))
}
