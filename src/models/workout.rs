use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::models::Equipment;

/// Workout lifecycle state
///
/// `InProgress` is the only non-terminal state. Stored and serialized as
/// `"in progress"`; `"in_progress"` is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum WorkoutStatus {
    #[serde(rename = "in progress", alias = "in_progress")]
    #[sqlx(rename = "in progress")]
    InProgress,
    #[serde(rename = "completed")]
    #[sqlx(rename = "completed")]
    Completed,
    #[serde(rename = "abandoned")]
    #[sqlx(rename = "abandoned")]
    Abandoned,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutStatus::InProgress => "in progress",
            WorkoutStatus::Completed => "completed",
            WorkoutStatus::Abandoned => "abandoned",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkoutStatus::InProgress)
    }

    /// Validate a transition from `self` to `next`
    ///
    /// Only `in progress -> completed | abandoned` is allowed.
    pub fn transition_to(self, next: WorkoutStatus) -> Result<WorkoutStatus> {
        match (self, next) {
            (WorkoutStatus::InProgress, WorkoutStatus::Completed)
            | (WorkoutStatus::InProgress, WorkoutStatus::Abandoned) => Ok(next),
            (from, to) => Err(AppError::InvalidState(format!(
                "Cannot change workout status from '{}' to '{}'",
                from, to
            ))),
        }
    }
}

impl fmt::Display for WorkoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "in progress" | "in_progress" => Ok(WorkoutStatus::InProgress),
            "completed" => Ok(WorkoutStatus::Completed),
            "abandoned" => Ok(WorkoutStatus::Abandoned),
            other => Err(AppError::InvalidInput(format!(
                "Unknown workout status '{}'",
                other
            ))),
        }
    }
}

/// Workout row as stored in the `workouts` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub equipment_id: i64,
    pub date: NaiveDate,
    pub status: WorkoutStatus,
    /// Highest set number ever handed out for this workout
    pub last_set_num: i64,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Workout model for API responses
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutResponse {
    pub id: i64,
    pub user_id: i64,
    pub equipment_id: i64,
    pub date: NaiveDate,
    pub status: WorkoutStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub equipment: Option<Equipment>,
    pub sets_count: i64,
    /// Only populated by the workout list endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<i64>,
}

impl WorkoutResponse {
    pub fn new(workout: Workout, equipment: Option<Equipment>, sets_count: i64) -> Self {
        Self {
            id: workout.id,
            user_id: workout.user_id,
            equipment_id: workout.equipment_id,
            date: workout.date,
            status: workout.status,
            created_at: workout.created_at,
            started_at: workout.started_at,
            ended_at: workout.ended_at,
            equipment,
            sets_count,
            max_reps: None,
            max_weight: None,
        }
    }

    pub fn with_maxima(mut self, max_reps: f64, max_weight: i64) -> Self {
        self.max_reps = Some(max_reps);
        self.max_weight = Some(max_weight);
        self
    }
}
