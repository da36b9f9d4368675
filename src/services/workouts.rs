use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::constants::{ERR_EQUIPMENT_ID_REQUIRED, ERR_WORKOUT_IN_PROGRESS};
use crate::db::begin_write;
use crate::error::{AppError, Result};
use crate::models::{Equipment, Workout, WorkoutResponse, WorkoutStatus};

pub(crate) const WORKOUT_COLUMNS: &str =
    "id, user_id, equipment_id, date, status, last_set_num, created_at, started_at, ended_at";

/// Joined row for the workout list: workout, its equipment and set aggregates
#[derive(Debug, sqlx::FromRow)]
struct WorkoutSummaryRow {
    id: i64,
    user_id: i64,
    equipment_id: i64,
    date: NaiveDate,
    status: WorkoutStatus,
    last_set_num: i64,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    eq_type: String,
    eq_name: String,
    eq_description: Option<String>,
    eq_image_base64: Option<String>,
    eq_is_active: bool,
    eq_created_at: DateTime<Utc>,
    sets_count: i64,
    max_reps: f64,
    max_weight: i64,
}

impl From<WorkoutSummaryRow> for WorkoutResponse {
    fn from(row: WorkoutSummaryRow) -> Self {
        let equipment = Equipment {
            id: row.equipment_id,
            equipment_type: row.eq_type,
            name: row.eq_name,
            description: row.eq_description,
            image_base64: row.eq_image_base64,
            is_active: row.eq_is_active,
            created_at: row.eq_created_at,
        };
        let workout = Workout {
            id: row.id,
            user_id: row.user_id,
            equipment_id: row.equipment_id,
            date: row.date,
            status: row.status,
            last_set_num: row.last_set_num,
            created_at: row.created_at,
            started_at: row.started_at,
            ended_at: row.ended_at,
        };

        WorkoutResponse::new(workout, Some(equipment), row.sets_count)
            .with_maxima(row.max_reps, row.max_weight)
    }
}

/// Load a workout and check that `user_id` owns it
pub(crate) async fn find_owned_workout(
    conn: &mut SqliteConnection,
    workout_id: i64,
    user_id: i64,
) -> Result<Workout> {
    let workout: Workout = sqlx::query_as(&format!(
        "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?"
    ))
    .bind(workout_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound("Workout"))?;

    if workout.user_id != user_id {
        tracing::warn!(
            "User {} attempted to access workout {} owned by user {}",
            user_id,
            workout_id,
            workout.user_id
        );
        return Err(AppError::Unauthorized);
    }

    Ok(workout)
}

/// Workout lifecycle: start, finish, delete and list
pub struct WorkoutService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> WorkoutService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Start a new in-progress workout on `equipment_id`
    ///
    /// The insert is a single statement guarded by a partial unique index, so a
    /// concurrent second start fails with `Conflict` rather than slipping past
    /// the pre-check.
    pub async fn start(&self, user_id: i64, equipment_id: Option<i64>) -> Result<WorkoutResponse> {
        let mut conn = self.pool.acquire().await?;

        // 1. Reject a second in-progress workout
        let in_progress: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM workouts WHERE user_id = ? AND status = ?",
        )
        .bind(user_id)
        .bind(WorkoutStatus::InProgress)
        .fetch_optional(&mut *conn)
        .await?;
        if in_progress.is_some() {
            return Err(AppError::Conflict(ERR_WORKOUT_IN_PROGRESS.to_string()));
        }

        // 2. Equipment must be given and exist
        let equipment_id = equipment_id
            .ok_or_else(|| AppError::InvalidInput(ERR_EQUIPMENT_ID_REQUIRED.to_string()))?;
        let equipment = find_equipment(&mut conn, equipment_id)
            .await?
            .ok_or(AppError::NotFound("Equipment"))?;

        // 3. Insert; the unique index is the final word on concurrent starts
        let now = Utc::now();
        let workout: Workout = sqlx::query_as(&format!(
            r#"
            INSERT INTO workouts (user_id, equipment_id, date, status, last_set_num, created_at, started_at)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(equipment_id)
        .bind(now.date_naive())
        .bind(WorkoutStatus::InProgress)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            if err.is_unique_violation() {
                tracing::warn!("Concurrent workout start rejected for user {}", user_id);
                AppError::Conflict(ERR_WORKOUT_IN_PROGRESS.to_string())
            } else {
                err
            }
        })?;

        tracing::info!(
            "User {} started workout {} on equipment {}",
            user_id,
            workout.id,
            equipment_id
        );

        Ok(WorkoutResponse::new(workout, Some(equipment), 0))
    }

    /// Move an owned workout to a new status
    ///
    /// `None` leaves the workout untouched. Terminal transitions stamp `ended_at`.
    pub async fn set_status(
        &self,
        workout_id: i64,
        user_id: i64,
        status: Option<WorkoutStatus>,
    ) -> Result<WorkoutResponse> {
        let mut tx = begin_write(self.pool).await?;

        let mut workout = find_owned_workout(&mut tx, workout_id, user_id).await?;

        if let Some(next) = status {
            let next = workout.status.transition_to(next)?;
            let ended_at = next.is_terminal().then(Utc::now);

            workout = sqlx::query_as(&format!(
                r#"
                UPDATE workouts
                SET status = ?, ended_at = COALESCE(?, ended_at)
                WHERE id = ?
                RETURNING {WORKOUT_COLUMNS}
                "#
            ))
            .bind(next)
            .bind(ended_at)
            .bind(workout_id)
            .fetch_one(&mut *tx)
            .await?;

            tracing::info!("Workout {} is now {}", workout_id, next);
        }

        let response = load_response(&mut tx, workout).await?;
        tx.commit().await?;

        Ok(response)
    }

    /// Delete an owned workout; its sets go with it
    pub async fn delete(&self, workout_id: i64, user_id: i64) -> Result<()> {
        let mut tx = begin_write(self.pool).await?;

        find_owned_workout(&mut tx, workout_id, user_id).await?;

        sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(workout_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Workout {} deleted by user {}", workout_id, user_id);

        Ok(())
    }

    /// All of a user's workouts with set count and best reps/weight, newest first
    pub async fn list(&self, user_id: i64) -> Result<Vec<WorkoutResponse>> {
        let rows: Vec<WorkoutSummaryRow> = sqlx::query_as(
            r#"
            SELECT
                w.id, w.user_id, w.equipment_id, w.date, w.status, w.last_set_num,
                w.created_at, w.started_at, w.ended_at,
                e.type AS eq_type,
                e.name AS eq_name,
                e.description AS eq_description,
                e.image_base64 AS eq_image_base64,
                e.is_active AS eq_is_active,
                e.created_at AS eq_created_at,
                COUNT(s.id) AS sets_count,
                CAST(COALESCE(MAX(s.reps_dist), 0) AS REAL) AS max_reps,
                CAST(COALESCE(MAX(s.weight_time), 0) AS INTEGER) AS max_weight
            FROM workouts w
            JOIN gym_equipment e ON e.id = w.equipment_id
            LEFT JOIN sets s ON s.workout_id = w.id
            WHERE w.user_id = ?
            GROUP BY w.id
            ORDER BY w.created_at DESC, w.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(WorkoutResponse::from).collect())
    }

    /// The user's in-progress workout, if any
    pub async fn in_progress(&self, user_id: i64) -> Result<Option<WorkoutResponse>> {
        let mut conn = self.pool.acquire().await?;

        let workout: Option<Workout> = sqlx::query_as(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = ? AND status = ?"
        ))
        .bind(user_id)
        .bind(WorkoutStatus::InProgress)
        .fetch_optional(&mut *conn)
        .await?;

        match workout {
            Some(workout) => Ok(Some(load_response(&mut conn, workout).await?)),
            None => Ok(None),
        }
    }
}

async fn find_equipment(conn: &mut SqliteConnection, id: i64) -> Result<Option<Equipment>> {
    let equipment = sqlx::query_as(
        r#"
        SELECT id, type, name, description, image_base64, is_active, created_at
        FROM gym_equipment
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(equipment)
}

/// Attach equipment and set count to a workout row
async fn load_response(conn: &mut SqliteConnection, workout: Workout) -> Result<WorkoutResponse> {
    let equipment = find_equipment(&mut *conn, workout.equipment_id).await?;

    let sets_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sets WHERE workout_id = ?")
        .bind(workout.id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(WorkoutResponse::new(workout, equipment, sets_count))
}
